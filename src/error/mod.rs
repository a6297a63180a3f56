//! Flare Naming Core 错误处理模块
//!
//! 提供统一的错误代码分类、错误构建和错误转换

pub mod builder;
pub mod code;
pub mod conversions;
pub mod localized;
pub mod naming_error;

pub use builder::ErrorBuilder;
pub use code::{ErrorCategory, ErrorCode};
pub use localized::LocalizedError;
pub use naming_error::{NamingError, Result};
