//! 命名服务数据模型
//!
//! 服务、实例、选择器以及基于它们的校验和计算与元数据过滤

pub mod checksum;
pub mod filter;
pub mod instance;
pub mod registry;
pub mod selector;
pub mod service;

pub use checksum::ChecksumEngine;
pub use filter::MetadataFilter;
pub use instance::Instance;
pub use registry::{InMemoryRegistry, ServiceRegistry};
pub use selector::{LabelClause, LabelSelector, Selector, SelectorDocument, SelectorFactor};
pub use service::{Service, parse_metadata};
