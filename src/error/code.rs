//! 错误代码和错误类别定义
//!
//! 错误代码按类别分组，每个类别占用1000个代码范围，
//! 每个代码同时决定了对外暴露时的 HTTP 状态码

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 错误代码枚举
///
/// - 1000-1999: 服务相关错误
/// - 2000-2999: 选择器相关错误
/// - 3000-3999: 集群同步相关错误
/// - 8000-8999: 序列化相关错误
/// - 9000-9999: 通用错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum ErrorCode {
    // ============================================================
    // 服务相关错误 (1000-1999)
    // ============================================================
    ServiceNotFound = 1000,
    NamespaceEmpty = 1001,

    // ============================================================
    // 选择器相关错误 (2000-2999)
    // ============================================================
    InvalidSelector = 2000,
    UnknownSelectorType = 2001,
    MalformedExpression = 2002,

    // ============================================================
    // 集群同步相关错误 (3000-3999)
    // ============================================================
    UnknownPeer = 3000,
    MalformedPayload = 3001,

    // ============================================================
    // 序列化相关错误 (8000-8999)
    // ============================================================
    DeserializationError = 8001,

    // ============================================================
    // 通用错误 (9000-9999)
    // ============================================================
    InvalidParameter = 9001,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ErrorCode {
    /// 获取错误代码的数字值
    #[inline]
    pub fn as_u32(&self) -> u32 {
        *self as u32
    }

    /// 获取错误代码的英文标识符
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ServiceNotFound => "SERVICE_NOT_FOUND",
            ErrorCode::NamespaceEmpty => "NAMESPACE_EMPTY",
            ErrorCode::InvalidSelector => "INVALID_SELECTOR",
            ErrorCode::UnknownSelectorType => "UNKNOWN_SELECTOR_TYPE",
            ErrorCode::MalformedExpression => "MALFORMED_EXPRESSION",
            ErrorCode::UnknownPeer => "UNKNOWN_PEER",
            ErrorCode::MalformedPayload => "MALFORMED_PAYLOAD",
            ErrorCode::DeserializationError => "DESERIALIZATION_ERROR",
            ErrorCode::InvalidParameter => "INVALID_PARAMETER",
        }
    }

    /// 获取错误代码的类别
    pub fn category(&self) -> ErrorCategory {
        match self.as_u32() {
            1000..=1999 => ErrorCategory::Service,
            2000..=2999 => ErrorCategory::Selector,
            3000..=3999 => ErrorCategory::Sync,
            8000..=8999 => ErrorCategory::Serialization,
            _ => ErrorCategory::General,
        }
    }

    /// 对外暴露时使用的 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::ServiceNotFound | ErrorCode::NamespaceEmpty => StatusCode::NOT_FOUND,
            ErrorCode::InvalidSelector
            | ErrorCode::UnknownSelectorType
            | ErrorCode::MalformedExpression
            | ErrorCode::UnknownPeer
            | ErrorCode::MalformedPayload
            | ErrorCode::DeserializationError
            | ErrorCode::InvalidParameter => StatusCode::BAD_REQUEST,
        }
    }

    /// 是否属于调用方错误（4xx）
    pub fn is_client_error(&self) -> bool {
        self.http_status().is_client_error()
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    Service,
    Selector,
    Sync,
    Serialization,
    General,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Service => write!(f, "SERVICE"),
            ErrorCategory::Selector => write!(f, "SELECTOR"),
            ErrorCategory::Sync => write!(f, "SYNC"),
            ErrorCategory::Serialization => write!(f, "SERIALIZATION"),
            ErrorCategory::General => write!(f, "GENERAL"),
        }
    }
}
