//! 对外暴露的错误信息结构

use super::code::ErrorCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP 错误响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedError {
    pub code: ErrorCode,
    pub reason: String,
    /// 调试用详情
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, String>>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
