//! 命名服务统一错误类型

use super::code::ErrorCode;
use super::localized::LocalizedError;
use std::collections::HashMap;
use thiserror::Error;

/// 命名服务统一错误类型
#[derive(Error, Debug, Clone)]
pub enum NamingError {
    /// 本地化错误（用于暴露给调用方）
    #[error("错误 [{code}] {reason}", code = .code.as_str())]
    Localized {
        code: ErrorCode,
        reason: String,
        details: Option<String>,
        params: Option<HashMap<String, String>>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl NamingError {
    /// 创建本地化错误
    pub fn localized(code: ErrorCode, reason: impl Into<String>) -> Self {
        NamingError::Localized {
            code,
            reason: reason.into(),
            details: None,
            params: None,
            timestamp: chrono::Utc::now(),
        }
    }

    // ============================================================
    // 便捷方法：服务相关错误
    // ============================================================

    /// 服务不存在
    pub fn service_not_found(namespace_id: &str, service_name: &str) -> Self {
        let mut params = HashMap::new();
        params.insert("namespace_id".to_string(), namespace_id.to_string());
        params.insert("service_name".to_string(), service_name.to_string());
        NamingError::Localized {
            code: ErrorCode::ServiceNotFound,
            reason: format!("service {} is not found", service_name),
            details: None,
            params: Some(params),
            timestamp: chrono::Utc::now(),
        }
    }

    /// 命名空间下没有任何服务
    pub fn namespace_empty(namespace_id: &str) -> Self {
        Self::localized(
            ErrorCode::NamespaceEmpty,
            format!("no service exists in {}", namespace_id),
        )
    }

    // ============================================================
    // 便捷方法：选择器相关错误
    // ============================================================

    /// 选择器文档不合法
    pub fn invalid_selector(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::InvalidSelector, reason)
    }

    /// 不支持的选择器类型
    pub fn unknown_selector_type(selector_type: &str) -> Self {
        Self::localized(
            ErrorCode::UnknownSelectorType,
            format!("not match any type of selector: {}", selector_type),
        )
    }

    /// 标签表达式格式错误
    pub fn malformed_expression(expression: &str) -> Self {
        Self::localized(
            ErrorCode::MalformedExpression,
            format!("malformed label expression: {}", expression),
        )
    }

    // ============================================================
    // 便捷方法：集群同步相关错误
    // ============================================================

    /// 对端地址不在已知服务器列表中
    pub fn unknown_peer(address: &str) -> Self {
        Self::localized(
            ErrorCode::UnknownPeer,
            format!("ip: {} is not in serverlist", address),
        )
    }

    /// 校验和报告无法解析
    pub fn malformed_payload(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::MalformedPayload, reason)
    }

    // ============================================================
    // 便捷方法：通用错误
    // ============================================================

    /// 参数错误
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::InvalidParameter, reason)
    }

    /// 反序列化错误
    pub fn deserialization_error(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::DeserializationError, reason)
    }

    // ============================================================
    // 信息获取方法
    // ============================================================

    /// 获取错误代码
    pub fn code(&self) -> ErrorCode {
        match self {
            NamingError::Localized { code, .. } => *code,
        }
    }

    /// 获取错误原因
    pub fn reason(&self) -> &str {
        match self {
            NamingError::Localized { reason, .. } => reason,
        }
    }

    /// 是否为调用方错误
    pub fn is_client_error(&self) -> bool {
        self.code().is_client_error()
    }

    /// 转换为本地化错误
    pub fn to_localized(self) -> LocalizedError {
        match self {
            NamingError::Localized {
                code,
                reason,
                details,
                params,
                timestamp,
            } => LocalizedError {
                code,
                reason,
                details,
                params,
                timestamp,
            },
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, NamingError>;
