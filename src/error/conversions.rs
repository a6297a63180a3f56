//! 错误类型转换实现

use super::{ErrorBuilder, ErrorCode, NamingError};

impl From<serde_json::Error> for NamingError {
    fn from(err: serde_json::Error) -> Self {
        NamingError::deserialization_error(format!("JSON 反序列化错误: {}", err))
    }
}

impl From<regex::Error> for NamingError {
    fn from(err: regex::Error) -> Self {
        ErrorBuilder::new(ErrorCode::InvalidParameter, "invalid search expression")
            .details(err.to_string())
            .build()
    }
}

#[cfg(feature = "http")]
impl axum::response::IntoResponse for NamingError {
    fn into_response(self) -> axum::response::Response {
        let code = self.code();
        tracing::debug!(
            code = %code,
            category = %code.category(),
            reason = %self.reason(),
            "Request rejected"
        );
        (code.http_status(), axum::Json(self.to_localized())).into_response()
    }
}
