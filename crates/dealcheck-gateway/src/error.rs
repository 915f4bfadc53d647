//! Error types for the Gateway

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dealcheck_core::CoreError;
use thiserror::Error;

/// Gateway error type
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Deal not found: {0}")]
    DealNotFound(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request rejected by an extractor before reaching a handler
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// HTTP status reported for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::DealNotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Rejected { status, .. } => *status,
            GatewayError::UnsupportedFileType(_)
            | GatewayError::BadRequest(_)
            | GatewayError::Core(CoreError::UnknownOverrideField(_)) => StatusCode::BAD_REQUEST,
            GatewayError::Core(CoreError::MalformedInput { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::InvalidConfig(_)
            | GatewayError::Io(_)
            | GatewayError::Serialization(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Serialization(e.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for GatewayError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        GatewayError::BadRequest(e.body_text())
    }
}

macro_rules! impl_from_rejection {
    ($($rejection:ty),*) => {
        $(
            impl From<$rejection> for GatewayError {
                fn from(rejection: $rejection) -> Self {
                    GatewayError::Rejected {
                        status: rejection.status(),
                        message: rejection.body_text(),
                    }
                }
            }
        )*
    };
}

impl_from_rejection!(QueryRejection, JsonRejection, MultipartRejection);

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = Json(serde_json::json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}

/// Result type for Gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;
    use dealcheck_core::FieldName;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GatewayError::DealNotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatewayError::from(CoreError::UnknownOverrideField("x".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::from(CoreError::malformed(FieldName::TradeDate, "x", "bad")).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            GatewayError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rejection_keeps_status() {
        let err = GatewayError::Rejected {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "missing field `deal_id`".into(),
        };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "missing field `deal_id`");
    }

    #[test]
    fn test_core_error_message_passes_through() {
        let err = GatewayError::from(CoreError::UnknownOverrideField("strike".into()));
        assert_eq!(err.to_string(), "Unknown override field: strike");
    }
}
