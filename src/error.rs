//! Error types for the cache server
//!
//! Provides unified error handling using thiserror. Every variant renders as a
//! failure envelope; only the HTTP status differs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ApiResponse;

/// Message sent to callers for any internal failure; details stay in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

// == Cache Error Enum ==
/// Unified error type for the cache server.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Missing field, unknown action or malformed request
    #[error("{0}")]
    InvalidRequest(String),

    /// Lookup or removal of a key that is not live
    #[error("Key not found")]
    NotFound(String),

    /// Rejected by the API key gate
    #[error("Unauthorized")]
    Unauthorized,

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    // == Client Message ==
    /// The message carried by the failure envelope.
    pub fn client_message(&self) -> String {
        match self {
            CacheError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// HTTP status the controller answers with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Unauthorized => StatusCode::UNAUTHORIZED,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Internal(format!("serialization failed: {}", err))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::<()>::failure(self.client_message()));
        (self.status_code(), body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (CacheError::InvalidRequest("bad".into()), StatusCode::BAD_REQUEST),
            (CacheError::NotFound("key".into()), StatusCode::NOT_FOUND),
            (CacheError::Unauthorized, StatusCode::UNAUTHORIZED),
            (CacheError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected_status) in test_cases {
            assert_eq!(error.into_response().status(), expected_status);
        }
    }

    #[test]
    fn test_client_messages() {
        assert_eq!(
            CacheError::InvalidRequest("Key is required".into()).client_message(),
            "Key is required"
        );
        assert_eq!(CacheError::NotFound("k".into()).client_message(), "Key not found");
        assert_eq!(
            CacheError::Internal("db exploded at 0xdead".into()).client_message(),
            INTERNAL_ERROR_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_error_body_is_failure_envelope() {
        let response = CacheError::Internal("secret detail".into()).into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["message"], INTERNAL_ERROR_MESSAGE);
        assert!(json.get("data").is_none());
        assert!(json["timestamp"].is_string());
    }
}
