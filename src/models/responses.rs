//! Response DTOs for the cache server
//!
//! Every cache operation answers with the same envelope on both transports.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Uniform response envelope: `{success, data?, message?, timestamp}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: Utc::now(),
        }
    }

    /// Successful response carrying only a message.
    pub fn ok_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            timestamp: Utc::now(),
        }
    }

    /// Failed response with a caller-facing message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope_serialize() {
        let json = serde_json::to_value(ApiResponse::ok(json!({"a": 1}))).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], json!({"a": 1}));
        assert!(json.get("message").is_none());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_ok_false_data_is_kept() {
        let json = serde_json::to_value(ApiResponse::ok(false)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], false);
    }

    #[test]
    fn test_failure_envelope_serialize() {
        let json = serde_json::to_value(ApiResponse::<()>::failure("Key not found")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Key not found");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_with_message() {
        let resp = ApiResponse::ok(true).with_message("done");
        assert_eq!(resp.message.as_deref(), Some("done"));
        assert_eq!(resp.data, Some(true));
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
