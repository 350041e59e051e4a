//! Request DTOs for the cache server
//!
//! Defines the transport-neutral request handled by the dispatcher and the
//! HTTP bodies that are converted into it.

use serde::Deserialize;
use serde_json::Value;

/// A decoded request, as read from one IPC line or built by the HTTP layer.
///
/// # Fields
/// - `action`: one of get, set, remove, exists, flush, stats, all, search
/// - `key`: target key for single-key actions
/// - `value`: payload for `set`
/// - `ttl`: TTL in seconds for `set`; absent or 0 means no expiry
/// - `pattern`: key regex for `search`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CacheRequest {
    pub action: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub ttl: Option<u64>,
    #[serde(default)]
    pub pattern: Option<String>,
}

impl CacheRequest {
    /// Creates a request carrying only an action.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_ttl(mut self, ttl: Option<u64>) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

/// Request body for `POST /cache`
///
/// Missing fields decode to defaults so that validation happens in the
/// dispatcher and produces the usual envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl From<SetRequest> for CacheRequest {
    fn from(req: SetRequest) -> Self {
        CacheRequest::new("set")
            .with_key(req.key)
            .with_value(req.value)
            .with_ttl(req.ttl)
    }
}

/// Query string for `GET /cache/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub pattern: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cache_request_deserialize_full() {
        let line = r#"{"action":"set","key":"user:1","value":{"name":"ada"},"ttl":30}"#;
        let req: CacheRequest = serde_json::from_str(line).unwrap();

        assert_eq!(req.action, "set");
        assert_eq!(req.key.as_deref(), Some("user:1"));
        assert_eq!(req.value, Some(json!({"name": "ada"})));
        assert_eq!(req.ttl, Some(30));
        assert!(req.pattern.is_none());
    }

    #[test]
    fn test_cache_request_deserialize_minimal() {
        let req: CacheRequest = serde_json::from_str(r#"{"action":"stats"}"#).unwrap();
        assert_eq!(req, CacheRequest::new("stats"));
    }

    #[test]
    fn test_cache_request_requires_action() {
        assert!(serde_json::from_str::<CacheRequest>(r#"{"key":"a"}"#).is_err());
    }

    #[test]
    fn test_set_request_into_cache_request() {
        let body: SetRequest = serde_json::from_str(r#"{"key":"k","value":[1,2],"ttl":5}"#).unwrap();
        let req = CacheRequest::from(body);

        assert_eq!(req.action, "set");
        assert_eq!(req.key.as_deref(), Some("k"));
        assert_eq!(req.value, Some(json!([1, 2])));
        assert_eq!(req.ttl, Some(5));
    }

    #[test]
    fn test_set_request_missing_key_defaults_empty() {
        let body: SetRequest = serde_json::from_str(r#"{"value":"v"}"#).unwrap();
        assert!(body.key.is_empty());
        assert!(body.ttl.is_none());
    }
}
