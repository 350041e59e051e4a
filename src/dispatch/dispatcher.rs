//! Request Dispatcher
//!
//! Turns a decoded `CacheRequest` into a store operation and a response
//! envelope. Both transports go through here.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error};

use crate::cache::CacheStore;
use crate::dispatch::Action;
use crate::error::{CacheError, Result};
use crate::models::{ApiResponse, CacheRequest};

const KEY_REQUIRED: &str = "Key is required";
const PATTERN_REQUIRED: &str = "Pattern is required";

/// Maps actions onto a shared `CacheStore`.
#[derive(Debug, Clone)]
pub struct RequestDispatcher {
    store: Arc<CacheStore>,
}

impl RequestDispatcher {
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self { store }
    }

    /// The store this dispatcher operates on.
    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    // == Handle ==
    /// Runs a request and always returns an envelope.
    ///
    /// Failures become `success: false` with a caller-safe message.
    pub fn handle(&self, request: CacheRequest) -> ApiResponse<Value> {
        envelope(self.dispatch(request))
    }

    // == Dispatch ==
    /// Runs a request, keeping the error kind for transports that need it
    /// (the HTTP layer maps it to a status code).
    ///
    /// Panics inside an operation are caught here and reported as internal
    /// errors.
    pub fn dispatch(&self, request: CacheRequest) -> Result<ApiResponse<Value>> {
        let action = request.action.clone();
        run_guarded(&action, || self.execute(request))
    }

    fn execute(&self, request: CacheRequest) -> Result<ApiResponse<Value>> {
        let CacheRequest {
            action,
            key,
            value,
            ttl,
            pattern,
        } = request;

        let action = action.parse::<Action>()?;
        debug!("Executing {}", action);

        match action {
            Action::Get => {
                let key = required(key, KEY_REQUIRED)?;
                match self.store.get(&key) {
                    Some(item) => Ok(ApiResponse::ok(serde_json::to_value(item)?)),
                    None => Err(CacheError::NotFound(key)),
                }
            }
            Action::Set => {
                let key = required(key, KEY_REQUIRED)?;
                if !self.store.set(&key, value.unwrap_or(Value::Null), ttl) {
                    return Err(CacheError::InvalidRequest(KEY_REQUIRED.to_string()));
                }
                Ok(ApiResponse::ok(Value::Bool(true)).with_message("Key set successfully"))
            }
            Action::Remove => {
                let key = required(key, KEY_REQUIRED)?;
                if self.store.remove(&key) {
                    Ok(ApiResponse::ok(Value::Bool(true)).with_message("Key removed successfully"))
                } else {
                    Err(CacheError::NotFound(key))
                }
            }
            Action::Exists => {
                // Never a not-found error: a miss is `data: false`.
                let key = required(key, KEY_REQUIRED)?;
                Ok(ApiResponse::ok(Value::Bool(self.store.exists(&key))))
            }
            Action::Flush => {
                self.store.flush();
                Ok(ApiResponse::ok_message("Cache flushed successfully"))
            }
            Action::Stats => Ok(ApiResponse::ok(serde_json::to_value(self.store.stats())?)),
            Action::All => Ok(ApiResponse::ok(serde_json::to_value(self.store.get_all())?)),
            Action::Search => {
                let pattern = required(pattern, PATTERN_REQUIRED)?;
                Ok(ApiResponse::ok(serde_json::to_value(self.store.search(&pattern))?))
            }
        }
    }
}

/// Runs `op`, turning a panic into `CacheError::Internal` and logging the
/// outcome. Internal details go to the log only.
fn run_guarded<F>(action: &str, op: F) -> Result<ApiResponse<Value>>
where
    F: FnOnce() -> Result<ApiResponse<Value>>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(op))
        .unwrap_or_else(|payload| Err(CacheError::Internal(panic_message(payload.as_ref()))));

    match &outcome {
        Err(CacheError::Internal(detail)) => {
            error!("Request '{}' failed: {}", action, detail);
        }
        Err(e) => debug!("Request '{}' rejected: {}", action, e),
        Ok(_) => debug!("Request '{}' handled", action),
    }
    outcome
}

/// Collapses an outcome into the envelope sent to callers.
fn envelope(outcome: Result<ApiResponse<Value>>) -> ApiResponse<Value> {
    outcome.unwrap_or_else(|e| ApiResponse::failure(e.client_message()))
}

/// Rejects absent and empty fields with `message`.
fn required(field: Option<String>, message: &str) -> Result<String> {
    field
        .filter(|value| !value.is_empty())
        .ok_or_else(|| CacheError::InvalidRequest(message.to_string()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panic: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panic: {}", msg)
    } else {
        "panic with non-string payload".to_string()
    }
}
