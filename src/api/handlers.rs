//! API Handlers
//!
//! HTTP request handlers. Each one builds a `CacheRequest` and hands it to the
//! shared dispatcher; errors become envelopes with the matching status code.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::cache::CacheStore;
use crate::dispatch::RequestDispatcher;
use crate::error::{CacheError, Result};
use crate::models::{ApiResponse, CacheRequest, HealthResponse, SearchQuery, SetRequest};

type Envelope = Json<ApiResponse<Value>>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Dispatcher over the shared cache store
    pub dispatcher: Arc<RequestDispatcher>,
    /// Expected `X-API-Key` value, None when authentication is off
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    /// Creates a new AppState over the given store, without authentication.
    pub fn new(cache: Arc<CacheStore>) -> Self {
        Self {
            dispatcher: Arc::new(RequestDispatcher::new(cache)),
            api_key: None,
        }
    }

    /// Requires `X-API-Key: <key>` on cache routes.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(Arc::from(key.into()));
        self
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(cache: Arc<CacheStore>, config: &crate::config::Config) -> Self {
        let state = Self::new(cache);
        match &config.api_key {
            Some(key) => state.with_api_key(key.clone()),
            None => state,
        }
    }

    fn dispatch(&self, request: CacheRequest) -> Result<Envelope> {
        self.dispatcher.dispatch(request).map(Json)
    }
}

/// Handler for POST /cache
pub async fn set_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<SetRequest>, JsonRejection>,
) -> Result<Envelope> {
    let Json(req) = body.map_err(|rejection| {
        debug!("Rejecting set body: {}", rejection);
        CacheError::InvalidRequest("Invalid request format".to_string())
    })?;
    state.dispatch(req.into())
}

/// Handler for GET /cache/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Envelope> {
    state.dispatch(CacheRequest::new("get").with_key(key))
}

/// Handler for DELETE /cache/:key
pub async fn remove_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Envelope> {
    state.dispatch(CacheRequest::new("remove").with_key(key))
}

/// Handler for GET /cache/exists/:key
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Envelope> {
    state.dispatch(CacheRequest::new("exists").with_key(key))
}

/// Handler for POST /cache/flush
pub async fn flush_handler(State(state): State<AppState>) -> Result<Envelope> {
    state.dispatch(CacheRequest::new("flush"))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Envelope> {
    state.dispatch(CacheRequest::new("stats"))
}

/// Handler for GET /cache/all
pub async fn all_handler(State(state): State<AppState>) -> Result<Envelope> {
    state.dispatch(CacheRequest::new("all"))
}

/// Handler for GET /cache/search?pattern=
pub async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Envelope> {
    let mut request = CacheRequest::new("search");
    if let Some(pattern) = query.pattern {
        request = request.with_pattern(pattern);
    }
    state.dispatch(request)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
