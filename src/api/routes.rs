//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::auth::require_api_key;
use super::handlers::{
    all_handler, exists_handler, flush_handler, get_handler, health_handler, remove_handler,
    search_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /cache` - Store a value
/// - `GET /cache/:key` - Retrieve a value by key
/// - `DELETE /cache/:key` - Remove a key
/// - `GET /cache/exists/:key` - Check whether a key is live
/// - `POST /cache/flush` - Remove every entry
/// - `GET /cache/stats` - Cache statistics
/// - `GET /cache/all` - Every live entry
/// - `GET /cache/search?pattern=` - Entries whose key matches a regex
/// - `GET /health` - Health check endpoint, never authenticated
///
/// # Middleware
/// - API key gate on `/cache` routes when a key is configured
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cache_routes = Router::new()
        .route("/cache", post(set_handler))
        .route("/cache/flush", post(flush_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache/all", get(all_handler))
        .route("/cache/search", get(search_handler))
        .route("/cache/exists/:key", get(exists_handler))
        .route("/cache/:key", get(get_handler).delete(remove_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .merge(cache_routes)
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
