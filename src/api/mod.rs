//! API Module
//!
//! HTTP handlers and routing for the cache server REST API. All cache routes
//! funnel into the same dispatcher as the IPC transport.
//!
//! # Endpoints
//! - `POST /cache`, `GET|DELETE /cache/:key`, `GET /cache/exists/:key`
//! - `POST /cache/flush`, `GET /cache/stats`, `GET /cache/all`
//! - `GET /cache/search?pattern=`
//! - `GET /health`

pub mod auth;
pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
