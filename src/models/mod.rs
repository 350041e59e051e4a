//! Request and Response models for the cache server
//!
//! This module defines the DTOs (Data Transfer Objects) shared by the IPC and
//! HTTP transports.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CacheRequest, SearchQuery, SetRequest};
pub use responses::{ApiResponse, HealthResponse};
