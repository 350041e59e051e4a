//! TTL Cache - an in-process key-value cache with time-based expiry
//!
//! Serves one shared store over two transports, a line-delimited JSON IPC
//! channel and an HTTP API, both routed through the same dispatcher.

pub mod api;
pub mod cache;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod ipc;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::CacheStore;
pub use config::Config;
pub use dispatch::RequestDispatcher;
pub use ipc::IpcServer;
pub use tasks::{spawn_cleanup_task, CleanupSchedule};
