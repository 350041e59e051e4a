//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::tasks::CleanupSchedule;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_IPC_PORT: u16 = 6380;
const DEFAULT_CLEANUP_INTERVAL: u64 = 60;
const DEFAULT_CLEANUP_RETRY_BACKOFF: u64 = 5;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// The store is unbounded, so there is no cache size setting.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Listen address of the line-delimited JSON IPC server
    pub ipc_addr: SocketAddr,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Delay in seconds before retrying a failed cleanup
    pub cleanup_retry_backoff: u64,
    /// Required `X-API-Key` header value for HTTP cache routes; None disables the check
    pub api_key: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `IPC_ADDR` - IPC listen address (default: 127.0.0.1:6380)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `CLEANUP_RETRY_BACKOFF` - Retry delay after a failed cleanup (default: 5)
    /// - `API_KEY` - HTTP API key (default: unset, no authentication)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_env("SERVER_PORT").unwrap_or(defaults.server_port),
            ipc_addr: parse_env("IPC_ADDR").unwrap_or(defaults.ipc_addr),
            cleanup_interval: parse_env::<u64>("CLEANUP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cleanup_interval),
            cleanup_retry_backoff: parse_env::<u64>("CLEANUP_RETRY_BACKOFF")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cleanup_retry_backoff),
            api_key: env::var("API_KEY").ok().filter(|key| !key.is_empty()),
        }
    }

    /// Timing for the background cleanup task.
    pub fn cleanup_schedule(&self) -> CleanupSchedule {
        CleanupSchedule::new(
            Duration::from_secs(self.cleanup_interval),
            Duration::from_secs(self.cleanup_retry_backoff),
        )
    }

    /// HTTP listen address on all interfaces.
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.server_port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT,
            ipc_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_IPC_PORT)),
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            cleanup_retry_backoff: DEFAULT_CLEANUP_RETRY_BACKOFF,
            api_key: None,
        }
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
