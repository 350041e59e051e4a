//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;

/// Timing for the cleanup loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupSchedule {
    /// Wait between sweeps
    pub interval: Duration,
    /// Wait after a failed sweep before retrying
    pub retry_backoff: Duration,
}

impl CleanupSchedule {
    pub fn new(interval: Duration, retry_backoff: Duration) -> Self {
        Self {
            interval,
            retry_backoff,
        }
    }
}

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// The task sleeps for `schedule.interval`, sweeps, and repeats until `cancel`
/// fires. A sweep that panics is logged and retried after
/// `schedule.retry_backoff`; the loop itself never dies. Each removal is its
/// own atomic map operation, so lookups and writes proceed during a sweep.
///
/// # Example
/// ```ignore
/// let store = Arc::new(CacheStore::new());
/// let token = CancellationToken::new();
/// let handle = spawn_cleanup_task(store.clone(), schedule, token.clone());
/// // Later, during shutdown:
/// token.cancel();
/// handle.await?;
/// ```
pub fn spawn_cleanup_task(
    cache: Arc<CacheStore>,
    schedule: CleanupSchedule,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    spawn_sweeper(schedule, cancel, move || cache.cleanup_expired())
}

/// Drives `sweep` on `schedule` until `cancel` fires.
fn spawn_sweeper<F>(
    schedule: CleanupSchedule,
    cancel: CancellationToken,
    sweep: F,
) -> JoinHandle<()>
where
    F: Fn() -> usize + Send + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {:?}",
            schedule.interval
        );

        let mut wait = schedule.interval;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(wait) => {}
            }

            wait = match run_sweep(&sweep) {
                Ok(0) => {
                    debug!("TTL cleanup: no expired entries found");
                    schedule.interval
                }
                Ok(removed) => {
                    info!("TTL cleanup: removed {} expired entries", removed);
                    schedule.interval
                }
                Err(reason) => {
                    warn!(
                        "TTL cleanup failed ({}), retrying in {:?}",
                        reason, schedule.retry_backoff
                    );
                    schedule.retry_backoff
                }
            };
        }

        info!("TTL cleanup task stopped");
    })
}

/// Runs one sweep, turning a panic into an error.
fn run_sweep<F: Fn() -> usize>(sweep: &F) -> Result<usize, String> {
    panic::catch_unwind(AssertUnwindSafe(sweep)).map_err(|payload| {
        payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string())
    })
}
