//! TTL Sweep Task
//!
//! Background task that periodically drops expired sessions from the
//! in-process backend. Redis expires keys on its own and needs no sweep.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryCache;

/// Spawns a background task that periodically removes expired entries.
///
/// The task runs until aborted, sleeping `cleanup_interval_secs` between
/// sweeps. Reads already hide expired entries; the sweep only reclaims memory
/// held by sessions nobody asks for again.
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
pub fn spawn_cleanup_task(cache: MemoryCache, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting session sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired().await;

            if removed > 0 {
                info!("Session sweep: removed {} expired sessions", removed);
            } else {
                debug!("Session sweep: no expired sessions found");
            }
        }
    })
}
