use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::registry::MemoryRegistry;
use crate::utils::task::{stopped, TaskHandle};

/// Periodically drop windows idle for longer than `ttl`
pub fn spawn_idle_sweeper(
    registry: Arc<MemoryRegistry>,
    ttl: Duration,
    every: Duration,
) -> TaskHandle {
    info!("Idle conversation sweeper enabled (ttl={:?}, every={:?})", ttl, every);

    TaskHandle::spawn("idle-sweeper", move |mut shutdown| async move {
        let mut ticker = tokio::time::interval(every);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = registry.evict_idle(ttl);
                    debug!("Idle sweep removed {} conversations", removed);
                }
                _ = stopped(&mut shutdown) => break,
            }
        }
    })
}
