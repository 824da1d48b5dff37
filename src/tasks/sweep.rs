//! Expiry Sweep Task
//!
//! Background task that periodically purges expired records so they do not
//! hold capacity until the next fetch finds them.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{Clock, RecordKey, SharedBubbleCache};

/// Spawns a background task that purges expired records every
/// `interval_secs` seconds.
///
/// The engine lock is held only for the duration of each purge. The returned
/// handle is aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache: SharedBubbleCache<String, String> = SharedBubbleCache::new(1000, 300);
/// let sweep_handle = spawn_sweep_task(cache.clone(), 1);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task<K, V, C>(
    cache: SharedBubbleCache<K, V, C>,
    interval_secs: u64,
) -> JoinHandle<()>
where
    K: RecordKey + Send + 'static,
    V: Send + 'static,
    C: Clock + Send + 'static,
{
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired();

            if removed > 0 {
                info!("Expiry sweep: removed {} expired records", removed);
            } else {
                debug!("Expiry sweep: no expired records found");
            }
        }
    })
}
