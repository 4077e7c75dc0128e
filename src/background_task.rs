use tokio::time::{interval, Duration};

use crate::kv::memory_store::MemoryStore;

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Evicts expired entries from the in-memory store so that keys which are
/// never read again do not accumulate.
pub async fn start_purge_task(store: MemoryStore) {
    let mut interval = interval(PURGE_INTERVAL);

    loop {
        interval.tick().await;

        let purged = store.purge_expired();
        if purged > 0 {
            tracing::debug!("Purged {} expired KV entries ({} live)", purged, store.len());
        }
    }
}
