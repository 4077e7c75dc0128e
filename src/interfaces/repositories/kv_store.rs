use async_trait::async_trait;

use crate::errors::StoreError;

/// Minimal key-value capability used for rate limiting and archival.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, expiring it after `ttl_secs`.
    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), StoreError>;

    /// Reachability check used at startup. Local stores are always up.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
