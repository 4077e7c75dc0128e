use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use async_trait::async_trait;
use dashmap::DashMap;

use crate::{errors::StoreError, repositories::kv_store::KeyValueStore};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// Process-local store with per-entry expiry. Used for local runs and tests;
/// state is lost on restart and not shared between instances.
#[derive(Clone, Default)]
pub struct MemoryStore {
    map: Arc<DashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.map.len();
        self.map.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.map.len())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.map.iter().map(|entry| entry.key().clone()).collect()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();
        match self.map.get(key) {
            Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
            Some(_) => {}
            None => return Ok(None),
        }

        // Expired: evict lazily, unless it was rewritten in the meantime.
        self.map.remove_if(key, |_, entry| entry.expires_at <= now);
        Ok(None)
    }

    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), StoreError> {
        let expires_at = Instant::now() + Duration::from_secs(ttl_secs);
        self.map.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }
}
