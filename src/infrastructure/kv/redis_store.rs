use async_trait::async_trait;
use deadpool_redis::{Config as RedisPoolConfig, Pool, Runtime};
use redis::AsyncCommands;

use crate::{errors::StoreError, repositories::kv_store::KeyValueStore};

#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    pub fn new(pool: Pool) -> Self {
        RedisStore { pool }
    }

    pub fn from_url(url: &str) -> Result<Self, StoreError> {
        let pool = RedisPoolConfig::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(RedisStore::new(pool))
    }

}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.pool.get().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        let _: () = conn.set_ex(key, value, ttl_secs).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
