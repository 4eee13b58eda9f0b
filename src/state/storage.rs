//! Progress storage implementation
//!
//! This module defines the storage boundary for per-user scenario progress and
//! provides a Redis-backed store for production plus an in-memory store.

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::Mutex;
use tracing::{debug, error};
use crate::config::RedisConfig;
use crate::models::UserProgress;
use crate::utils::errors::Result;

/// Storage for per-user progress records
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Load the progress record for a user, if any
    async fn load_progress(&self, user_id: i64) -> Result<Option<UserProgress>>;

    /// Create or overwrite the progress record for a user
    async fn save_progress(&self, progress: &UserProgress) -> Result<()>;

    /// Remove the progress record for a user
    async fn reset_progress(&self, user_id: i64) -> Result<()>;
}

/// Redis key holding a user's progress
pub fn progress_key(prefix: &str, user_id: i64) -> String {
    format!("{}progress:{}", prefix, user_id)
}

/// Redis-based progress storage
#[derive(Clone)]
pub struct StateStorage {
    /// Redis connection manager
    connection_manager: redis::aio::ConnectionManager,
    /// Redis configuration
    config: RedisConfig,
}

impl StateStorage {
    /// Create a new state storage instance
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    /// Check Redis availability
    pub async fn health_check(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for StateStorage {
    async fn load_progress(&self, user_id: i64) -> Result<Option<UserProgress>> {
        let key = progress_key(&self.config.prefix, user_id);
        debug!(user_id = user_id, key = %key, "Loading progress from Redis");

        let mut conn = self.connection_manager.clone();
        let serialized: Option<String> = match conn.get(&key).await {
            Ok(data) => data,
            Err(e) => {
                error!(user_id = user_id, error = %e, "Failed to get progress from Redis");
                return Err(e.into());
            }
        };

        match serialized {
            Some(data) => {
                let progress: UserProgress = serde_json::from_str(&data).map_err(|e| {
                    error!(user_id = user_id, error = %e, "Failed to deserialize progress");
                    e
                })?;
                debug!(user_id = user_id, scenario = %progress.scenario_name, step = progress.step,
                       "Progress loaded successfully");
                Ok(Some(progress))
            }
            None => {
                debug!(user_id = user_id, "No progress found in Redis");
                Ok(None)
            }
        }
    }

    async fn save_progress(&self, progress: &UserProgress) -> Result<()> {
        let key = progress_key(&self.config.prefix, progress.user_id);
        let serialized = serde_json::to_string(progress)?;
        let mut conn = self.connection_manager.clone();

        let result = if self.config.ttl_seconds > 0 {
            conn.set_ex::<_, _, ()>(&key, serialized, self.config.ttl_seconds).await
        } else {
            conn.set::<_, _, ()>(&key, serialized).await
        };

        match result {
            Ok(()) => {
                debug!(user_id = progress.user_id, step = progress.step, "Progress saved to Redis");
                Ok(())
            }
            Err(e) => {
                error!(user_id = progress.user_id, error = %e, "Failed to save progress to Redis");
                Err(e.into())
            }
        }
    }

    async fn reset_progress(&self, user_id: i64) -> Result<()> {
        let key = progress_key(&self.config.prefix, user_id);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&key).await?;
        debug!(user_id = user_id, deleted = deleted, "Progress reset in Redis");
        Ok(())
    }
}

/// In-memory progress storage for single-process deployments and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStorage {
    records: Arc<Mutex<HashMap<i64, UserProgress>>>,
}

impl MemoryStateStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl ProgressStore for MemoryStateStorage {
    async fn load_progress(&self, user_id: i64) -> Result<Option<UserProgress>> {
        Ok(self.records.lock().await.get(&user_id).cloned())
    }

    async fn save_progress(&self, progress: &UserProgress) -> Result<()> {
        self.records.lock().await.insert(progress.user_id, progress.clone());
        Ok(())
    }

    async fn reset_progress(&self, user_id: i64) -> Result<()> {
        self.records.lock().await.remove(&user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_key_format() {
        assert_eq!(progress_key("scenariobot:", 42), "scenariobot:progress:42");
    }

    #[tokio::test]
    async fn test_memory_store_upsert_and_reset() {
        let store = MemoryStateStorage::new();
        assert!(store.load_progress(1).await.unwrap().is_none());

        let mut progress = UserProgress::new(1, "welcome");
        store.save_progress(&progress).await.unwrap();
        progress.advance();
        store.save_progress(&progress).await.unwrap();

        let loaded = store.load_progress(1).await.unwrap().unwrap();
        assert_eq!(loaded.step, 1);
        assert_eq!(store.len().await, 1);

        store.reset_progress(1).await.unwrap();
        assert!(store.load_progress(1).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }
}
