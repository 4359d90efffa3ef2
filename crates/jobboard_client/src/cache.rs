//! In-memory result cache.
//!
//! Query results are stored as raw `data` JSON keyed by operation name and
//! variables. Results carrying errors never reach the cache.

use crate::error::{ClientError, ClientResult};
use crate::operations::TypedOperation;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// How a query interacts with the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Answer from the cache when possible; otherwise fetch and store.
    #[default]
    CacheFirst,
    /// Always fetch; store the result.
    NetworkOnly,
    /// Always fetch; never read or write the cache.
    NoCache,
}

/// Cache key: operation name plus the serialized variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub operation: &'static str,
    pub variables: String,
}

impl CacheKey {
    pub fn new<Op: TypedOperation>(variables: &Op::Variables) -> ClientResult<Self> {
        let variables =
            serde_json::to_string(variables).map_err(|e| ClientError::serialize(e.to_string()))?;
        Ok(Self {
            operation: Op::OPERATION_NAME,
            variables,
        })
    }
}

/// Shared result cache. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    entries: Arc<RwLock<FxHashMap<CacheKey, serde_json::Value>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn insert(&self, key: CacheKey, data: serde_json::Value) {
        self.entries.write().await.insert(key, data);
    }

    /// Reads a cached result of `Op`.
    pub async fn read_query<Op: TypedOperation>(
        &self,
        variables: &Op::Variables,
    ) -> ClientResult<Option<Op::Response>> {
        let key = CacheKey::new::<Op>(variables)?;
        match self.get(&key).await {
            Some(data) => serde_json::from_value(data)
                .map(Some)
                .map_err(|e| ClientError::deserialize(e.to_string())),
            None => Ok(None),
        }
    }

    /// Writes a result of `Op` as if it had been fetched.
    pub async fn write_query<Op>(
        &self,
        variables: &Op::Variables,
        data: &Op::Response,
    ) -> ClientResult<()>
    where
        Op: TypedOperation,
        Op::Response: serde::Serialize,
    {
        let key = CacheKey::new::<Op>(variables)?;
        let data = serde_json::to_value(data).map_err(|e| ClientError::serialize(e.to_string()))?;
        self.insert(key, data).await;
        Ok(())
    }

    /// Drops the cached result of `Op` for `variables`.
    pub async fn evict<Op: TypedOperation>(&self, variables: &Op::Variables) -> ClientResult<bool> {
        let key = CacheKey::new::<Op>(variables)?;
        Ok(self.entries.write().await.remove(&key).is_some())
    }

    /// Clears the cache.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
