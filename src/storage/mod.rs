//! Persistence gateway: the async key/value contract saved versions go through.
//!
//! DESIGN
//! ======
//! The planner never talks to storage directly. [`PersistenceGateway`] is a
//! four-operation key/value contract (`get`, `set`, `delete`, `list`) and is
//! injected as `Arc<dyn PersistenceGateway>`. Missing keys are not errors:
//! `get` returns `None` and `delete` returns `false`. Adapters:
//!
//! - [`MemoryStore`]: in-process map, for tests and ephemeral sessions.
//! - [`file::FileStore`]: one JSON file per key in a data directory.
//! - [`postgres::PgStore`]: the `seating_events` table via `sqlx`.

pub mod file;
pub mod postgres;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::ErrorCode;

pub use file::FileStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
    #[error("value could not be stored: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ErrorCode for GatewayError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "E_STORAGE_IO",
            Self::Database(_) => "E_DATABASE",
            Self::InvalidKey(_) => "E_INVALID_KEY",
            Self::Encode(_) => "E_STORAGE_ENCODE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Database(_))
    }
}

/// A stored key and its raw value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub key: String,
    pub value: String,
}

/// Async key/value persistence.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Fetch a value; `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<StoredEntry>, GatewayError>;

    /// Insert or replace a value.
    async fn set(&self, key: &str, value: &str) -> Result<StoredEntry, GatewayError>;

    /// Remove a key; `false` when it was absent.
    async fn delete(&self, key: &str) -> Result<bool, GatewayError>;

    /// All keys starting with `prefix`, in no guaranteed order.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, GatewayError>;
}

// =============================================================================
// MEMORY
// =============================================================================

/// Gateway backed by an in-process ordered map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl PersistenceGateway for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<StoredEntry>, GatewayError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).map(|value| StoredEntry { key: key.to_owned(), value: value.clone() }))
    }

    async fn set(&self, key: &str, value: &str) -> Result<StoredEntry, GatewayError> {
        self.entries.write().await.insert(key.to_owned(), value.to_owned());
        Ok(StoredEntry { key: key.to_owned(), value: value.to_owned() })
    }

    async fn delete(&self, key: &str) -> Result<bool, GatewayError> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, GatewayError> {
        let entries = self.entries.read().await;
        Ok(entries.keys().filter(|k| k.starts_with(prefix)).cloned().collect())
    }
}
