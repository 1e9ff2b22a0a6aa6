//! # Key-Value Storage
//!
//! The persistence seam every store writes through.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  AuthStore ──┐                                                          │
//! │  DataStore ──┼──► Arc<dyn KeyValueStore> ──┬──► SqliteKeyValueStore     │
//! │  NotifStore ─┤     get / set / remove      │      (catalog-db, kv_store)│
//! │  ThemeStore ─┘                             └──► MemoryKeyValueStore     │
//! │                                                   (tests)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each collection is one JSON document under one key; a mutation rewrites
//! the whole document.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use catalog_db::{Database, DbConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Keys
// =============================================================================

/// Storage keys.
pub mod keys {
    pub const PRODUCTS: &str = "products";
    pub const CATEGORIES: &str = "categories";
    pub const SELLERS: &str = "sellers";
    pub const NOTIFICATIONS: &str = "notifications";
    /// The session user.
    pub const USER: &str = "user";
    /// The registered-user list.
    pub const USERS: &str = "users";
    pub const THEME: &str = "theme";
}

// =============================================================================
// Trait
// =============================================================================

/// String documents by key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the document under `key`.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` under `key`, replacing what was there.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes the document under `key`. Missing keys are not an error.
    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Releases the backing resources.
    async fn close(&self) {}
}

/// The handle the stores share.
pub type SharedStorage = Arc<dyn KeyValueStore>;

// =============================================================================
// JSON Helpers
// =============================================================================

/// Reads and deserializes the document under `key`.
///
/// `None` only when nothing is stored. A document that is present but no
/// longer parses is a `Serialization` error: falling back to defaults would
/// let the next write replace it.
pub async fn load_json<T: DeserializeOwned>(
    storage: &dyn KeyValueStore,
    key: &str,
) -> StoreResult<Option<T>> {
    let Some(raw) = storage.get(key).await? else {
        return Ok(None);
    };

    serde_json::from_str(&raw).map(Some).map_err(|e| {
        error!(key = %key, error = %e, "Stored document is unreadable");
        StoreError::Serialization(format!("document '{key}': {e}"))
    })
}

/// Serializes `value` and writes it under `key`.
pub async fn save_json<T: Serialize + ?Sized>(
    storage: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw).await
}

// =============================================================================
// SQLite
// =============================================================================

/// Storage backed by the `kv_store` table.
#[derive(Debug, Clone)]
pub struct SqliteKeyValueStore {
    db: Database,
}

impl SqliteKeyValueStore {
    /// Opens (creating if needed) the database described by `config`.
    pub async fn open(config: DbConfig) -> StoreResult<Self> {
        let db = Database::new(config).await?;
        Ok(SqliteKeyValueStore { db })
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.db
            .kv()
            .get(key)
            .await
            .map_err(|e| StoreError::persistence(key, e))
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.db
            .kv()
            .set(key, value)
            .await
            .map_err(|e| StoreError::persistence(key, e))
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.db
            .kv()
            .remove(key)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::persistence(key, e))
    }

    async fn close(&self) {
        self.db.close().await;
    }
}

// =============================================================================
// In-Memory
// =============================================================================

/// Storage held in a `HashMap`.
///
/// `fail_writes(true)` makes every `set` / `remove` fail, which is how the
/// stores' behaviour on a failed write is exercised.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the given documents already stored.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        MemoryKeyValueStore {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    /// Makes subsequent writes fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_writable(&self, key: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::persistence(key, "storage is read-only"));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check_writable(key)?;
        debug!(key = %key, bytes = value.len(), "Writing document to memory");
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.check_writable(key)?;
        self.entries.lock().await.remove(key);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::Category;

    #[tokio::test]
    async fn test_memory_fail_switch() {
        let storage = MemoryKeyValueStore::new();
        storage.set(keys::THEME, "dark").await.unwrap();

        storage.fail_writes(true);
        let err = storage.set(keys::THEME, "light").await.unwrap_err();
        assert!(matches!(err, StoreError::Persistence { ref key, .. } if key == "theme"));
        assert!(storage.remove(keys::THEME).await.is_err());

        assert_eq!(storage.get(keys::THEME).await.unwrap().as_deref(), Some("dark"));
        assert_eq!(storage.write_count(), 1);
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let storage = MemoryKeyValueStore::new();
        let categories = vec![Category {
            id: "c-1".into(),
            name: "Books".into(),
        }];

        save_json(&storage, keys::CATEGORIES, &categories).await.unwrap();
        let loaded: Option<Vec<Category>> = load_json(&storage, keys::CATEGORIES).await.unwrap();
        assert_eq!(loaded, Some(categories));

        let missing: Option<Vec<Category>> = load_json(&storage, keys::SELLERS).await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_unreadable_document_is_an_error() {
        let storage = MemoryKeyValueStore::with_entries([(keys::PRODUCTS, "{not json")]);
        let loaded: StoreResult<Option<Vec<Category>>> = load_json(&storage, keys::PRODUCTS).await;
        assert!(matches!(loaded, Err(StoreError::Serialization(ref m)) if m.contains("products")));
        assert_eq!(
            storage.get(keys::PRODUCTS).await.unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[tokio::test]
    async fn test_sqlite_store() {
        let storage = SqliteKeyValueStore::open(DbConfig::in_memory()).await.unwrap();

        storage.set(keys::USER, "{}").await.unwrap();
        assert_eq!(storage.get(keys::USER).await.unwrap().as_deref(), Some("{}"));

        storage.remove(keys::USER).await.unwrap();
        storage.remove(keys::USER).await.unwrap();
        assert_eq!(storage.get(keys::USER).await.unwrap(), None);
        assert!(storage.database().health_check().await);

        storage.close().await;
        assert!(storage.get(keys::USER).await.is_err());
    }
}
