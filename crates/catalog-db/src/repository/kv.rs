//! # Key-Value Repository
//!
//! String documents addressed by key, stored in the `kv_store` table.
//!
//! The repository knows nothing about what the documents contain; the
//! stores above it serialize whole collections to JSON and write them here
//! in one statement, so a reader never sees half of a collection.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for the `kv_store` table.
#[derive(Debug, Clone)]
pub struct KeyValueRepository {
    pool: SqlitePool,
}

impl KeyValueRepository {
    /// Creates a new KeyValueRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KeyValueRepository { pool }
    }

    /// Reads the document stored under `key`, if any.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Writes `value` under `key`, replacing any previous document.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing document");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes the document under `key`.
    ///
    /// ## Returns
    /// `true` if a document was removed.
    pub async fn remove(&self, key: &str) -> DbResult<bool> {
        debug!(key = %key, "Removing document");

        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists every stored key in ascending order.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let db = db().await;
        assert_eq!(db.kv().get("products").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let db = db().await;
        let kv = db.kv();

        kv.set("theme", "\"light\"").await.unwrap();
        kv.set("theme", "\"dark\"").await.unwrap();

        assert_eq!(kv.get("theme").await.unwrap().as_deref(), Some("\"dark\""));
        assert_eq!(kv.keys().await.unwrap(), vec!["theme".to_string()]);
    }

    #[tokio::test]
    async fn test_remove() {
        let db = db().await;
        let kv = db.kv();

        kv.set("user", "{}").await.unwrap();
        kv.set("products", "[]").await.unwrap();

        assert!(kv.remove("user").await.unwrap());
        assert!(!kv.remove("user").await.unwrap());
        assert_eq!(kv.get("user").await.unwrap(), None);
        assert_eq!(kv.keys().await.unwrap(), vec!["products".to_string()]);
    }
}
