//! # catalog-store: Stores for the Catalog
//!
//! Session, catalog, notification and theme state, each mirrored to the
//! key-value storage on every change.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Catalog::open(config)                         │
//! │                                   │                                     │
//! │        ┌──────────────────────────┼──────────────────────────┐          │
//! │        ▼                          ▼                          ▼          │
//! │  ┌───────────┐  notify   ┌────────────────────┐   notify ┌───────────┐  │
//! │  │ AuthStore │ ────────► │ NotificationStore  │ ◄─────── │ DataStore │  │
//! │  └─────┬─────┘           └─────────┬──────────┘          └─────┬─────┘  │
//! │        │        ┌───────────┐      │                           │        │
//! │        │        │ThemeStore │      │                           │        │
//! │        │        └─────┬─────┘      │                           │        │
//! │        ▼              ▼            ▼                           ▼        │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │        Arc<dyn KeyValueStore>  (SQLite via catalog-db)           │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_store::{Catalog, CatalogConfig};
//!
//! let catalog = Catalog::open(CatalogConfig::load(None)?).await?;
//! let me = catalog.auth.login("john@example.com", "Password123").await?;
//! let stats = catalog.data.statistics(&me).await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod notifications;
pub mod password;
pub mod seed;
pub mod storage;
pub mod theme;

// =============================================================================
// Re-exports
// =============================================================================

pub use auth::AuthStore;
pub use config::{CatalogConfig, PasswordScheme};
pub use data::DataStore;
pub use error::{ErrorCode, StoreError, StoreResult};
pub use notifications::NotificationStore;
pub use seed::SeedData;
pub use storage::{KeyValueStore, MemoryKeyValueStore, SharedStorage, SqliteKeyValueStore};
pub use theme::ThemeStore;

use std::sync::Arc;

use tracing::info;

// =============================================================================
// Application Context
// =============================================================================

/// Every store, wired to one storage.
pub struct Catalog {
    pub auth: AuthStore,
    pub data: DataStore,
    pub notifications: NotificationStore,
    pub theme: ThemeStore,
    storage: SharedStorage,
}

impl Catalog {
    /// Opens the configured database and restores every store from it.
    ///
    /// Creates the database's directory when it does not exist yet.
    pub async fn open(config: CatalogConfig) -> StoreResult<Self> {
        config.validate()?;

        info!(
            path = %config.database_path.display(),
            scheme = %config.password_scheme,
            "Opening catalog"
        );

        config.ensure_data_dir()?;

        let storage: SharedStorage = Arc::new(SqliteKeyValueStore::open(config.db_config()).await?);
        Self::with_storage(storage, &config).await
    }

    /// Builds the stores on an existing storage.
    pub async fn with_storage(storage: SharedStorage, config: &CatalogConfig) -> StoreResult<Self> {
        let seed = if config.load_seed_data {
            SeedData::bundled()?
        } else {
            SeedData::empty()
        };

        let notifications = NotificationStore::load(storage.clone()).await?;
        let auth = AuthStore::load(
            storage.clone(),
            seed.users.clone(),
            notifications.clone(),
            config.password_scheme,
        )
        .await?;
        let data = DataStore::load(storage.clone(), &seed, notifications.clone(), config.page_size).await?;
        let theme = ThemeStore::load(storage.clone()).await?;

        Ok(Catalog {
            auth,
            data,
            notifications,
            theme,
            storage,
        })
    }

    /// Closes the storage. The stores must not be used afterwards.
    pub async fn close(&self) {
        info!("Closing catalog");
        self.storage.close().await;
    }
}
