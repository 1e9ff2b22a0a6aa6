//! # Catalog Configuration
//!
//! Settings read once at startup.
//!
//! ## Configuration Sources (later overrides earlier)
//! 1. Defaults (this file)
//! 2. Config file (`catalog.toml`)
//! 3. Environment variables (`CATALOG_*`)
//!
//! ```toml
//! # catalog.toml
//! database_path = "/var/lib/catalog/catalog.db"
//! password_scheme = "argon2"
//! page_size = 10
//! load_seed_data = true
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use catalog_core::query::DEFAULT_PAGE_SIZE;
use catalog_db::DbConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

/// Database path that selects a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// How newly set passwords are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    /// Argon2id PHC string.
    #[default]
    Argon2,
    /// Stored as typed. Matches the bundled seed users.
    Plain,
}

impl fmt::Display for PasswordScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordScheme::Argon2 => write!(f, "argon2"),
            PasswordScheme::Plain => write!(f, "plain"),
        }
    }
}

impl FromStr for PasswordScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "argon2" => Ok(PasswordScheme::Argon2),
            "plain" => Ok(PasswordScheme::Plain),
            other => Err(format!("Unknown password scheme: '{}'", other)),
        }
    }
}

/// Catalog configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// SQLite file; `:memory:` for a throwaway database.
    pub database_path: PathBuf,

    /// Scheme for passwords set by register / change_password.
    pub password_scheme: PasswordScheme,

    /// Products per page when browsing.
    pub page_size: usize,

    /// Start from the bundled users, products, categories and sellers
    /// when storage has none.
    pub load_seed_data: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            database_path: Self::default_database_path(),
            password_scheme: PasswordScheme::default(),
            page_size: DEFAULT_PAGE_SIZE,
            load_seed_data: true,
        }
    }
}

impl CatalogConfig {
    /// Config for tests: in-memory database, seed data loaded.
    pub fn in_memory() -> Self {
        CatalogConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            ..Default::default()
        }
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// `config_path` falls back to the platform config directory; a missing
    /// file is not an error.
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading catalog config from file");
                config = Self::from_toml_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML file. Missing fields keep their defaults.
    pub fn from_toml_file(path: &Path) -> StoreResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses TOML text. Missing fields keep their defaults.
    pub fn from_toml_str(contents: &str) -> StoreResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Rejects settings the stores cannot work with.
    pub fn validate(&self) -> StoreResult<()> {
        if self.page_size == 0 {
            return Err(StoreError::Config(
                "page_size must be greater than 0".into(),
            ));
        }
        if self.database_path.as_os_str().is_empty() {
            return Err(StoreError::Config("database_path is empty".into()));
        }
        Ok(())
    }

    /// Applies `CATALOG_*` overrides looked up through `lookup`.
    ///
    /// - `CATALOG_DB_PATH`
    /// - `CATALOG_PASSWORD_SCHEME` (`argon2` | `plain`)
    /// - `CATALOG_PAGE_SIZE`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("CATALOG_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = PathBuf::from(path);
        }

        if let Some(scheme) = lookup("CATALOG_PASSWORD_SCHEME") {
            match scheme.parse() {
                Ok(parsed) => self.password_scheme = parsed,
                Err(e) => warn!(error = %e, "Ignoring CATALOG_PASSWORD_SCHEME"),
            }
        }

        if let Some(size) = lookup("CATALOG_PAGE_SIZE") {
            match size.parse::<usize>() {
                Ok(n) => self.page_size = n,
                Err(_) => warn!(value = %size, "Ignoring non-numeric CATALOG_PAGE_SIZE"),
            }
        }
    }

    /// Whether the database lives only in memory.
    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY_PATH)
    }

    /// Creates the directory the database file lives in.
    pub fn ensure_data_dir(&self) -> StoreResult<()> {
        if self.is_in_memory() {
            return Ok(());
        }
        if let Some(dir) = self.database_path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }

    /// Database settings derived from this config.
    pub fn db_config(&self) -> DbConfig {
        if self.is_in_memory() {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&self.database_path)
        }
    }

    fn default_database_path() -> PathBuf {
        directories::ProjectDirs::from("com", "catalog", "catalog")
            .map(|dirs| dirs.data_dir().join("catalog.db"))
            .unwrap_or_else(|| PathBuf::from("catalog.db"))
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "catalog", "catalog")
            .map(|dirs| dirs.config_dir().join("catalog.toml"))
    }
}
