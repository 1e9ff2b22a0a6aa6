//! # Store Error Type
//!
//! What every store operation returns on failure.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Catalog                            │
//! │                                                                         │
//! │  ProductForm::validate ─── ValidationError ──┐                          │
//! │  ensure_owner ─────────── CoreError ─────────┤                          │
//! │  KeyValueStore::set ───── DbError ───────────┼──► StoreError            │
//! │  serde_json ───────────── serde error ───────┤        │                 │
//! │  argon2 / toml / io ──────────────────────────┘        ▼                 │
//! │                                               code() + Display          │
//! │                                               shown by the screen       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use catalog_core::{CoreError, ValidationError};
use catalog_db::DbError;
use serde::Serialize;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Form input failed validation; nothing was changed.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No record with that id (or email).
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Registration or profile update with an email another user holds.
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// A category or seller with that name already exists.
    #[error("{entity} already exists: {name}")]
    DuplicateName { entity: &'static str, name: String },

    /// Unknown email or wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The operation needs a logged-in user.
    #[error("Not logged in")]
    NotAuthenticated,

    /// The actor does not own the record.
    #[error("User {actor} may not modify {resource}")]
    Forbidden { actor: String, resource: String },

    /// Writing to (or reading from) storage failed.
    ///
    /// The in-memory state keeps the change that triggered the write.
    #[error("Failed to persist '{key}': {reason}")]
    Persistence { key: String, reason: String },

    /// A stored document could not be (de)serialized.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    Password(String),
}

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    NotFound,
    Conflict,
    Unauthorized,
    Forbidden,
    StorageError,
    Internal,
}

impl StoreError {
    /// Creates a NotFound error.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates a Persistence error for `key`.
    pub fn persistence(key: impl Into<String>, reason: impl ToString) -> Self {
        StoreError::Persistence {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// The code a caller can branch on.
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::Validation(_) => ErrorCode::ValidationError,
            StoreError::NotFound { .. } => ErrorCode::NotFound,
            StoreError::DuplicateEmail(_) | StoreError::DuplicateName { .. } => {
                ErrorCode::Conflict
            }
            StoreError::InvalidCredentials | StoreError::NotAuthenticated => {
                ErrorCode::Unauthorized
            }
            StoreError::Forbidden { .. } => ErrorCode::Forbidden,
            StoreError::Persistence { .. } => ErrorCode::StorageError,
            StoreError::Serialization(_) | StoreError::Config(_) | StoreError::Password(_) => {
                ErrorCode::Internal
            }
        }
    }
}

impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotOwner { actor, resource } => StoreError::Forbidden { actor, resource },
            CoreError::Validation(e) => StoreError::Validation(e),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        StoreError::Persistence {
            key: "database".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}
