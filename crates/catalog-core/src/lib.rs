//! # catalog-core: Pure Business Logic for the Catalog
//!
//! This crate holds the catalog's business logic as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile Screens                               │   │
//! │  │   Login ──► Product List ──► Product Form ──► Analytics        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    catalog-store                                │   │
//! │  │    AuthStore, DataStore, NotificationStore, ThemeStore          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ catalog-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────┐ │   │
//! │  │   │  types   │ │validation│ │  stats   │ │  query   │ │access│ │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘ └──────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Product, Notification, ...)
//! - [`money`] - Integer-cent prices
//! - [`validation`] - Form rules and the typed `ProductDraft`
//! - [`stats`] - Analytics derivation
//! - [`query`] - Product list filtering and pagination
//! - [`access`] - Ownership rule for edits and deletes
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::money::Money;
//! use catalog_core::stats::compute_statistics;
//!
//! let stats = compute_statistics(&[], &[], &[]);
//! assert_eq!(stats.total_value, Money::zero());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod error;
pub mod money;
pub mod query;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use access::{authorize, ensure_owner, Access, Owned};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use query::{Page, ProductQuery};
pub use stats::{compute_statistics, ChartDataPoint, ProductStatistics};
pub use types::*;
pub use validation::{ProductDraft, ProductForm};
