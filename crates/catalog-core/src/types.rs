//! # Domain Types
//!
//! Core domain types shared by every store.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │    Product      │   │  Notification   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  email (unique) │   │  price (Money)  │   │  user_id        │       │
//! │  │  name           │   │  stock          │   │  kind           │       │
//! │  │  password       │   │  created_by ────┼──►│  read           │       │
//! │  └────────┬────────┘   └─────────────────┘   └─────────────────┘       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  SessionUser    │   │ Category/Seller │   │     Theme       │       │
//! │  │  (no password)  │   │  id, name       │   │  Light | Dark   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Records serialize in camelCase so stored collections and seed files
//! match what the mobile frontend reads (`createdBy`, `isActive`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::money::Money;
use crate::validation::ProductDraft;

// =============================================================================
// Users
// =============================================================================

/// A registered user as held by the auth store.
///
/// `password` is either an argon2 PHC string (`$argon2id$...`) or, for
/// bundled seed users, the plaintext value. It never leaves the auth store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password: String,
}

impl User {
    /// The password-free view exposed to the rest of the application.
    pub fn session(&self) -> SessionUser {
        SessionUser {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// The logged-in user.
///
/// Has no password field at all, so neither the session nor its persisted
/// copy can leak one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Free-form description.
    pub description: String,

    /// Unit price in cents.
    pub price: Money,

    /// Units in stock.
    pub stock: i64,

    /// Category name (matches a `Category::name`).
    pub category: String,

    /// Seller name (matches a `Seller::name`).
    pub seller: String,

    /// Image reference (URI).
    pub image: String,

    /// Whether the product is listed.
    pub is_active: bool,

    /// Id of the user who created the product.
    pub created_by: String,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Builds a new product from a validated draft.
    pub fn from_draft(
        id: impl Into<String>,
        draft: ProductDraft,
        created_by: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Product {
            id: id.into(),
            name: draft.name,
            description: draft.description,
            price: draft.price,
            stock: draft.stock,
            category: draft.category,
            seller: draft.seller,
            image: draft.image,
            is_active: draft.is_active,
            created_by: created_by.into(),
            created_at,
        }
    }

    /// Overwrites every editable field with the draft's values.
    ///
    /// `id`, `created_by` and `created_at` are left untouched.
    pub fn apply_draft(&mut self, draft: ProductDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.price = draft.price;
        self.stock = draft.stock;
        self.category = draft.category;
        self.seller = draft.seller;
        self.image = draft.image;
        self.is_active = draft.is_active;
    }

    /// Inventory value of this line (price × stock).
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.price.multiply_quantity(self.stock)
    }
}

// =============================================================================
// Category / Seller
// =============================================================================

/// A product category. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// A seller. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Seller {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Notification
// =============================================================================

/// The event a notification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum NotificationKind {
    ProductAdded,
    ProductUpdated,
    ProductDeleted,
    ProfileUpdated,
    CategoryAdded,
    SellerAdded,
}

impl NotificationKind {
    /// Stable snake_case name, identical to the serialized form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ProductAdded => "product_added",
            NotificationKind::ProductUpdated => "product_updated",
            NotificationKind::ProductDeleted => "product_deleted",
            NotificationKind::ProfileUpdated => "profile_updated",
            NotificationKind::CategoryAdded => "category_added",
            NotificationKind::SellerAdded => "seller_added",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A feed entry recording a mutation made by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

// =============================================================================
// Theme
// =============================================================================

/// Display theme persisted between sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    pub const fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme: '{}'", other)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Desk Lamp".to_string(),
            description: "LED lamp".to_string(),
            price: Money::from_cents(2499),
            stock: 4,
            category: "Home".to_string(),
            seller: "Lumen Co".to_string(),
            image: "https://img.example.com/lamp.jpg".to_string(),
            is_active: true,
            created_by: "u-1".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_session_has_no_password() {
        let user = User {
            id: "u-1".to_string(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            password: "Secret1".to_string(),
        };

        let json = serde_json::to_string(&user.session()).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("Secret1"));
    }

    #[test]
    fn test_product_wire_format_is_camel_case() {
        let json = serde_json::to_value(sample_product()).unwrap();
        assert_eq!(json["createdBy"], "u-1");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["price"], 2499);
    }

    #[test]
    fn test_stock_value() {
        assert_eq!(sample_product().stock_value().cents(), 9996);
    }

    #[test]
    fn test_notification_kind_serializes_snake_case() {
        let json = serde_json::to_string(&NotificationKind::CategoryAdded).unwrap();
        assert_eq!(json, "\"category_added\"");
        assert_eq!(NotificationKind::ProductDeleted.to_string(), "product_deleted");
    }

    #[test]
    fn test_notification_kind_field_is_named_type() {
        let notification = Notification {
            id: "n-1".to_string(),
            user_id: "u-1".to_string(),
            message: "hello".to_string(),
            kind: NotificationKind::ProfileUpdated,
            timestamp: Utc::now(),
            read: false,
        };
        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["type"], "profile_updated");
        assert_eq!(json["userId"], "u-1");
    }

    #[test]
    fn test_theme_toggle_and_parse() {
        assert_eq!(Theme::default(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
    }
}
