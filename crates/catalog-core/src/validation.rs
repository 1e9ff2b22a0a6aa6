//! # Validation Module
//!
//! Form validation for the catalog screens.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Screen (TypeScript)                                          │
//! │  └── Immediate per-field feedback                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Loosely-typed form → typed record (ProductDraft)                  │
//! │  └── Field rules (required, regex, length)                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Stores                                                       │
//! │  └── Duplicate email, not-found, ownership                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use catalog_core::validation::{validate_email, validate_password, ProductForm};
//!
//! validate_email("ada@example.com").unwrap();
//! validate_password("Secret1").unwrap();
//!
//! let form = ProductForm {
//!     name: "Desk Lamp".into(),
//!     description: "LED lamp".into(),
//!     price: "24.99".into(),
//!     stock: "4".into(),
//!     category: "Home".into(),
//!     seller: "Lumen Co".into(),
//!     image: "https://img.example.com/lamp.jpg".into(),
//!     is_active: true,
//! };
//! let draft = form.validate().unwrap();
//! assert_eq!(draft.price().cents(), 2499);
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Product;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length accepted by every password field.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum length of a person's name after trimming.
pub const MIN_NAME_LEN: usize = 2;

/// Maximum length of free-text labels (names, categories, sellers).
pub const MAX_LABEL_LEN: usize = 200;

/// Largest price a product form accepts ($1,000,000.00).
pub const MAX_PRICE: Money = Money::from_major(1_000_000);

/// Largest stock a product form accepts.
pub const MAX_STOCK: i64 = 1_000_000;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"))
}

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Account Validators
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Must look like `something@something.something`
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_email;
///
/// assert!(validate_email("ada@example.com").is_ok());
/// assert!(validate_email("ada@example").is_err());
/// assert!(validate_email("").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if !email_regex().is_match(email) {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "please enter a valid email".to_string(),
        });
    }

    Ok(())
}

/// Validates a new password (registration, password change).
///
/// ## Rules
/// - Must not be empty
/// - At least 6 characters
/// - Contains a lowercase letter, an uppercase letter and a digit
pub fn validate_password(password: &str) -> ValidationResult<()> {
    validate_login_password(password)?;

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_lower && has_upper && has_digit) {
        return Err(ValidationError::WeakPassword {
            field: "password".to_string(),
        });
    }

    Ok(())
}

/// Validates a password typed on the login form.
///
/// Only presence and length are checked; strength rules apply to new
/// passwords, not to existing ones.
pub fn validate_login_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

/// Validates a person's display name.
///
/// ## Rules
/// - Must not be empty
/// - At least 2 characters after trimming
pub fn validate_person_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();
    required("name", name)?;

    if name.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::TooShort {
            field: "name".to_string(),
            min: MIN_NAME_LEN,
        });
    }

    if name.chars().count() > MAX_LABEL_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_LABEL_LEN,
        });
    }

    Ok(())
}

/// Validates a category or seller name and returns it trimmed.
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_label;
///
/// assert_eq!(validate_label("category", "  Garden ").unwrap(), "Garden");
/// assert!(validate_label("seller", "   ").is_err());
/// ```
pub fn validate_label(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();
    required(field, value)?;

    if value.chars().count() > MAX_LABEL_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_LABEL_LEN,
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Product Form
// =============================================================================

/// Raw product form as filled in on the add / edit screens.
///
/// Every field is text because that is what the inputs hold; `validate`
/// turns it into a typed [`ProductDraft`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub category: String,
    pub seller: String,
    pub image: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl ProductForm {
    /// Validates every field and builds the typed draft.
    ///
    /// ## Rules
    /// - name, description: required
    /// - price: decimal amount, > 0 and <= [`MAX_PRICE`]
    /// - stock: integer, > 0 and <= [`MAX_STOCK`]
    /// - category, seller, image: required
    ///
    /// The first failing field is reported.
    pub fn validate(&self) -> ValidationResult<ProductDraft> {
        required("name", &self.name)?;
        required("description", &self.description)?;

        let price = Money::parse_major(&self.price).ok_or_else(|| {
            if self.price.trim().is_empty() {
                ValidationError::Required {
                    field: "price".to_string(),
                }
            } else {
                ValidationError::InvalidFormat {
                    field: "price".to_string(),
                    reason: "must be a decimal amount".to_string(),
                }
            }
        })?;
        if !price.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "price".to_string(),
            });
        }
        if price > MAX_PRICE {
            return Err(ValidationError::TooLarge {
                field: "price".to_string(),
                max: MAX_PRICE.to_string(),
            });
        }

        required("stock", &self.stock)?;
        let stock: i64 =
            self.stock
                .trim()
                .parse()
                .map_err(|_| ValidationError::InvalidFormat {
                    field: "stock".to_string(),
                    reason: "must be a whole number".to_string(),
                })?;
        if stock <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "stock".to_string(),
            });
        }
        if stock > MAX_STOCK {
            return Err(ValidationError::TooLarge {
                field: "stock".to_string(),
                max: MAX_STOCK.to_string(),
            });
        }

        let category = validate_label("category", &self.category)?;
        let seller = validate_label("seller", &self.seller)?;
        required("image", &self.image)?;

        Ok(ProductDraft {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price,
            stock,
            category,
            seller,
            image: self.image.trim().to_string(),
            is_active: self.is_active,
        })
    }
}

/// Pre-fills the edit form from an existing product.
impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        ProductForm {
            name: product.name.clone(),
            description: product.description.clone(),
            price: format!("{}.{:02}", product.price.dollars(), product.price.cents_part()),
            stock: product.stock.to_string(),
            category: product.category.clone(),
            seller: product.seller.clone(),
            image: product.image.clone(),
            is_active: product.is_active,
        }
    }
}

/// A validated product record, ready for a store.
///
/// Only obtainable through [`ProductForm::validate`], so holding one proves
/// the field rules passed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) price: Money,
    pub(crate) stock: i64,
    pub(crate) category: String,
    pub(crate) seller: String,
    pub(crate) image: String,
    pub(crate) is_active: bool,
}

impl ProductDraft {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn seller(&self) -> &str {
        &self.seller
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
