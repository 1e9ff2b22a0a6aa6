//! Bundled seed data.
//!
//! The initial users and catalog, compiled into the binary. A store starts
//! from these only when storage holds nothing under the matching key.

use catalog_core::{Category, Product, Seller, User};
use serde::de::DeserializeOwned;

use crate::error::StoreResult;

const USERS_JSON: &str = include_str!("../data/users.json");
const PRODUCTS_JSON: &str = include_str!("../data/products.json");
const CATEGORIES_JSON: &str = include_str!("../data/categories.json");
const SELLERS_JSON: &str = include_str!("../data/sellers.json");

/// The bundled collections, parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedData {
    pub users: Vec<User>,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub sellers: Vec<Seller>,
}

impl SeedData {
    /// Parses the bundled files.
    pub fn bundled() -> StoreResult<Self> {
        Ok(SeedData {
            users: parse(USERS_JSON)?,
            products: parse(PRODUCTS_JSON)?,
            categories: parse(CATEGORIES_JSON)?,
            sellers: parse(SELLERS_JSON)?,
        })
    }

    /// No seed data at all.
    pub fn empty() -> Self {
        Self::default()
    }
}

fn parse<T: DeserializeOwned>(raw: &str) -> StoreResult<Vec<T>> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_data_parses() {
        let seed = SeedData::bundled().unwrap();
        assert!(!seed.users.is_empty());
        assert!(!seed.products.is_empty());
        assert!(!seed.categories.is_empty());
        assert!(!seed.sellers.is_empty());
    }

    #[test]
    fn test_bundled_products_reference_known_names() {
        let seed = SeedData::bundled().unwrap();
        for product in &seed.products {
            assert!(seed.categories.iter().any(|c| c.name == product.category));
            assert!(seed.sellers.iter().any(|s| s.name == product.seller));
            assert!(seed.users.iter().any(|u| u.id == product.created_by));
        }
    }

    #[test]
    fn test_emails_are_unique() {
        let seed = SeedData::bundled().unwrap();
        let mut emails: Vec<&str> = seed.users.iter().map(|u| u.email.as_str()).collect();
        emails.sort_unstable();
        emails.dedup();
        assert_eq!(emails.len(), seed.users.len());
    }
}
