//! # Browse Query
//!
//! Filtering and pagination behind the product list screen.
//!
//! ```text
//! products ──► search ──► category ──► seller ──► price range ──► page N
//!              (name or   ("All" =     ("All" =    (inclusive)    (1-based)
//!               desc)      None)        None)
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;

/// Products per page on the list screen.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Filters chosen on the product list screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ProductQuery {
    /// Case-insensitive substring of the name or description.
    pub search: String,
    /// Exact category name; `None` means all categories.
    pub category: Option<String>,
    /// Exact seller name; `None` means all sellers.
    pub seller: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Money>,
    /// Inclusive upper price bound.
    pub max_price: Option<Money>,
    /// 1-based page number; 0 is treated as 1.
    pub page: usize,
}

impl ProductQuery {
    /// Whether `product` passes every filter (pagination aside).
    pub fn matches(&self, product: &Product) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || product.name.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle);

        let matches_category = self
            .category
            .as_deref()
            .map_or(true, |c| product.category == c);
        let matches_seller = self
            .seller
            .as_deref()
            .map_or(true, |s| product.seller == s);

        let matches_min = self.min_price.map_or(true, |min| product.price >= min);
        let matches_max = self.max_price.map_or(true, |max| product.price <= max);

        matches_search && matches_category && matches_seller && matches_min && matches_max
    }

    /// Filters `products` and cuts out the requested page.
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::query::ProductQuery;
    ///
    /// let page = ProductQuery::default().apply(&[], 10);
    /// assert_eq!(page.total_items, 0);
    /// assert_eq!(page.total_pages, 0);
    /// assert!(page.items.is_empty());
    /// ```
    pub fn apply(&self, products: &[Product], page_size: usize) -> Page<Product> {
        let filtered: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        let page_size = page_size.max(1);
        let page = self.page.max(1);

        let total_items = filtered.len();
        let total_pages = total_items.div_ceil(page_size);
        let items = filtered
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect();

        Page {
            items,
            page,
            total_pages,
            total_items,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}
