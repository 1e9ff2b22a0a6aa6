//! # Statistics Module
//!
//! Aggregate figures for the analytics screen, derived on demand from a
//! user's products.
//!
//! ## Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Product Statistics                                  │
//! │                                                                         │
//! │  user's products ──┬──► totals    count, Σ stock, Σ price × stock       │
//! │                    ├──► ratios    average price, average stock          │
//! │                    ├──► extremes  highest / lowest price                │
//! │                    └──► buckets   category, seller, price, stock        │
//! │                                                                         │
//! │  Buckets with a zero count are dropped from every distribution.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Average Price
//! `average_price` is **stock-weighted**: `total_value / total_stock`, i.e.
//! the average price of a unit on the shelf, not the mean listed price.
//! The analytics screen has always shown this figure and it is kept as is.
//!
//! ## Units
//! Every monetary field serializes in major units (`40.0` for $40), the
//! same unit as `averagePrice`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Category, Product, Seller};

// =============================================================================
// Output Types
// =============================================================================

/// One bar / slice in a distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChartDataPoint {
    pub label: String,
    pub value: usize,
}

impl ChartDataPoint {
    fn new(label: impl Into<String>, value: usize) -> Self {
        ChartDataPoint {
            label: label.into(),
            value,
        }
    }
}

/// Everything the analytics screen displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductStatistics {
    pub total_products: usize,
    #[serde(with = "crate::money::major_units")]
    #[ts(type = "number")]
    pub total_value: Money,
    pub total_stock: i64,
    /// Stock-weighted average price in major units (see module docs).
    pub average_price: f64,
    #[serde(with = "crate::money::major_units")]
    #[ts(type = "number")]
    pub highest_priced: Money,
    #[serde(with = "crate::money::major_units")]
    #[ts(type = "number")]
    pub lowest_priced: Money,
    pub average_stock: f64,
    pub category_data: Vec<ChartDataPoint>,
    pub seller_data: Vec<ChartDataPoint>,
    pub price_range_data: Vec<ChartDataPoint>,
    pub stock_range_data: Vec<ChartDataPoint>,
}

// =============================================================================
// Buckets
// =============================================================================

/// A fixed half-open range `[min, max)`; `max = None` means unbounded.
struct Bucket {
    label: &'static str,
    min: i64,
    max: Option<i64>,
}

impl Bucket {
    const fn new(label: &'static str, min: i64, max: Option<i64>) -> Self {
        Bucket { label, min, max }
    }

    fn contains(&self, value: i64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value < max)
    }
}

/// Price buckets, bounds in cents.
const PRICE_BUCKETS: [Bucket; 4] = [
    Bucket::new("$0-100", 0, Some(10_000)),
    Bucket::new("$100-500", 10_000, Some(50_000)),
    Bucket::new("$500-1000", 50_000, Some(100_000)),
    Bucket::new("$1000+", 100_000, None),
];

/// Stock buckets: 1-10, 11-50, 51-100, 101 and up. Zero stock is in none.
const STOCK_BUCKETS: [Bucket; 4] = [
    Bucket::new("1-10", 1, Some(11)),
    Bucket::new("11-50", 11, Some(51)),
    Bucket::new("51-100", 51, Some(101)),
    Bucket::new("100+", 101, None),
];

fn distribute(products: &[Product], buckets: &[Bucket], key: fn(&Product) -> i64) -> Vec<ChartDataPoint> {
    buckets
        .iter()
        .map(|bucket| {
            let count = products.iter().filter(|p| bucket.contains(key(p))).count();
            ChartDataPoint::new(bucket.label, count)
        })
        .filter(|point| point.value > 0)
        .collect()
}

/// One point per distinct name, in first-seen order.
fn count_by_name<'a>(
    names: impl Iterator<Item = &'a str>,
    products: &[Product],
    field: fn(&Product) -> &str,
) -> Vec<ChartDataPoint> {
    let mut seen = HashSet::new();
    names
        .filter(|name| seen.insert(*name))
        .map(|name| {
            let count = products.iter().filter(|p| field(p) == name).count();
            ChartDataPoint::new(name, count)
        })
        .filter(|point| point.value > 0)
        .collect()
}

// =============================================================================
// Derivation
// =============================================================================

/// Computes the analytics figures for `products`.
///
/// `categories` and `sellers` are the known lists; their order decides the
/// order of `category_data` / `seller_data`. Products whose category or
/// seller is not in the list are not counted in those distributions.
///
/// ## Example
/// ```rust
/// use catalog_core::stats::compute_statistics;
///
/// let stats = compute_statistics(&[], &[], &[]);
/// assert_eq!(stats.total_products, 0);
/// assert_eq!(stats.average_price, 0.0);
/// assert!(stats.price_range_data.is_empty());
/// ```
pub fn compute_statistics(
    products: &[Product],
    categories: &[Category],
    sellers: &[Seller],
) -> ProductStatistics {
    let total_products = products.len();
    let total_stock = products
        .iter()
        .fold(0i64, |total, p| total.saturating_add(p.stock));
    let total_value: Money = products.iter().map(Product::stock_value).sum();

    let average_price = if total_stock > 0 {
        total_value.as_major() / total_stock as f64
    } else {
        0.0
    };

    let average_stock = if total_products > 0 {
        total_stock as f64 / total_products as f64
    } else {
        0.0
    };

    let highest_priced = products.iter().map(|p| p.price).max().unwrap_or_default();
    let lowest_priced = products.iter().map(|p| p.price).min().unwrap_or_default();

    ProductStatistics {
        total_products,
        total_value,
        total_stock,
        average_price,
        highest_priced,
        lowest_priced,
        average_stock,
        category_data: count_by_name(
            categories.iter().map(|c| c.name.as_str()),
            products,
            |p| p.category.as_str(),
        ),
        seller_data: count_by_name(
            sellers.iter().map(|s| s.name.as_str()),
            products,
            |p| p.seller.as_str(),
        ),
        price_range_data: distribute(products, &PRICE_BUCKETS, |p| p.price.cents()),
        stock_range_data: distribute(products, &STOCK_BUCKETS, |p| p.stock),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(price_major: i64, stock: i64, category: &str, seller: &str) -> Product {
        Product {
            id: uuid::Uuid::new_v4().to_string(),
            name: "Item".to_string(),
            description: "Item".to_string(),
            price: Money::from_major(price_major),
            stock,
            category: category.to_string(),
            seller: seller.to_string(),
            image: "https://img.example.com/item.jpg".to_string(),
            is_active: true,
            created_by: "u-1".to_string(),
            created_at: Utc::now(),
        }
    }

    fn category(name: &str) -> Category {
        Category {
            id: name.to_lowercase(),
            name: name.to_string(),
        }
    }

    fn seller(name: &str) -> Seller {
        Seller {
            id: name.to_lowercase(),
            name: name.to_string(),
        }
    }

    fn labels(points: &[ChartDataPoint]) -> Vec<&str> {
        points.iter().map(|p| p.label.as_str()).collect()
    }

    #[test]
    fn test_totals_and_ratios() {
        let products = vec![product(10, 2, "A", "S"), product(20, 1, "A", "S")];
        let stats = compute_statistics(&products, &[], &[]);

        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.total_stock, 3);
        assert_eq!(stats.total_value, Money::from_major(40));
        assert_eq!(stats.highest_priced, Money::from_major(20));
        assert_eq!(stats.lowest_priced, Money::from_major(10));
        assert!((stats.average_stock - 1.5).abs() < 1e-9);
    }

    /// The average price is weighted by stock: 40 / 3, not (10 + 20) / 2.
    #[test]
    fn test_average_price_is_stock_weighted() {
        let products = vec![product(10, 2, "A", "S"), product(20, 1, "A", "S")];
        let stats = compute_statistics(&products, &[], &[]);

        assert!((stats.average_price - 40.0 / 3.0).abs() < 1e-9);
        assert!((stats.average_price - 15.0).abs() > 1.0);
    }

    #[test]
    fn test_empty_list_yields_zeros() {
        let stats = compute_statistics(&[], &[category("A")], &[seller("S")]);

        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.total_value, Money::zero());
        assert_eq!(stats.highest_priced, Money::zero());
        assert_eq!(stats.lowest_priced, Money::zero());
        assert_eq!(stats.average_price, 0.0);
        assert_eq!(stats.average_stock, 0.0);
        assert!(stats.category_data.is_empty());
        assert!(stats.seller_data.is_empty());
        assert!(stats.price_range_data.is_empty());
        assert!(stats.stock_range_data.is_empty());
    }

    #[test]
    fn test_category_and_seller_counts_drop_zeros() {
        let products = vec![
            product(5, 1, "Books", "Acme"),
            product(5, 1, "Books", "Globex"),
            product(5, 1, "Garden", "Acme"),
            product(5, 1, "Unknown", "Acme"),
        ];
        let categories = vec![category("Books"), category("Toys"), category("Garden")];
        let sellers = vec![seller("Acme"), seller("Initech"), seller("Globex")];

        let stats = compute_statistics(&products, &categories, &sellers);

        assert_eq!(
            stats.category_data,
            vec![
                ChartDataPoint::new("Books", 2),
                ChartDataPoint::new("Garden", 1)
            ]
        );
        assert_eq!(
            stats.seller_data,
            vec![
                ChartDataPoint::new("Acme", 3),
                ChartDataPoint::new("Globex", 1)
            ]
        );
    }

    #[test]
    fn test_price_buckets_boundaries() {
        let products = vec![
            product(0, 1, "A", "S"),
            product(99, 1, "A", "S"),
            product(100, 1, "A", "S"),
            product(499, 1, "A", "S"),
            product(999, 1, "A", "S"),
        ];
        let stats = compute_statistics(&products, &[], &[]);

        assert_eq!(
            stats.price_range_data,
            vec![
                ChartDataPoint::new("$0-100", 2),
                ChartDataPoint::new("$100-500", 2),
                ChartDataPoint::new("$500-1000", 1),
            ]
        );
        assert!(!labels(&stats.price_range_data).contains(&"$1000+"));
    }

    #[test]
    fn test_price_bucket_thousand_is_inclusive() {
        let mut below = product(0, 1, "A", "S");
        below.price = Money::from_cents(99_999);
        let at = product(1000, 1, "A", "S");
        let above = product(25_000, 1, "A", "S");

        let stats = compute_statistics(&[below, at, above], &[], &[]);

        assert_eq!(
            stats.price_range_data,
            vec![
                ChartDataPoint::new("$500-1000", 1),
                ChartDataPoint::new("$1000+", 2),
            ]
        );
    }

    #[test]
    fn test_price_bucket_just_below_hundred() {
        let mut cheap = product(0, 1, "A", "S");
        cheap.price = Money::from_cents(9_999);
        let stats = compute_statistics(&[cheap], &[], &[]);
        assert_eq!(labels(&stats.price_range_data), vec!["$0-100"]);
    }

    #[test]
    fn test_stock_buckets_boundaries() {
        let products = vec![
            product(1, 0, "A", "S"),
            product(1, 1, "A", "S"),
            product(1, 10, "A", "S"),
            product(1, 11, "A", "S"),
            product(1, 50, "A", "S"),
            product(1, 51, "A", "S"),
            product(1, 100, "A", "S"),
            product(1, 101, "A", "S"),
        ];
        let stats = compute_statistics(&products, &[], &[]);

        assert_eq!(
            stats.stock_range_data,
            vec![
                ChartDataPoint::new("1-10", 2),
                ChartDataPoint::new("11-50", 2),
                ChartDataPoint::new("51-100", 2),
                ChartDataPoint::new("100+", 1),
            ]
        );
    }

    #[test]
    fn test_duplicate_known_names_count_once() {
        let products = vec![product(5, 1, "Books", "Acme"), product(5, 1, "Books", "Acme")];
        let categories = vec![category("Books"), category("Books")];
        let sellers = vec![seller("Acme"), seller("Acme")];

        let stats = compute_statistics(&products, &categories, &sellers);

        assert_eq!(stats.category_data, vec![ChartDataPoint::new("Books", 2)]);
        assert_eq!(stats.seller_data, vec![ChartDataPoint::new("Acme", 2)]);
    }

    #[test]
    fn test_huge_catalog_saturates_instead_of_overflowing() {
        let mut huge = product(0, i64::MAX, "A", "S");
        huge.price = Money::from_cents(100_000_000);
        let stats = compute_statistics(&[huge.clone(), huge], &[], &[]);

        assert_eq!(stats.total_value.cents(), i64::MAX);
        assert_eq!(stats.total_stock, i64::MAX);
    }

    #[test]
    fn test_serializes_camel_case_in_major_units() {
        let products = vec![product(10, 2, "A", "S"), product(20, 1, "A", "S")];
        let json = serde_json::to_value(compute_statistics(&products, &[], &[])).unwrap();

        assert!(json.get("priceRangeData").is_some());
        assert_eq!(json["totalValue"].as_f64(), Some(40.0));
        assert_eq!(json["highestPriced"].as_f64(), Some(20.0));
        assert_eq!(json["lowestPriced"].as_f64(), Some(10.0));
        assert_eq!(json["totalStock"].as_i64(), Some(3));

        let average = json["averagePrice"].as_f64().unwrap();
        assert!((average - 40.0 / 3.0).abs() < 1e-9);
    }
}
