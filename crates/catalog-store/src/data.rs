//! # Data Store
//!
//! Products, categories and sellers.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update_product(actor, id, draft)                                       │
//! │       │                                                                 │
//! │       ├── lock collections                                              │
//! │       ├── find id ─────────────── missing ──► NotFound (nothing written)│
//! │       ├── authorize(actor, p) ─── Deny ─────► Forbidden (nothing written)│
//! │       ├── apply draft in memory                                         │
//! │       ├── write "products" ────── fails ────► Persistence (memory kept) │
//! │       ├── unlock                                                        │
//! │       └── notify(actor, product_updated)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each collection is rewritten whole under its key on every change.

use catalog_core::stats::compute_statistics;
use catalog_core::validation::validate_label;
use catalog_core::{
    ensure_owner, Category, NotificationKind, Page, Product, ProductDraft, ProductQuery,
    ProductStatistics, Seller, SessionUser,
};
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::notifications::NotificationStore;
use crate::seed::SeedData;
use crate::storage::{keys, load_json, save_json, SharedStorage};

struct Collections {
    products: Vec<Product>,
    categories: Vec<Category>,
    sellers: Vec<Seller>,
}

/// The catalog collections.
pub struct DataStore {
    state: Mutex<Collections>,
    storage: SharedStorage,
    notifications: NotificationStore,
    page_size: usize,
}

impl DataStore {
    /// Restores the collections, each falling back to its seed list when
    /// storage has none.
    pub async fn load(
        storage: SharedStorage,
        seed: &SeedData,
        notifications: NotificationStore,
        page_size: usize,
    ) -> StoreResult<Self> {
        let products = load_json(storage.as_ref(), keys::PRODUCTS)
            .await?
            .unwrap_or_else(|| seed.products.clone());
        let categories = load_json(storage.as_ref(), keys::CATEGORIES)
            .await?
            .unwrap_or_else(|| seed.categories.clone());
        let sellers = load_json(storage.as_ref(), keys::SELLERS)
            .await?
            .unwrap_or_else(|| seed.sellers.clone());

        info!(
            products = products.len(),
            categories = categories.len(),
            sellers = sellers.len(),
            "Data store loaded"
        );

        Ok(DataStore {
            state: Mutex::new(Collections {
                products,
                categories,
                sellers,
            }),
            storage,
            notifications,
            page_size,
        })
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Lists a new product created by `actor`.
    pub async fn add_product(&self, actor: &SessionUser, draft: ProductDraft) -> StoreResult<Product> {
        let product = Product::from_draft(Uuid::new_v4().to_string(), draft, &actor.id, Utc::now());

        let mut state = self.state.lock().await;
        state.products.push(product.clone());
        debug!(id = %product.id, actor = %actor.id, "Product added");
        save_json(self.storage.as_ref(), keys::PRODUCTS, &state.products).await?;
        drop(state);

        self.notifications
            .notify(
                &actor.id,
                NotificationKind::ProductAdded,
                format!("Product \"{}\" was added", product.name),
            )
            .await?;

        Ok(product)
    }

    /// Replaces the editable fields of product `id`.
    ///
    /// Only the creator may update a product.
    pub async fn update_product(
        &self,
        actor: &SessionUser,
        id: &str,
        draft: ProductDraft,
    ) -> StoreResult<Product> {
        let mut state = self.state.lock().await;

        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;
        ensure_owner(actor, &*product)?;

        product.apply_draft(draft);
        let updated = product.clone();
        debug!(id = %id, actor = %actor.id, "Product updated");

        save_json(self.storage.as_ref(), keys::PRODUCTS, &state.products).await?;
        drop(state);

        self.notifications
            .notify(
                &actor.id,
                NotificationKind::ProductUpdated,
                format!("Product \"{}\" was updated", updated.name),
            )
            .await?;

        Ok(updated)
    }

    /// Removes product `id`. Only the creator may delete a product.
    pub async fn delete_product(&self, actor: &SessionUser, id: &str) -> StoreResult<Product> {
        let mut state = self.state.lock().await;

        let index = state
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;
        ensure_owner(actor, &state.products[index])?;

        let removed = state.products.remove(index);
        debug!(id = %id, actor = %actor.id, "Product deleted");

        save_json(self.storage.as_ref(), keys::PRODUCTS, &state.products).await?;
        drop(state);

        self.notifications
            .notify(
                &actor.id,
                NotificationKind::ProductDeleted,
                format!("Product \"{}\" was deleted", removed.name),
            )
            .await?;

        Ok(removed)
    }

    pub async fn products(&self) -> Vec<Product> {
        self.state.lock().await.products.clone()
    }

    /// One product by id.
    pub async fn product(&self, id: &str) -> Option<Product> {
        self.state
            .lock()
            .await
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// Products created by `actor`.
    pub async fn user_products(&self, actor: &SessionUser) -> Vec<Product> {
        self.state
            .lock()
            .await
            .products
            .iter()
            .filter(|p| p.created_by == actor.id)
            .cloned()
            .collect()
    }

    /// A filtered page of all products.
    pub async fn browse(&self, query: &ProductQuery) -> Page<Product> {
        let state = self.state.lock().await;
        query.apply(&state.products, self.page_size)
    }

    /// Analytics over the products created by `actor`.
    pub async fn statistics(&self, actor: &SessionUser) -> ProductStatistics {
        let state = self.state.lock().await;
        let mine: Vec<Product> = state
            .products
            .iter()
            .filter(|p| p.created_by == actor.id)
            .cloned()
            .collect();
        compute_statistics(&mine, &state.categories, &state.sellers)
    }

    // =========================================================================
    // Categories & Sellers
    // =========================================================================

    /// Appends a category. Names are unique.
    pub async fn add_category(&self, actor: &SessionUser, name: &str) -> StoreResult<Category> {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: validate_label("category", name)?,
        };

        let mut state = self.state.lock().await;
        if state.categories.iter().any(|c| c.name == category.name) {
            return Err(StoreError::DuplicateName {
                entity: "Category",
                name: category.name,
            });
        }
        state.categories.push(category.clone());
        save_json(self.storage.as_ref(), keys::CATEGORIES, &state.categories).await?;
        drop(state);

        self.notifications
            .notify(
                &actor.id,
                NotificationKind::CategoryAdded,
                format!("Category \"{}\" was added", category.name),
            )
            .await?;

        Ok(category)
    }

    /// Appends a seller. Names are unique.
    pub async fn add_seller(&self, actor: &SessionUser, name: &str) -> StoreResult<Seller> {
        let seller = Seller {
            id: Uuid::new_v4().to_string(),
            name: validate_label("seller", name)?,
        };

        let mut state = self.state.lock().await;
        if state.sellers.iter().any(|s| s.name == seller.name) {
            return Err(StoreError::DuplicateName {
                entity: "Seller",
                name: seller.name,
            });
        }
        state.sellers.push(seller.clone());
        save_json(self.storage.as_ref(), keys::SELLERS, &state.sellers).await?;
        drop(state);

        self.notifications
            .notify(
                &actor.id,
                NotificationKind::SellerAdded,
                format!("Seller \"{}\" was added", seller.name),
            )
            .await?;

        Ok(seller)
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.state.lock().await.categories.clone()
    }

    pub async fn sellers(&self) -> Vec<Seller> {
        self.state.lock().await.sellers.clone()
    }
}
