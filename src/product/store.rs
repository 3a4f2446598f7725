//! In-memory product store.
//!
//! The store owns the catalogue as an ordered `Vec<Product>` behind a single
//! `RwLock`. Every operation takes the lock once for its whole duration, so
//! concurrent requests never observe a half-applied write.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::StoreError;

use super::model::{sample_products, Product, ProductDraft, ProductFilter, ProductPatch};

/// Number of ids tried before giving up on `create`.
pub const MAX_ID_ATTEMPTS: usize = 8;

/// Source of fresh product ids.
pub type IdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

fn uuid_v4() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Product Store
// =============================================================================

/// Thread-safe, insertion-ordered product collection.
///
/// # Example
///
/// ```
/// use product_api::product::{ProductDraft, ProductFilter, ProductStore};
///
/// #[tokio::main]
/// async fn main() {
///     let store = ProductStore::new();
///
///     let created = store
///         .create(ProductDraft::new("Desk", 250.0).with_category("Furniture"))
///         .await
///         .unwrap();
///     assert!(created.in_stock);
///
///     let found = store.list(&ProductFilter::by_category("furniture")).await;
///     assert_eq!(found, vec![created]);
/// }
/// ```
pub struct ProductStore {
    products: RwLock<Vec<Product>>,
    id_generator: IdGenerator,
}

impl ProductStore {
    /// Create an empty store that mints UUID v4 ids.
    pub fn new() -> Self {
        Self::with_products(Vec::new())
    }

    /// Create a store pre-loaded with the given products.
    ///
    /// Products whose id repeats an earlier one are dropped.
    pub fn with_products(products: Vec<Product>) -> Self {
        let mut seen = HashSet::new();
        let products: Vec<Product> = products
            .into_iter()
            .filter(|product| {
                let fresh = seen.insert(product.id.clone());
                if !fresh {
                    warn!(id = %product.id, "Dropping product with duplicate id");
                }
                fresh
            })
            .collect();

        Self {
            products: RwLock::new(products),
            id_generator: Arc::new(uuid_v4),
        }
    }

    /// Create a store holding the sample catalogue.
    pub fn with_sample_data() -> Self {
        Self::with_products(sample_products())
    }

    /// Replace the id generator.
    pub fn with_id_generator(
        mut self,
        generator: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        self.id_generator = Arc::new(generator);
        self
    }

    /// All products passing `filter`, in insertion order.
    pub async fn list(&self, filter: &ProductFilter) -> Vec<Product> {
        let products = self.products.read().await;
        products
            .iter()
            .filter(|product| filter.matches(product))
            .cloned()
            .collect()
    }

    /// Look up a product by exact id.
    pub async fn get(&self, id: &str) -> Result<Product, StoreError> {
        let products = self.products.read().await;
        products
            .iter()
            .find(|product| product.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Append a new product built from `draft` and return it.
    pub async fn create(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let mut products = self.products.write().await;

        let id = self.mint_id(&products)?;
        let product = Product::from_draft(id, draft);
        products.push(product.clone());

        debug!(id = %product.id, count = products.len(), "Product created");
        Ok(product)
    }

    /// Merge `patch` onto the product with the given id and return the result.
    pub async fn replace_fields(
        &self,
        id: &str,
        patch: ProductPatch,
    ) -> Result<Product, StoreError> {
        let mut products = self.products.write().await;

        let product = products
            .iter_mut()
            .find(|product| product.id == id)
            .ok_or_else(|| not_found(id))?;
        product.apply(patch);

        debug!(id = %product.id, "Product updated");
        Ok(product.clone())
    }

    /// Remove the product with the given id and return it.
    pub async fn delete(&self, id: &str) -> Result<Product, StoreError> {
        let mut products = self.products.write().await;

        let index = products
            .iter()
            .position(|product| product.id == id)
            .ok_or_else(|| not_found(id))?;
        let removed = products.remove(index);

        debug!(id = %removed.id, count = products.len(), "Product deleted");
        Ok(removed)
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }

    fn mint_id(&self, products: &[Product]) -> Result<String, StoreError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = (self.id_generator)();
            if !id.is_empty() && !products.iter().any(|product| product.id == id) {
                return Ok(id);
            }
        }

        Err(StoreError::IdExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }
}

impl Default for ProductStore {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(id: &str) -> StoreError {
    StoreError::NotFound { id: id.to_string() }
}

// =============================================================================
// Tests
// =============================================================================
