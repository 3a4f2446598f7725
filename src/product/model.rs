//! Product record and the payload types that create, patch and filter it.

use serde::{Deserialize, Serialize};

// =============================================================================
// Product
// =============================================================================

/// A product held in the catalogue.
///
/// Serialized with camelCase keys (`inStock`). Optional text fields are
/// omitted from the JSON output when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-minted identifier, never changed after creation
    pub id: String,

    /// Display name (non-empty)
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unit price, always positive
    pub price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    pub in_stock: bool,
}

impl Product {
    /// Build a stored record from a validated draft and a freshly minted id.
    ///
    /// An absent `in_stock` defaults to `true`.
    pub fn from_draft(id: impl Into<String>, draft: ProductDraft) -> Self {
        Self {
            id: id.into(),
            name: draft.name,
            description: draft.description,
            price: draft.price,
            category: draft.category,
            in_stock: draft.in_stock.unwrap_or(true),
        }
    }

    /// Merge a patch onto this record.
    ///
    /// Every field set on the patch overwrites, including `false` for
    /// `in_stock`. The id is not part of a patch and so never changes.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = Some(category);
        }
        if let Some(in_stock) = patch.in_stock {
            self.in_stock = in_stock;
        }
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// A validated create payload, not yet assigned an id.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
    pub in_stock: Option<bool>,
}

impl ProductDraft {
    /// Draft with only the required fields set.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            category: None,
            in_stock: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = Some(in_stock);
        self
    }
}

/// A validated partial update. `None` means "key absent, leave untouched".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub in_stock: Option<bool>,
}

impl ProductPatch {
    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.in_stock.is_none()
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Equality filters applied when listing products.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Case-insensitive exact match on category
    pub category: Option<String>,

    /// Exact match on stock status
    pub in_stock: Option<bool>,
}

impl ProductFilter {
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            in_stock: None,
        }
    }

    pub fn by_in_stock(in_stock: bool) -> Self {
        Self {
            category: None,
            in_stock: Some(in_stock),
        }
    }

    /// Check whether a product passes every configured filter.
    ///
    /// Products without a category never match a category filter.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(ref wanted) = self.category {
            match product.category {
                Some(ref category) if category.to_lowercase() == wanted.to_lowercase() => {}
                _ => return false,
            }
        }

        if let Some(in_stock) = self.in_stock {
            if product.in_stock != in_stock {
                return false;
            }
        }

        true
    }
}

// =============================================================================
// Sample Data
// =============================================================================

/// The catalogue loaded at startup when seeding is enabled.
pub fn sample_products() -> Vec<Product> {
    vec![
        Product {
            id: "1".to_string(),
            name: "Laptop".to_string(),
            description: Some("High-performance laptop with 16GB RAM".to_string()),
            price: 1200.0,
            category: Some("electronics".to_string()),
            in_stock: true,
        },
        Product {
            id: "2".to_string(),
            name: "Smartphone".to_string(),
            description: Some("Latest model with 128GB storage".to_string()),
            price: 800.0,
            category: Some("electronics".to_string()),
            in_stock: true,
        },
        Product {
            id: "3".to_string(),
            name: "Coffee Maker".to_string(),
            description: Some("Programmable coffee maker with timer".to_string()),
            price: 50.0,
            category: Some("kitchen".to_string()),
            in_stock: false,
        },
    ]
}
