//! Product domain: the record type, payload validation and the in-memory store.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Product Domain                         │
//! │                                                              │
//! │  ┌─────────────┐   ┌──────────────┐   ┌──────────────────┐   │
//! │  │ validation  │──▶│    model     │◀──│      store       │   │
//! │  │ (JSON→Draft)│   │ (Product,    │   │ (RwLock<Vec<..>>)│   │
//! │  │             │   │  Patch, ...) │   │                  │   │
//! │  └─────────────┘   └──────────────┘   └──────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod model;
pub mod store;
pub mod validation;

pub use model::{sample_products, Product, ProductDraft, ProductFilter, ProductPatch};
pub use store::{IdGenerator, ProductStore, MAX_ID_ATTEMPTS};
pub use validation::{validate_create, validate_update};
