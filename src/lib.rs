//! # Product API
//!
//! A small JSON HTTP service over an in-memory product catalogue.
//!
//! Every request passes through the same pipeline:
//!
//! ```text
//! log → auth gate → route → validate → store → respond
//!                                   ╰── unexpected fault → generic 500
//! ```
//!
//! ## Features
//!
//! - **CRUD**: list (with `category` / `inStock` filters), get, create,
//!   partial update and delete of products
//! - **Validation**: field-by-field checks reporting the first violation
//! - **Authentication**: one of no auth, shared API key, or bearer-token
//!   presence, chosen at startup
//! - **Structured errors**: every failure is a JSON body with `error` and
//!   `message`
//!
//! ## Architecture
//!
//! - [`product`] - Product model, payload validation and the in-memory store
//! - [`server`] - Axum-based HTTP server, auth gate and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Domain error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use product_api::{create_router, AuthPolicy, ProductStore, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(ProductStore::with_sample_data());
//!     let router = create_router(store, RouterConfig::new(AuthPolicy::BearerPresence));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod product;
pub mod server;

// Re-export commonly used types
pub use config::{AuthMode, Config};
pub use error::{StoreError, ValidationError};
pub use product::{
    sample_products, validate_create, validate_update, Product, ProductDraft, ProductFilter,
    ProductPatch, ProductStore,
};
pub use server::{
    create_dev_router, create_router, ApiError, AppState, AuthDecision, AuthError, AuthPolicy,
    ErrorResponse, RouterConfig,
};
