//! HTTP server layer for the product API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │            GET|POST /products   GET|PUT|DELETE /products/{id}   │
//! │                                                                 │
//! │  ┌───────────┐  ┌─────────────┐  ┌────────────┐  ┌───────────┐  │
//! │  │  logging  │  │    auth     │  │  handlers  │  │  routes   │  │
//! │  │ (observe) │  │   (gate)    │  │ (requests) │  │ (router)  │  │
//! │  └───────────┘  └─────────────┘  └────────────┘  └───────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod logging;
pub mod routes;

pub use auth::{auth_middleware, AuthDecision, AuthError, AuthPolicy};
pub use handlers::{
    create_product_handler, delete_product_handler, get_product_handler, handle_panic,
    health_handler, index_handler, list_products_handler, route_not_found_handler,
    update_product_handler, ApiError, AppState, ErrorResponse, HealthResponse, IndexResponse,
    ListQueryParams, ProductListResponse, ProductMessageResponse,
};
pub use logging::log_requests;
pub use routes::{create_dev_router, create_router, RouterConfig};
