//! Router configuration for the product API.
//!
//! This module defines the HTTP routes and stacks the request pipeline around
//! them.
//!
//! # Route Structure
//!
//! ```text
//! /                    - Service description (public)
//! /health              - Health check (public)
//! /products            - List (GET) / create (POST)          (gated)
//! /products/{id}       - Get (GET) / update (PUT) / delete   (gated)
//! ```
//!
//! # Pipeline
//!
//! ```text
//! trace → log_requests → CORS → catch panic → route → auth gate → handler
//! ```
//!
//! The auth gate is attached to the product routes only, so unmatched paths
//! always fall through to the JSON "Route not found" response.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use product_api::product::ProductStore;
//! use product_api::server::{auth::AuthPolicy, create_router, RouterConfig};
//!
//! let store = Arc::new(ProductStore::with_sample_data());
//! let config = RouterConfig::new(AuthPolicy::BearerPresence)
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//!
//! let router = create_router(store, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderName, AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::{auth_middleware, AuthPolicy, API_KEY_HEADER};
use super::handlers::{
    create_product_handler, delete_product_handler, get_product_handler, handle_panic,
    health_handler, index_handler, list_products_handler, route_not_found_handler,
    update_product_handler, AppState,
};
use super::logging::log_requests;
use crate::product::ProductStore;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// Access policy applied to the product routes
    pub auth: AuthPolicy,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration with the given auth policy.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Tracing is enabled
    pub fn new(auth: AuthPolicy) -> Self {
        Self {
            auth,
            cors_origins: None, // Allow any origin by default
            enable_tracing: true,
        }
    }

    /// Create a configuration with authentication disabled.
    ///
    /// **Warning**: This should only be used for development/testing.
    pub fn without_auth() -> Self {
        Self::new(AuthPolicy::None)
    }

    /// Replace the auth policy.
    pub fn with_auth(mut self, auth: AuthPolicy) -> Self {
        self.auth = auth;
        self
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    /// Pass None (or don't call this method) to allow any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Public routes (`/`, `/health`)
/// - Product routes behind the configured auth gate
/// - JSON 404 fallback for unmatched routes and methods
/// - Panic recovery, CORS, request logging and optional tracing
///
/// # Arguments
///
/// * `store` - The product store shared by every handler
/// * `config` - Router configuration
///
/// # Returns
///
/// A configured Axum router ready to be served.
pub fn create_router(store: Arc<ProductStore>, config: RouterConfig) -> Router {
    let routes = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .merge(product_routes(config.auth.clone()));

    build_pipeline(routes, AppState::new(store), &config)
}

/// Product CRUD routes with the auth gate attached.
fn product_routes(auth: AuthPolicy) -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(list_products_handler).post(create_product_handler),
        )
        .route(
            "/products/{id}",
            get(get_product_handler)
                .put(update_product_handler)
                .delete(delete_product_handler),
        )
        .route_layer(middleware::from_fn_with_state(auth, auth_middleware))
}

/// Wrap routes with fallbacks, state and the middleware stack.
fn build_pipeline(routes: Router<AppState>, app_state: AppState, config: &RouterConfig) -> Router {
    let router = routes
        .fallback(route_not_found_handler)
        .method_not_allowed_fallback(route_not_found_handler)
        .with_state(app_state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(build_cors_layer(config))
        .layer(middleware::from_fn(log_requests));

    // Add tracing if enabled
    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static(API_KEY_HEADER),
        ])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            // Parse origins into HeaderValues
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Create a development router with authentication disabled.
///
/// **Warning**: This should only be used for local development and testing.
/// Never use this in production.
pub fn create_dev_router(store: Arc<ProductStore>) -> Router {
    create_router(store, RouterConfig::without_auth())
}

// =============================================================================
// Tests
// =============================================================================
