//! HTTP request handlers for the product API.
//!
//! # Endpoints
//!
//! - `GET /` - Service description
//! - `GET /health` - Health check endpoint
//! - `GET /products` - List products (filters: `category`, `inStock`)
//! - `GET /products/{id}` - Fetch one product
//! - `POST /products` - Create a product
//! - `PUT /products/{id}` - Partially update a product
//! - `DELETE /products/{id}` - Delete a product
//!
//! Anything else is answered by [`route_not_found_handler`].

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        OriginalUri, Path, Query, State,
    },
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::{StoreError, ValidationError};
use crate::product::{validate_create, validate_update, Product, ProductFilter, ProductStore};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the product store.
///
/// This is passed to all handlers via Axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    /// The one store instance for the lifetime of the server
    pub store: Arc<ProductStore>,
}

impl AppState {
    /// Create application state around a shared store.
    pub fn new(store: Arc<ProductStore>) -> Self {
        Self { store }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Query parameters for the product list endpoint.
///
/// Built from the raw key/value pairs rather than deserialized directly, so
/// repeated or unknown keys never fail the request. The first occurrence of
/// a key wins.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListQueryParams {
    /// Case-insensitive category match
    pub category: Option<String>,

    /// `true` (any case) keeps in-stock products, any other value keeps the rest
    pub in_stock: Option<String>,
}

impl ListQueryParams {
    /// Collect the known keys from decoded query pairs.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "category" => &mut params.category,
                "inStock" => &mut params.in_stock,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    /// Convert the raw query into a store filter. An empty category is ignored.
    pub fn to_filter(&self) -> ProductFilter {
        ProductFilter {
            category: self.category.clone().filter(|c| !c.is_empty()),
            in_stock: self
                .in_stock
                .as_deref()
                .map(|v| v.eq_ignore_ascii_case("true")),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Short error title (e.g., "Product not found")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Response from the product list endpoint.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    /// Number of products returned
    pub count: usize,

    /// Matching products in insertion order
    pub products: Vec<Product>,
}

/// Response from the create, update and delete endpoints.
#[derive(Debug, Serialize)]
pub struct ProductMessageResponse {
    pub message: String,
    pub product: Product,
}

impl ProductMessageResponse {
    fn new(message: &str, product: Product) -> Self {
        Self {
            message: message.to_string(),
            product,
        }
    }
}

/// Response from the root endpoint.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: String,
    pub version: String,
    pub endpoints: Vec<EndpointDescription>,
}

#[derive(Debug, Serialize)]
pub struct EndpointDescription {
    pub route: String,
    pub description: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Message returned in place of any internal failure detail.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Every failure a product handler can produce.
#[derive(Debug)]
pub enum ApiError {
    /// Payload rejected before reaching the store (400)
    Validation(ValidationError),

    /// Store lookup or mutation failed (404 or 500)
    Store(StoreError),

    /// A path parameter could not be decoded (400)
    InvalidPath(String),

    /// Unexpected fault; the detail is logged, never returned (500)
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::Store(err),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidPath(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(ValidationError::MalformedBody(rejection.body_text()))
    }
}

/// Convert ApiError to HTTP response.
///
/// This implementation logs errors appropriately based on their severity:
/// - 5xx errors are logged at ERROR level with their internal detail
/// - 404s are logged at DEBUG level (common and expected)
/// - other 4xx errors are logged at WARN level
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, title, message) = match &self {
            ApiError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                validation_title(err),
                err.to_string(),
            ),

            ApiError::InvalidPath(detail) => (
                StatusCode::BAD_REQUEST,
                "Invalid request path",
                detail.clone(),
            ),

            ApiError::Store(err @ StoreError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "Product not found", err.to_string())
            }

            ApiError::Store(err) => {
                error!(status = 500, "Server error: {}", err);
                return internal_error_response();
            }

            ApiError::Internal(detail) => {
                error!(status = 500, "Server error: {}", detail);
                return internal_error_response();
            }
        };

        if status == StatusCode::NOT_FOUND {
            debug!(status = status.as_u16(), "Resource not found: {}", message);
        } else {
            warn!(status = status.as_u16(), "Client error: {}", message);
        }

        let error_response = ErrorResponse::with_status(title, message, status);
        (status, Json(error_response)).into_response()
    }
}

fn validation_title(err: &ValidationError) -> &'static str {
    match err {
        ValidationError::MissingField { .. } => "Missing required field",
        ValidationError::TypeMismatch { .. } => "Invalid field type",
        ValidationError::InvalidValue { .. } => "Invalid field value",
        ValidationError::MalformedBody(_) => "Invalid request body",
    }
}

/// The generic 500 body shared by handler errors and caught panics.
fn internal_error_response() -> Response {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    let error_response =
        ErrorResponse::with_status("Internal Server Error", INTERNAL_ERROR_MESSAGE, status);
    (status, Json(error_response)).into_response()
}

/// Turn a panic caught inside a handler into a 500 response.
///
/// Installed through `tower_http::catch_panic::CatchPanicLayer`. The panic
/// payload is logged and never sent to the client.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };

    error!(status = 500, "Handler panicked: {}", detail);
    internal_error_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle the root request with a short description of the API.
///
/// # Endpoint
///
/// `GET /`
pub async fn index_handler() -> Json<IndexResponse> {
    let endpoints = [
        ("GET /products", "Get all products (filters: category, inStock)"),
        ("GET /products/{id}", "Get a specific product"),
        ("POST /products", "Create a new product"),
        ("PUT /products/{id}", "Update a product"),
        ("DELETE /products/{id}", "Delete a product"),
    ];

    Json(IndexResponse {
        message: "Welcome to the Product API!".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: endpoints
            .iter()
            .map(|(route, description)| EndpointDescription {
                route: route.to_string(),
                description: description.to_string(),
            })
            .collect(),
    })
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle product list requests.
///
/// # Endpoint
///
/// `GET /products`
///
/// # Query Parameters
///
/// - `category`: Case-insensitive category match
/// - `inStock`: `true` for in-stock products, anything else for out-of-stock
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "count": 1,
///   "products": [{ "id": "1", "name": "Laptop", "price": 1200.0, "inStock": true }]
/// }
/// ```
///
/// A filter that matches nothing yields an empty list, never an error.
/// Repeated keys keep their first value.
pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<ProductListResponse> {
    let query = ListQueryParams::from_pairs(pairs);
    let products = state.store.list(&query.to_filter()).await;

    Json(ProductListResponse {
        count: products.len(),
        products,
    })
}

/// Handle single product requests.
///
/// # Endpoint
///
/// `GET /products/{id}`
///
/// # Errors
///
/// - `404 Not Found`: No product with that id
pub async fn get_product_handler(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = id?;
    let product = state.store.get(&id).await?;
    Ok(Json(product))
}

/// Handle product creation.
///
/// # Endpoint
///
/// `POST /products`
///
/// # Response
///
/// `201 Created` with `{ "message": ..., "product": ... }`. The id is minted
/// by the server; an `id` in the body is ignored.
///
/// # Errors
///
/// - `400 Bad Request`: Body is not JSON or fails validation
/// - `401 Unauthorized`: Rejected by the auth gate (before this handler)
pub async fn create_product_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductMessageResponse>), ApiError> {
    let Json(payload) = payload?;
    let draft = validate_create(&payload)?;

    let product = state.store.create(draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductMessageResponse::new(
            "Product created successfully",
            product,
        )),
    ))
}

/// Handle partial product updates.
///
/// # Endpoint
///
/// `PUT /products/{id}`
///
/// Only keys present in the body are changed. `id` is never changed.
///
/// # Errors
///
/// - `400 Bad Request`: Body is not JSON or a present field is invalid
/// - `401 Unauthorized`: Rejected by the auth gate (before this handler)
/// - `404 Not Found`: No product with that id
pub async fn update_product_handler(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ProductMessageResponse>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let patch = validate_update(&payload)?;
    if patch.is_empty() {
        debug!(id = %id, "Update carries no known fields");
    }

    let product = state.store.replace_fields(&id, patch).await?;

    Ok(Json(ProductMessageResponse::new(
        "Product updated successfully",
        product,
    )))
}

/// Handle product deletion.
///
/// # Endpoint
///
/// `DELETE /products/{id}`
///
/// # Errors
///
/// - `401 Unauthorized`: Rejected by the auth gate (before this handler)
/// - `404 Not Found`: No product with that id
pub async fn delete_product_handler(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<ProductMessageResponse>, ApiError> {
    let Path(id) = id?;
    let product = state.store.delete(&id).await?;

    Ok(Json(ProductMessageResponse::new(
        "Product deleted successfully",
        product,
    )))
}

/// Fallback for any request no route matched, including an unsupported
/// method on a known path.
pub async fn route_not_found_handler(
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> (StatusCode, Json<ErrorResponse>) {
    let status = StatusCode::NOT_FOUND;
    let message = format!("Cannot {} {}", method, uri.path());

    debug!(status = status.as_u16(), "Route not found: {}", message);

    (
        status,
        Json(ErrorResponse::with_status("Route not found", message, status)),
    )
}

// =============================================================================
// Tests
// =============================================================================
