//! Authentication gate for the product routes.
//!
//! A deployment picks exactly one [`AuthPolicy`]:
//!
//! - **None**: every request passes.
//! - **ApiKey**: the `x-api-key` header must equal the configured secret.
//!   Applies to every method.
//! - **BearerPresence**: `GET` requests are public; every other method
//!   needs an `Authorization: Bearer <token>` header with a non-empty token.
//!   The token itself is not verified.
//!
//! The policies are never combined.
//!
//! # Example
//!
//! ```rust
//! use http::{HeaderMap, HeaderValue, Method};
//! use product_api::server::auth::{AuthDecision, AuthPolicy};
//!
//! let policy = AuthPolicy::api_key("s3cret");
//!
//! let mut headers = HeaderMap::new();
//! headers.insert("x-api-key", HeaderValue::from_static("s3cret"));
//!
//! assert_eq!(policy.evaluate(&Method::POST, &headers), AuthDecision::Allow);
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::handlers::ErrorResponse;

/// Header carrying the shared secret under the API-key policy.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Scheme prefix expected in the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

// =============================================================================
// Types
// =============================================================================

/// Authentication failures. All of them map to `401 Unauthorized`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No `x-api-key` header was sent
    MissingApiKey,

    /// The `x-api-key` header does not match the configured secret
    InvalidApiKey,

    /// No `Authorization` header was sent
    MissingBearerToken,

    /// The `Authorization` header is not `Bearer <token>`
    MalformedBearerToken,
}

impl AuthError {
    /// Short title placed in the `error` field of the response body.
    fn title(&self) -> &'static str {
        match self {
            AuthError::MissingApiKey | AuthError::InvalidApiKey => "Unauthorized",
            AuthError::MissingBearerToken | AuthError::MalformedBearerToken => {
                "Authentication required"
            }
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingApiKey => write!(f, "Unauthorized: Missing API Key"),
            AuthError::InvalidApiKey => write!(f, "Unauthorized: Invalid API Key"),
            AuthError::MissingBearerToken | AuthError::MalformedBearerToken => write!(
                f,
                "Please include a valid Bearer token in Authorization header"
            ),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = StatusCode::UNAUTHORIZED;
        let message = self.to_string();

        // A wrong key is worth noticing; a missing credential is routine
        match &self {
            AuthError::InvalidApiKey => {
                warn!(status = status.as_u16(), "Authentication failed: {}", message);
            }
            _ => {
                debug!(status = status.as_u16(), "Authentication failed: {:?}", self);
            }
        }

        let error_response = ErrorResponse::with_status(self.title(), message, status);
        (status, Json(error_response)).into_response()
    }
}

/// Outcome of evaluating a policy against a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    Allow,
    Deny(AuthError),
}

// =============================================================================
// Auth Policy
// =============================================================================

/// The access policy guarding the product routes.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum AuthPolicy {
    /// No authentication
    #[default]
    None,

    /// Shared-secret header check on every method
    ApiKey {
        /// Expected value of the `x-api-key` header
        secret: String,
    },

    /// Bearer token presence check on every method except `GET`
    BearerPresence,
}

impl AuthPolicy {
    /// Create an API-key policy with the given secret.
    pub fn api_key(secret: impl Into<String>) -> Self {
        AuthPolicy::ApiKey {
            secret: secret.into(),
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            AuthPolicy::None => "none",
            AuthPolicy::ApiKey { .. } => "api-key",
            AuthPolicy::BearerPresence => "bearer",
        }
    }

    /// Decide whether a request with this method and headers may proceed.
    pub fn evaluate(&self, method: &Method, headers: &HeaderMap) -> AuthDecision {
        let result = match self {
            AuthPolicy::None => Ok(()),
            AuthPolicy::ApiKey { secret } => check_api_key(secret, headers),
            AuthPolicy::BearerPresence if *method == Method::GET => Ok(()),
            AuthPolicy::BearerPresence => check_bearer(headers),
        };

        match result {
            Ok(()) => AuthDecision::Allow,
            Err(err) => AuthDecision::Deny(err),
        }
    }
}

// The secret stays out of logs and panics
impl std::fmt::Debug for AuthPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthPolicy::None => write!(f, "None"),
            AuthPolicy::ApiKey { .. } => write!(f, "ApiKey {{ secret: \"***\" }}"),
            AuthPolicy::BearerPresence => write!(f, "BearerPresence"),
        }
    }
}

fn check_api_key(secret: &str, headers: &HeaderMap) -> Result<(), AuthError> {
    let provided = headers
        .get(API_KEY_HEADER)
        .ok_or(AuthError::MissingApiKey)?;

    // Slices of different lengths compare unequal
    if provided.as_bytes().ct_eq(secret.as_bytes()).into() {
        Ok(())
    } else {
        Err(AuthError::InvalidApiKey)
    }
}

fn check_bearer(headers: &HeaderMap) -> Result<(), AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingBearerToken)?
        .to_str()
        .map_err(|_| AuthError::MalformedBearerToken)?;

    match value.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.trim().is_empty() => Ok(()),
        _ => Err(AuthError::MalformedBearerToken),
    }
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Axum middleware applying an [`AuthPolicy`] before the handler runs.
///
/// A denied request is answered with `401` and never reaches the handler.
///
/// # Example
///
/// ```ignore
/// use axum::{middleware, routing::post, Router};
/// use product_api::server::auth::{auth_middleware, AuthPolicy};
///
/// let app = Router::new()
///     .route("/products", post(create_product_handler))
///     .route_layer(middleware::from_fn_with_state(
///         AuthPolicy::BearerPresence,
///         auth_middleware,
///     ));
/// ```
pub async fn auth_middleware(
    State(policy): State<AuthPolicy>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    match policy.evaluate(request.method(), request.headers()) {
        AuthDecision::Allow => Ok(next.run(request).await),
        AuthDecision::Deny(err) => {
            debug!(
                method = %request.method(),
                path = %request.uri().path(),
                policy = policy.name(),
                "Request denied by auth gate"
            );
            Err(err)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
