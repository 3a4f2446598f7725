use thiserror::Error;

/// Errors raised while checking a product payload.
///
/// Only the first violation found is reported, with fields checked in the
/// order `name`, `price`, `description`, `category`, `inStock`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is absent (or `null`)
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// A field is present but holds the wrong JSON type
    #[error("Field '{field}' must be a {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    /// A field has the right type but an unacceptable value
    #[error("Field '{field}' {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },

    /// The request body could not be read as a JSON object
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

impl ValidationError {
    /// Name of the offending field, if the error is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::TypeMismatch { field, .. }
            | ValidationError::InvalidValue { field, .. } => Some(*field),
            ValidationError::MalformedBody(_) => None,
        }
    }
}

/// Errors returned by the product store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No product carries the requested id
    #[error("Product with ID {id} does not exist")]
    NotFound { id: String },

    /// The id generator kept producing ids that are already taken
    #[error("Could not mint a unique product id after {attempts} attempts")]
    IdExhausted { attempts: usize },
}
