//! Payload validation for product create and update requests.
//!
//! Both entry points run the same per-field checks over a JSON object, in a
//! fixed order, and stop at the first violation:
//!
//! ```text
//! name → price → description → category → inStock
//! ```
//!
//! `null` is treated the same as an absent key. Unknown keys, including `id`,
//! are ignored.

use serde_json::{Map, Value};

use crate::error::ValidationError;

use super::model::{ProductDraft, ProductPatch};

type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Entry Points
// =============================================================================

/// Validate a create payload.
///
/// `name` and `price` are required; the remaining fields are optional.
pub fn validate_create(payload: &Value) -> ValidationResult<ProductDraft> {
    let fields = as_object(payload)?;

    let name = check_name(fields)?.ok_or(ValidationError::MissingField { field: "name" })?;
    let price = check_price(fields)?.ok_or(ValidationError::MissingField { field: "price" })?;

    Ok(ProductDraft {
        name,
        price,
        description: check_string(fields, "description")?,
        category: check_string(fields, "category")?,
        in_stock: check_bool(fields, "inStock")?,
    })
}

/// Validate an update payload. Every field is optional.
pub fn validate_update(payload: &Value) -> ValidationResult<ProductPatch> {
    let fields = as_object(payload)?;

    Ok(ProductPatch {
        name: check_name(fields)?,
        price: check_price(fields)?,
        description: check_string(fields, "description")?,
        category: check_string(fields, "category")?,
        in_stock: check_bool(fields, "inStock")?,
    })
}

// =============================================================================
// Field Checks
// =============================================================================

fn as_object(payload: &Value) -> ValidationResult<&Map<String, Value>> {
    payload.as_object().ok_or_else(|| {
        ValidationError::MalformedBody("request body must be a JSON object".to_string())
    })
}

fn present<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|value| !value.is_null())
}

fn check_name(fields: &Map<String, Value>) -> ValidationResult<Option<String>> {
    let Some(name) = check_string(fields, "name")? else {
        return Ok(None);
    };

    if name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "name",
            reason: "must not be empty",
        });
    }

    Ok(Some(name))
}

fn check_price(fields: &Map<String, Value>) -> ValidationResult<Option<f64>> {
    let Some(value) = present(fields, "price") else {
        return Ok(None);
    };

    let price = value.as_f64().ok_or(ValidationError::TypeMismatch {
        field: "price",
        expected: "number",
    })?;

    if !price.is_finite() || price <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "price",
            reason: "must be a positive number",
        });
    }

    Ok(Some(price))
}

fn check_string(
    fields: &Map<String, Value>,
    field: &'static str,
) -> ValidationResult<Option<String>> {
    match present(fields, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::TypeMismatch {
            field,
            expected: "string",
        }),
    }
}

fn check_bool(fields: &Map<String, Value>, field: &'static str) -> ValidationResult<Option<bool>> {
    match present(fields, field) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ValidationError::TypeMismatch {
            field,
            expected: "boolean",
        }),
    }
}

// =============================================================================
// Tests
// =============================================================================
