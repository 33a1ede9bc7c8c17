// Validation errors

use restifier_core::Error;
use std::fmt;
use thiserror::Error;

/// A single rule violation.
///
/// Only these two kinds are caught by the message engine and turned into
/// per-field errors; anything else propagates to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The value is missing, or empty where emptiness is not allowed
    #[error("{0}")]
    ValueRequired(String),

    /// The value is present but violates a constraint or cannot be coerced
    #[error("{0}")]
    InvalidValue(String),
}

impl ValidationError {
    pub fn required(message: impl Into<String>) -> Self {
        ValidationError::ValueRequired(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ValidationError::InvalidValue(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            ValidationError::ValueRequired(message) | ValidationError::InvalidValue(message) => {
                message
            }
        }
    }

    pub fn is_value_required(&self) -> bool {
        matches!(self, ValidationError::ValueRequired(_))
    }

    pub fn is_invalid_value(&self) -> bool {
        matches!(self, ValidationError::InvalidValue(_))
    }
}

/// Validation error attributed to a field path such as `education[1].degree`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Path of the field that failed validation
    pub field: String,

    /// The violation
    pub error: ValidationError,
}

impl FieldError {
    pub fn new(field: impl Into<String>, error: ValidationError) -> Self {
        Self {
            field: field.into(),
            error,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.error)
    }
}

/// Ordered collection of field errors from one check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A collection holding exactly one error
    pub fn single(field: impl Into<String>, error: ValidationError) -> Self {
        Self {
            errors: vec![FieldError::new(field, error)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn add(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, other: FieldErrors) {
        self.errors.extend(other.errors);
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Error recorded for an exact field path
    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| &e.error)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Field paths in the order they were recorded
    pub fn keys(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }

    /// Re-root every path under `prefix`, e.g. `degree` -> `education[1].degree`
    pub fn prefixed(self, prefix: &str) -> Self {
        Self {
            errors: self
                .errors
                .into_iter()
                .map(|e| FieldError::new(format!("{}.{}", prefix, e.field), e.error))
                .collect(),
        }
    }

    /// Render as a `{path: message}` JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.errors
                .iter()
                .map(|e| {
                    (
                        e.field.clone(),
                        serde_json::Value::String(e.error.message().to_string()),
                    )
                })
                .collect(),
        )
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl From<FieldErrors> for Error {
    fn from(errors: FieldErrors) -> Self {
        Error::Validation(errors.to_string())
    }
}

/// The request body could not be read as a JSON object.
///
/// Raised before any schema is consulted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid payload: {0}")]
pub struct PayloadParseError(pub String);

impl From<PayloadParseError> for Error {
    fn from(error: PayloadParseError) -> Self {
        Error::BadRequest(error.to_string())
    }
}

/// Schema construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Duplicate property '{property}' in message '{message}'")]
    DuplicateProperty { message: String, property: String },

    #[error("Message name must not be empty")]
    EmptyName,

    #[error("'{0}' is not a valid element name")]
    InvalidName(String),
}
