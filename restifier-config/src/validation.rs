// Configuration validation

use crate::{ConfigError, Result};

/// Settings that can check their own consistency
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Reusable checks for settings values
pub struct ConfigValidator;

impl ConfigValidator {
    /// Reject an empty value
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }

    /// Require an absolute request path
    pub fn is_path(value: &str, field: &str) -> Result<()> {
        if !value.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "{} must start with '/', got '{}'",
                field, value
            )));
        }
        Ok(())
    }

    /// Require a value to parse with `parse`
    pub fn parses<T>(value: &str, field: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T> {
        parse(value).ok_or_else(|| {
            ConfigError::ValidationError(format!("{} has unknown value '{}'", field, value))
        })
    }
}
