// Validation traits

use crate::{FieldValue, ValidationError};

/// Which part of a property value a validator inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorScope {
    /// The whole value; for repeated properties, the sequence itself
    Value,
    /// Each element of a repeated property; the value itself otherwise
    Element,
}

/// A stateless rule accepting or rejecting a single value.
///
/// `None` means the value is absent. Validators are shared read-only by every
/// request that checks against their schema.
pub trait Validator: Send + Sync {
    /// Check a value, failing on the first violation found
    fn check(&self, value: Option<&FieldValue>) -> Result<(), ValidationError>;

    /// Get validator name
    fn name(&self) -> &'static str;

    fn scope(&self) -> ValidatorScope {
        ValidatorScope::Element
    }

    /// Whether this validator rejects an absent value
    fn requires_presence(&self) -> bool {
        false
    }
}
