// Built-in validators

use crate::{FieldValue, ValidationError, Validator, ValidatorScope};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Requires a value to be present, optionally non-empty and within a count range.
///
/// Count bounds are inclusive and apply to sequences only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredValidator {
    pub empty_ok: bool,
    pub min_count: Option<usize>,
    pub max_count: Option<usize>,
}

impl RequiredValidator {
    pub fn new() -> Self {
        Self {
            empty_ok: true,
            min_count: None,
            max_count: None,
        }
    }

    /// Also reject empty strings and empty sequences
    pub fn non_empty() -> Self {
        Self::new().empty_ok(false)
    }

    pub fn empty_ok(mut self, empty_ok: bool) -> Self {
        self.empty_ok = empty_ok;
        self
    }

    pub fn min_count(mut self, min: usize) -> Self {
        self.min_count = Some(min);
        self
    }

    pub fn max_count(mut self, max: usize) -> Self {
        self.max_count = Some(max);
        self
    }

    fn counts_bounded(&self) -> bool {
        self.min_count.is_some() || self.max_count.is_some()
    }
}

impl Default for RequiredValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for RequiredValidator {
    fn check(&self, value: Option<&FieldValue>) -> Result<(), ValidationError> {
        let value = value.ok_or_else(|| ValidationError::required("value is required"))?;

        if !self.empty_ok && value.is_empty() {
            return Err(ValidationError::required("value must not be empty"));
        }

        if self.counts_bounded() {
            let items = value
                .as_list()
                .ok_or_else(|| ValidationError::invalid("expected a list"))?;

            if let Some(min) = self.min_count.filter(|min| items.len() < *min) {
                return Err(ValidationError::invalid(format!(
                    "expected at least {} items, got {}",
                    min,
                    items.len()
                )));
            }
            if let Some(max) = self.max_count.filter(|max| items.len() > *max) {
                return Err(ValidationError::invalid(format!(
                    "expected at most {} items, got {}",
                    max,
                    items.len()
                )));
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "required"
    }

    fn scope(&self) -> ValidatorScope {
        ValidatorScope::Value
    }

    fn requires_presence(&self) -> bool {
        true
    }
}

/// Inclusive numeric range; either end may be open
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundsValidator {
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl BoundsValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(min: impl Into<f64>, max: impl Into<f64>) -> Self {
        Self::new().min(min).max(max)
    }

    pub fn min(mut self, min: impl Into<f64>) -> Self {
        self.min_value = Some(min.into());
        self
    }

    pub fn max(mut self, max: impl Into<f64>) -> Self {
        self.max_value = Some(max.into());
        self
    }
}

impl Validator for BoundsValidator {
    fn check(&self, value: Option<&FieldValue>) -> Result<(), ValidationError> {
        let Some(value) = value else {
            return Ok(());
        };
        if value.as_f64().is_none() {
            return Err(ValidationError::invalid("value must be numeric"));
        }

        if let Some(min) = self.min_value.filter(|min| compare(value, *min) == Some(Ordering::Less)) {
            return Err(ValidationError::invalid(format!(
                "value must be at least {}",
                min
            )));
        }
        if let Some(max) = self.max_value.filter(|max| compare(value, *max) == Some(Ordering::Greater)) {
            return Err(ValidationError::invalid(format!(
                "value must be at most {}",
                max
            )));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "bounds"
    }
}

/// Order a numeric value against a bound. Integers meet integral bounds in
/// `i64` so values past 2^53 compare exactly.
fn compare(value: &FieldValue, bound: f64) -> Option<Ordering> {
    const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;
    match value {
        FieldValue::Integer(i) if bound.fract() == 0.0 && (-I64_LIMIT..I64_LIMIT).contains(&bound) => {
            Some(i.cmp(&(bound as i64)))
        }
        other => other.as_f64()?.partial_cmp(&bound),
    }
}

/// Pattern match anchored at the start of the value's text.
///
/// Matching is not anchored at the end: patterns that must cover the whole
/// value need an explicit `$`.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    regex: Regex,
}

impl RegexValidator {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::from_regex(Regex::new(pattern)?))
    }

    pub fn from_regex(regex: Regex) -> Self {
        Self { regex }
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    fn matches(&self, text: &str) -> bool {
        // leftmost-first: a match at offset 0 wins whenever one exists
        self.regex.find(text).is_some_and(|m| m.start() == 0)
    }
}

impl Validator for RegexValidator {
    fn check(&self, value: Option<&FieldValue>) -> Result<(), ValidationError> {
        let Some(value) = value else {
            return Ok(());
        };
        let text = value
            .to_text()
            .ok_or_else(|| ValidationError::invalid("expected a text value"))?;

        if self.matches(&text) {
            Ok(())
        } else {
            Err(ValidationError::invalid(format!(
                "value does not match pattern {}",
                self.regex.as_str()
            )))
        }
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}

type Predicate = Arc<dyn Fn(&FieldValue) -> bool + Send + Sync>;

/// Accepts values for which a predicate holds
#[derive(Clone)]
pub struct ConditionalValidator {
    predicate: Predicate,
    message: String,
}

impl ConditionalValidator {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            message: "value failed condition".to_string(),
        }
    }

    /// Replace the generic failure message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl fmt::Debug for ConditionalValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalValidator")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl Validator for ConditionalValidator {
    fn check(&self, value: Option<&FieldValue>) -> Result<(), ValidationError> {
        match value {
            Some(value) if !(self.predicate)(value) => {
                Err(ValidationError::invalid(self.message.clone()))
            }
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "conditional"
    }
}

// Shorthand constructors for schema declarations

/// A `RequiredValidator` with default settings
pub fn required() -> Arc<dyn Validator> {
    Arc::new(RequiredValidator::new())
}

/// An inclusive numeric range; pass `None` for an open end
pub fn bounds(min: Option<f64>, max: Option<f64>) -> Arc<dyn Validator> {
    Arc::new(BoundsValidator {
        min_value: min,
        max_value: max,
    })
}

/// A start-anchored pattern validator
pub fn regex(pattern: &str) -> Result<Arc<dyn Validator>, regex::Error> {
    Ok(Arc::new(RegexValidator::new(pattern)?))
}

/// A predicate validator
pub fn condition<F>(predicate: F) -> Arc<dyn Validator>
where
    F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
{
    Arc::new(ConditionalValidator::new(predicate))
}
