//! Typed field descriptors
//!
//! A [`Property`] coerces one raw input value to its declared kind and runs its
//! validator chain over the result.

use crate::value::DATE_FORMAT;
use crate::{FieldError, FieldErrors, FieldValue, MessageSchema, ValidationError, Validator, ValidatorScope};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// 2^63; every integral `f64` strictly below it fits in an `i64`
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Years representable in the four-digit RFC 3339 output form
const DATETIME_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Declared kind of a property
#[derive(Debug, Clone)]
pub enum PropertyKind {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    /// Governed by a nested message schema
    Structured(Arc<MessageSchema>),
}

impl PropertyKind {
    /// Kind name as shown in documentation
    pub fn name(&self) -> &'static str {
        match self {
            PropertyKind::String => "string",
            PropertyKind::Integer => "integer",
            PropertyKind::Float => "float",
            PropertyKind::Boolean => "boolean",
            PropertyKind::Date => "date",
            PropertyKind::DateTime => "datetime",
            PropertyKind::Structured(_) => "structured",
        }
    }

    pub fn schema(&self) -> Option<&Arc<MessageSchema>> {
        match self {
            PropertyKind::Structured(schema) => Some(schema),
            _ => None,
        }
    }

    /// Coerce a scalar raw value. Structured kinds are handled by the property.
    fn coerce_scalar(&self, raw: &Value) -> Result<FieldValue, ValidationError> {
        match self {
            PropertyKind::String => coerce_string(raw),
            PropertyKind::Integer => coerce_integer(raw),
            PropertyKind::Float => coerce_float(raw),
            PropertyKind::Boolean => coerce_boolean(raw),
            PropertyKind::Date => coerce_date(raw),
            PropertyKind::DateTime => coerce_datetime(raw),
            PropertyKind::Structured(_) => Err(ValidationError::invalid("expected an object")),
        }
    }
}

fn coerce_string(raw: &Value) -> Result<FieldValue, ValidationError> {
    match raw {
        Value::String(s) => Ok(FieldValue::String(s.clone())),
        Value::Number(n) => Ok(FieldValue::String(n.to_string())),
        Value::Bool(b) => Ok(FieldValue::String(b.to_string())),
        _ => Err(ValidationError::invalid("expected a string")),
    }
}

fn coerce_integer(raw: &Value) -> Result<FieldValue, ValidationError> {
    let invalid = || ValidationError::invalid("expected an integer");
    match raw {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(FieldValue::Integer(i)),
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= -I64_LIMIT && *f < I64_LIMIT)
                .map(|f| FieldValue::Integer(f as i64))
                .ok_or_else(invalid),
        },
        Value::String(s) => s.trim().parse::<i64>().map(FieldValue::Integer).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn coerce_float(raw: &Value) -> Result<FieldValue, ValidationError> {
    let number = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number
        .filter(|f| f.is_finite())
        .map(FieldValue::Float)
        .ok_or_else(|| ValidationError::invalid("expected a number"))
}

fn coerce_boolean(raw: &Value) -> Result<FieldValue, ValidationError> {
    match raw {
        Value::Bool(b) => Ok(FieldValue::Boolean(*b)),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(FieldValue::Boolean(true)),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(FieldValue::Boolean(false)),
        _ => Err(ValidationError::invalid("expected a boolean")),
    }
}

fn coerce_date(raw: &Value) -> Result<FieldValue, ValidationError> {
    let invalid = || ValidationError::invalid("expected a date in YYYY-MM-DD format");
    match raw {
        // chrono accepts unpadded fields; the wire form is fixed width
        Value::String(s) if s.len() == 10 => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(FieldValue::Date)
            .map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn coerce_datetime(raw: &Value) -> Result<FieldValue, ValidationError> {
    let invalid = || ValidationError::invalid("expected epoch seconds or an ISO 8601 date-time");
    let parsed = match raw {
        Value::Number(n) => match n.as_i64() {
            Some(secs) => DateTime::from_timestamp(secs, 0),
            None => n.as_f64().filter(|f| f.is_finite()).and_then(|f| {
                let secs = f.floor();
                let nanos = (((f - secs) * 1e9).round() as u32).min(999_999_999);
                DateTime::from_timestamp(secs as i64, nanos)
            }),
        },
        Value::String(s) => parse_datetime(s.trim()),
        _ => None,
    };
    parsed
        .filter(|dt| DATETIME_YEARS.contains(&dt.year()))
        .map(FieldValue::DateTime)
        .ok_or_else(invalid)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<i64>().ok().and_then(|secs| DateTime::from_timestamp(secs, 0));
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| naive.and_utc())
}

/// One named, typed field of a message schema
#[derive(Clone)]
pub struct Property {
    name: String,
    kind: PropertyKind,
    repeated: bool,
    validators: Vec<Arc<dyn Validator>>,
    description: String,
}

impl Property {
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            repeated: false,
            validators: Vec::new(),
            description: String::new(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Boolean)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Date)
    }

    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::DateTime)
    }

    pub fn structured(name: impl Into<String>, schema: Arc<MessageSchema>) -> Self {
        Self::new(name, PropertyKind::Structured(schema))
    }

    /// Hold an ordered sequence of the declared kind
    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    /// Append a validator; validators run in declaration order
    pub fn validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validators.push(validator);
        self
    }

    /// Append a concrete validator
    pub fn validate_with<V: Validator + 'static>(self, validator: V) -> Self {
        self.validator(Arc::new(validator))
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    pub fn is_repeated(&self) -> bool {
        self.repeated
    }

    pub fn validators(&self) -> &[Arc<dyn Validator>] {
        &self.validators
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    /// Whether an absent value is an error
    pub fn is_required(&self) -> bool {
        self.validators.iter().any(|v| v.requires_presence())
    }

    /// Coerce and validate one raw value.
    ///
    /// `Ok(None)` means the value is absent and nothing requires it. Errors are
    /// keyed by this property's name, indexed for repeated elements and
    /// path-qualified for nested messages.
    pub fn convert_and_check(&self, raw: Option<&Value>) -> Result<Option<FieldValue>, FieldErrors> {
        let Some(raw) = raw.filter(|v| !v.is_null()) else {
            for validator in self.validators.iter().filter(|v| v.requires_presence()) {
                validator
                    .check(None)
                    .map_err(|e| FieldErrors::single(self.name.as_str(), e))?;
            }
            return Ok(None);
        };

        let value = if self.repeated {
            self.convert_sequence(raw)?
        } else {
            self.convert_element(raw, &self.name)?
        };

        self.run_validators(&value)?;
        Ok(Some(value))
    }

    fn convert_sequence(&self, raw: &Value) -> Result<FieldValue, FieldErrors> {
        let Value::Array(items) = raw else {
            return Err(FieldErrors::single(
                self.name.as_str(),
                ValidationError::invalid("expected a list"),
            ));
        };

        let mut converted = Vec::with_capacity(items.len());
        let mut errors = FieldErrors::new();
        for (index, item) in items.iter().enumerate() {
            match self.convert_element(item, &element_path(&self.name, index)) {
                Ok(value) => converted.push(value),
                Err(element_errors) => errors.extend(element_errors),
            }
        }

        if errors.is_empty() {
            Ok(FieldValue::List(converted))
        } else {
            Err(errors)
        }
    }

    fn convert_element(&self, raw: &Value, path: &str) -> Result<FieldValue, FieldErrors> {
        match &self.kind {
            PropertyKind::Structured(schema) => {
                let Value::Object(data) = raw else {
                    return Err(FieldErrors::single(
                        path,
                        ValidationError::invalid("expected an object"),
                    ));
                };
                let nested = schema.check(data);
                if nested.is_valid() {
                    Ok(FieldValue::Message(nested))
                } else {
                    Err(nested.errors().clone().prefixed(path))
                }
            }
            kind => kind
                .coerce_scalar(raw)
                .map_err(|e| FieldErrors::single(path, e)),
        }
    }

    fn run_validators(&self, value: &FieldValue) -> Result<(), FieldErrors> {
        for validator in &self.validators {
            match (validator.scope(), value) {
                (ValidatorScope::Element, FieldValue::List(items)) if self.repeated => {
                    let mut errors = FieldErrors::new();
                    for (index, item) in items.iter().enumerate() {
                        if let Err(e) = validator.check(Some(item)) {
                            errors.add(FieldError::new(element_path(&self.name, index), e));
                        }
                    }
                    if !errors.is_empty() {
                        return Err(errors);
                    }
                }
                _ => validator
                    .check(Some(value))
                    .map_err(|e| FieldErrors::single(self.name.as_str(), e))?,
            }
        }
        Ok(())
    }
}

fn element_path(name: &str, index: usize) -> String {
    format!("{}[{}]", name, index)
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let validators: Vec<&str> = self.validators.iter().map(|v| v.name()).collect();
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("kind", &self.kind.name())
            .field("repeated", &self.repeated)
            .field("validators", &validators)
            .field("description", &self.description)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RegexValidator, RequiredValidator, bounds, required};
    use serde_json::json;

    fn convert(property: &Property, raw: Value) -> Result<Option<FieldValue>, FieldErrors> {
        property.convert_and_check(Some(&raw))
    }

    #[test]
    fn test_absent_without_required_is_omitted() {
        let property = Property::integer("age").validator(bounds(Some(10.0), None));
        assert_eq!(property.convert_and_check(None), Ok(None));
        assert_eq!(convert(&property, Value::Null), Ok(None));
    }

    #[test]
    fn test_absent_with_required_reports_value_required() {
        let property = Property::integer("age")
            .validator(bounds(Some(10.0), None))
            .validator(required());

        let errors = property.convert_and_check(None).unwrap_err();
        assert!(errors.get("age").unwrap().is_value_required());
    }

    #[test]
    fn test_integer_coercion() {
        let property = Property::integer("n");
        assert_eq!(convert(&property, json!(42)), Ok(Some(FieldValue::Integer(42))));
        assert_eq!(convert(&property, json!("17")), Ok(Some(FieldValue::Integer(17))));
        assert_eq!(convert(&property, json!(3.0)), Ok(Some(FieldValue::Integer(3))));
        assert!(convert(&property, json!(1.5)).unwrap_err().get("n").unwrap().is_invalid_value());
        assert!(convert(&property, json!("abc")).is_err());
        assert!(convert(&property, json!(true)).is_err());
    }

    #[test]
    fn test_integer_coercion_rejects_out_of_range() {
        let property = Property::integer("n");
        assert_eq!(
            convert(&property, json!(i64::MAX)),
            Ok(Some(FieldValue::Integer(i64::MAX)))
        );
        assert_eq!(
            convert(&property, json!(i64::MIN)),
            Ok(Some(FieldValue::Integer(i64::MIN)))
        );
        assert!(convert(&property, json!(9_223_372_036_854_775_808u64)).is_err());
        assert!(convert(&property, json!(u64::MAX)).is_err());
        assert!(convert(&property, json!(1e19)).is_err());
        assert!(convert(&property, json!(-1e19)).is_err());
    }

    #[test]
    fn test_float_coercion_rejects_non_finite() {
        let property = Property::float("ratio");
        assert_eq!(convert(&property, json!(1.25)), Ok(Some(FieldValue::Float(1.25))));
        assert_eq!(convert(&property, json!(2)), Ok(Some(FieldValue::Float(2.0))));
        assert!(convert(&property, json!("NaN")).is_err());
        assert!(convert(&property, json!("inf")).is_err());
    }

    #[test]
    fn test_string_and_boolean_coercion() {
        let text = Property::string("s");
        assert_eq!(convert(&text, json!(12)), Ok(Some(FieldValue::from("12"))));
        assert!(convert(&text, json!({"a": 1})).is_err());

        let flag = Property::boolean("b");
        assert_eq!(convert(&flag, json!("TRUE")), Ok(Some(FieldValue::Boolean(true))));
        assert!(convert(&flag, json!(1)).is_err());
    }

    #[test]
    fn test_date_requires_strict_format() {
        let property = Property::date("d");
        let expected = NaiveDate::from_ymd_opt(2012, 12, 1).unwrap();
        assert_eq!(convert(&property, json!("2012-12-01")), Ok(Some(FieldValue::Date(expected))));
        assert!(convert(&property, json!("2012-2-1")).is_err());
        assert!(convert(&property, json!("2012-02-30")).is_err());
        assert!(convert(&property, json!(20121201)).is_err());
    }

    #[test]
    fn test_datetime_accepts_epoch_and_strings() {
        let property = Property::datetime("t");
        let epoch = convert(&property, json!(1406650720)).unwrap().unwrap();
        let rfc = convert(&property, json!("2014-07-29T16:18:40Z")).unwrap().unwrap();
        let offset = convert(&property, json!("2014-07-29T18:18:40+02:00")).unwrap().unwrap();
        let naive = convert(&property, json!("2014-07-29 16:18:40")).unwrap().unwrap();

        assert_eq!(epoch, rfc);
        assert_eq!(epoch, offset);
        assert_eq!(epoch, naive);
        assert!(convert(&property, json!("yesterday")).is_err());
    }

    #[test]
    fn test_datetime_rejects_years_without_four_digit_form() {
        let property = Property::datetime("t");
        // 9999-12-31T23:59:59Z
        let last = convert(&property, json!(253_402_300_799i64)).unwrap().unwrap();
        assert_eq!(last.to_text().as_deref(), Some("9999-12-31T23:59:59Z"));
        assert_eq!(convert(&property, json!("9999-12-31T23:59:59Z")), Ok(Some(last)));

        let errors = convert(&property, json!(253_402_300_800i64)).unwrap_err();
        assert!(errors.get("t").unwrap().is_invalid_value());
        // 0000-01-01T00:00:00Z and one second before it
        assert!(convert(&property, json!(-62_167_219_200i64)).is_ok());
        assert!(convert(&property, json!(-62_167_219_201i64)).is_err());
    }

    #[test]
    fn test_repeated_requires_a_list() {
        let property = Property::string("tags").repeated();
        let errors = convert(&property, json!("solo")).unwrap_err();
        assert!(errors.get("tags").unwrap().is_invalid_value());

        let value = convert(&property, json!(["a", "b"])).unwrap().unwrap();
        assert_eq!(value, FieldValue::from(vec!["a", "b"]));
    }

    #[test]
    fn test_repeated_element_errors_are_indexed() {
        let property = Property::integer("scores").repeated();
        let errors = convert(&property, json!([1, "two", "three"])).unwrap_err();
        assert_eq!(errors.keys(), vec!["scores[1]", "scores[2]"]);

        let property = Property::string("codes")
            .repeated()
            .validate_with(RegexValidator::new("^[A-Z]+$").unwrap());
        let errors = convert(&property, json!(["ab", "CD", "ef"])).unwrap_err();
        assert_eq!(errors.keys(), vec!["codes[0]", "codes[2]"]);
    }

    #[test]
    fn test_required_counts_apply_to_whole_sequence() {
        let property = Property::integer("picks")
            .repeated()
            .validate_with(RequiredValidator::new().min_count(1).max_count(2));

        assert!(convert(&property, json!([])).is_err());
        assert!(convert(&property, json!([1, 2, 3])).is_err());
        assert!(convert(&property, json!([1, 2])).is_ok());
    }

    #[test]
    fn test_validators_fail_fast_in_declaration_order() {
        let property = Property::integer("age")
            .validator(bounds(Some(10.0), None))
            .validator(bounds(None, Some(5.0)));

        let errors = convert(&property, json!(1)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("age").unwrap().message(), "value must be at least 10");
    }

    #[test]
    fn test_is_required_reflects_validators() {
        assert!(Property::string("a").validator(required()).is_required());
        assert!(!Property::string("a").validator(bounds(None, None)).is_required());
    }
}
