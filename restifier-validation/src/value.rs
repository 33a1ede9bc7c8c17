//! Converted field values
//!
//! Raw input arrives as `serde_json::Value`; after coercion every declared
//! property holds a [`FieldValue`] of its declared kind.

use crate::Message;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Canonical wire format for dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A type-converted property value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    /// A structured property: a checked nested message
    Message(Message),
    /// A repeated property, in input order
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view used by bounds checks; integers widen to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            FieldValue::Message(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Empty string or empty list
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::String(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Scalar values in their canonical text form; `None` for messages and lists
    pub fn to_text(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Boolean(b) => Some(b.to_string()),
            FieldValue::Date(d) => Some(format_date(d)),
            FieldValue::DateTime(dt) => Some(format_datetime(dt)),
            FieldValue::Message(_) | FieldValue::List(_) => None,
        }
    }

    /// Convert to a JSON value using the canonical wire forms
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Integer(i) => serde_json::Value::from(*i),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Boolean(b) => serde_json::Value::Bool(*b),
            FieldValue::Date(d) => serde_json::Value::String(format_date(d)),
            FieldValue::DateTime(dt) => serde_json::Value::String(format_datetime(dt)),
            FieldValue::Message(m) => m.to_value(),
            FieldValue::List(items) => {
                serde_json::Value::Array(items.iter().map(FieldValue::to_json).collect())
            }
        }
    }
}

/// `YYYY-MM-DD`
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// RFC 3339 in UTC with a `Z` suffix; sub-second digits only when present
pub fn format_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::Integer(i) => serializer.serialize_i64(*i),
            FieldValue::Float(f) => serializer.serialize_f64(*f),
            FieldValue::Boolean(b) => serializer.serialize_bool(*b),
            FieldValue::Date(d) => serializer.serialize_str(&format_date(d)),
            FieldValue::DateTime(dt) => serializer.serialize_str(&format_datetime(dt)),
            FieldValue::Message(m) => m.serialize(serializer),
            FieldValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl From<Message> for FieldValue {
    fn from(value: Message) -> Self {
        FieldValue::Message(value)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_canonical_text_forms() {
        let date = NaiveDate::from_ymd_opt(2012, 12, 1).unwrap();
        assert_eq!(FieldValue::from(date).to_text().unwrap(), "2012-12-01");

        let datetime = Utc.timestamp_opt(1406650720, 0).unwrap();
        assert_eq!(
            FieldValue::from(datetime).to_text().unwrap(),
            "2014-07-29T16:18:40Z"
        );
    }

    #[test]
    fn test_serialize_list() {
        let value = FieldValue::from(vec!["a", "b"]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"["a","b"]"#);
        assert_eq!(value.to_json(), serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_emptiness() {
        assert!(FieldValue::from("").is_empty());
        assert!(FieldValue::List(Vec::new()).is_empty());
        assert!(!FieldValue::from(0).is_empty());
        assert!(!FieldValue::from(vec![1]).is_empty());
    }

    #[test]
    fn test_numeric_view() {
        assert_eq!(FieldValue::from(3).as_f64(), Some(3.0));
        assert_eq!(FieldValue::from(2.5).as_f64(), Some(2.5));
        assert_eq!(FieldValue::from("3").as_f64(), None);
    }
}
