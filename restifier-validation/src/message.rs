//! Message schemas and checked message instances
//!
//! A [`MessageSchema`] is built once at startup and shared read-only. Each
//! call to [`MessageSchema::check`] produces a fresh [`Message`] owning its
//! converted data and errors.
//!
//! ```
//! use restifier_validation::{MessageSchema, Property, required, bounds};
//! use serde_json::json;
//!
//! let schema = MessageSchema::builder("Person")
//!     .property(Property::string("name").validator(required()))
//!     .property(Property::integer("age").validator(bounds(Some(0.0), None)))
//!     .build()
//!     .unwrap();
//!
//! let message = schema.check_value(&json!({"name": "Ada", "age": "36"})).unwrap();
//! assert!(message.is_valid());
//! assert_eq!(message.to_json().unwrap(), r#"{"name":"Ada","age":36}"#);
//! ```

use crate::xml::{self, is_element_name};
use crate::{FieldErrors, FieldValue, PayloadParseError, Property, SchemaError};
use restifier_core::Error;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// Ordered, immutable set of properties
#[derive(Debug)]
pub struct MessageSchema {
    name: String,
    description: String,
    properties: Vec<Property>,
}

/// Builder for [`MessageSchema`]
#[derive(Debug)]
pub struct MessageSchemaBuilder {
    name: String,
    description: String,
    properties: Vec<Property>,
}

impl MessageSchemaBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declare a property; declaration order is check and output order
    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn build(self) -> Result<Arc<MessageSchema>, SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }

        if !is_element_name(&self.name) {
            return Err(SchemaError::InvalidName(self.name));
        }

        let mut seen = HashSet::new();
        for property in &self.properties {
            if !is_element_name(property.name()) {
                return Err(SchemaError::InvalidName(property.name().to_string()));
            }
            if !seen.insert(property.name()) {
                return Err(SchemaError::DuplicateProperty {
                    message: self.name.clone(),
                    property: property.name().to_string(),
                });
            }
        }

        Ok(Arc::new(MessageSchema {
            name: self.name,
            description: self.description,
            properties: self.properties,
        }))
    }
}

impl MessageSchema {
    pub fn builder(name: impl Into<String>) -> MessageSchemaBuilder {
        MessageSchemaBuilder {
            name: name.into(),
            description: String::new(),
            properties: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Check a mapping against every declared property.
    ///
    /// Every property is attempted even after failures, so the returned
    /// instance carries all simultaneous violations. Unknown keys are ignored.
    pub fn check(self: &Arc<Self>, data: &Map<String, Value>) -> Message {
        let mut valid_data = ValidData::default();
        let mut errors = FieldErrors::new();

        for property in &self.properties {
            match property.convert_and_check(data.get(property.name())) {
                Ok(Some(value)) => valid_data.insert(property.name().to_string(), value),
                Ok(None) => trace!(schema = %self.name, field = property.name(), "Optional field absent"),
                Err(field_errors) => errors.extend(field_errors),
            }
        }

        if !errors.is_empty() {
            debug!(
                schema = %self.name,
                error_count = errors.len(),
                "Message failed validation"
            );
        }

        Message {
            schema: Arc::clone(self),
            raw_input: Value::Object(data.clone()),
            valid_data,
            errors,
        }
    }

    /// Check an arbitrary JSON value, which must be an object
    pub fn check_value(self: &Arc<Self>, data: &Value) -> Result<Message, PayloadParseError> {
        match data {
            Value::Object(map) => Ok(self.check(map)),
            other => Err(PayloadParseError(format!(
                "expected a JSON object, got {}",
                json_type_name(other)
            ))),
        }
    }

    /// Parse JSON bytes and check the resulting object
    pub fn from_json(self: &Arc<Self>, bytes: &[u8]) -> Result<Message, PayloadParseError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| PayloadParseError(e.to_string()))?;
        self.check_value(&value)
    }

    /// Describe every property, in declaration order
    pub fn to_docs(&self) -> Vec<FieldDoc> {
        self.properties.iter().map(FieldDoc::from_property).collect()
    }
}

/// Converted values of a checked message, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidData {
    entries: Vec<(String, FieldValue)>,
}

impl ValidData {
    fn insert(&mut self, name: String, value: FieldValue) {
        self.entries.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A checked message: the outcome of one [`MessageSchema::check`] call
#[derive(Debug, Clone)]
pub struct Message {
    schema: Arc<MessageSchema>,
    raw_input: Value,
    valid_data: ValidData,
    errors: FieldErrors,
}

impl Message {
    pub fn schema(&self) -> &Arc<MessageSchema> {
        &self.schema
    }

    pub fn raw_input(&self) -> &Value {
        &self.raw_input
    }

    pub fn valid_data(&self) -> &ValidData {
        &self.valid_data
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.valid_data.get(name)
    }

    /// `valid_data` as a JSON value
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.valid_data
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_json()))
                .collect(),
        )
    }

    /// Serialize `valid_data` as JSON
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Serialize `valid_data` as XML rooted at the schema name
    pub fn to_xml(&self) -> Result<String, Error> {
        xml::to_xml(self)
    }

    /// Describe this message's schema
    pub fn to_docs(&self) -> Vec<FieldDoc> {
        self.schema.to_docs()
    }

    /// Convert into a `Result`, yielding the errors if invalid
    pub fn into_result(self) -> Result<Message, FieldErrors> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(self.errors)
        }
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name == other.schema.name
            && self.valid_data == other.valid_data
            && self.errors == other.errors
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.valid_data.len()))?;
        for (name, value) in self.valid_data.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Documentation for one property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDoc {
    pub name: String,
    pub kind: String,
    pub repeated: bool,
    pub required: bool,
    pub description: String,
    /// Nested schema name for structured properties
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    /// Nested schema fields for structured properties
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<FieldDoc>,
}

impl FieldDoc {
    pub fn from_property(property: &Property) -> Self {
        let schema = property.kind().schema();
        Self {
            name: property.name().to_string(),
            kind: property.kind().name().to_string(),
            repeated: property.is_repeated(),
            required: property.is_required(),
            description: property.get_description().to_string(),
            message: schema.map(|s| s.name().to_string()),
            fields: schema.map(|s| s.to_docs()).unwrap_or_default(),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
