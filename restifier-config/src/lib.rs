//! Configuration for Restifier services
//!
//! Sources are layered in the order they are added to a [`ConfigBuilder`]:
//! later sources override earlier ones key by key. Keys are dotted paths
//! (`docs.api_base`); nested tables in JSON or TOML files are flattened and
//! prefixed environment variables (`RESTIFIER_DOCS_API_BASE`) map onto the
//! same keys. The resulting [`ConfigManager`] is immutable.
//!
//! ```
//! use restifier_config::{ConfigManager, FileFormat, ServiceConfig};
//!
//! let manager = ConfigManager::builder()
//!     .add_str(r#"{"docs": {"api_base": "/help"}}"#, FileFormat::Json)
//!     .unwrap()
//!     .add_env_from([("RESTIFIER_DOCS_TITLE", "Help")])
//!     .build();
//!
//! let config = ServiceConfig::from_manager(&manager).unwrap();
//! assert_eq!(config.docs.api_base, "/help");
//! assert_eq!(config.docs.title, "Help");
//! assert_eq!(config.log.level, "info");
//! ```

pub mod env;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use env::{DEFAULT_PREFIX, EnvLoader};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use settings::{DocsSettings, LogSettings, ServiceConfig};
pub use validation::{ConfigValidator, Validate};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Layered configuration sources
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    env: EnvLoader,
    values: BTreeMap<String, Value>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different environment variable prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env = EnvLoader::new(prefix);
        self
    }

    /// Set one value directly
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Add configuration text in the given format
    pub fn add_str(self, content: &str, format: FileFormat) -> Result<Self> {
        let map = ConfigLoader::new(format).parse(content)?;
        Ok(self.merge_source(map, format))
    }

    /// Add a configuration file; the format follows the extension
    pub fn add_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let loader = ConfigLoader::auto(path)?;
        let map = loader.load_file(path)?;
        debug!(path = %path.display(), format = ?loader.format(), "Loaded configuration file");
        Ok(self.merge_source(map, loader.format()))
    }

    /// Add prefixed variables from the process environment
    pub fn add_env(self) -> Self {
        let vars = self.env.load();
        self.merge_env(vars)
    }

    /// Add prefixed variables from explicit pairs
    pub fn add_env_from<I, K, V>(self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let vars = self.env.load_from(vars);
        self.merge_env(vars)
    }

    pub fn build(self) -> ConfigManager {
        ConfigManager {
            values: Arc::new(self.values),
        }
    }

    fn merge_source(self, map: Map<String, Value>, format: FileFormat) -> Self {
        match format {
            // .env files use variable names, not configuration keys
            FileFormat::Env => {
                let vars: Vec<(String, String)> = map
                    .into_iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
                    .collect();
                self.add_env_from(vars)
            }
            FileFormat::Json | FileFormat::Toml => {
                let mut builder = self;
                flatten("", Value::Object(map), &mut builder.values);
                builder
            }
        }
    }

    fn merge_env(mut self, vars: BTreeMap<String, String>) -> Self {
        for (key, value) in vars {
            self.values.insert(key, Value::String(value));
        }
        self
    }
}

/// Immutable view over loaded configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: Arc<BTreeMap<String, Value>>,
}

impl ConfigManager {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Get a value by dotted key
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))?;

        serde_json::from_value(value.clone())
            .map_err(|e| ConfigError::DeserializationError(format!("{}: {}", key, e)))
    }

    /// Get a value, falling back to a default
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// All keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }

    /// Rebuild the nested object the dotted keys describe
    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        for (key, value) in self.values.iter() {
            insert_path(&mut root, key, value.clone());
        }
        Value::Object(root)
    }

    /// Deserialize the whole configuration into a settings type
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.to_value())
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))
    }

    /// Deserialize and validate
    pub fn load_validated<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        let settings: T = self.deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}

fn flatten(prefix: &str, value: Value, out: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                let path = if prefix.is_empty() {
                    key
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&path, value, out);
            }
        }
        other => {
            out.insert(prefix.to_string(), other);
        }
    }
}

fn insert_path(root: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            root.insert(key.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = root
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_path(child, rest, value);
            }
        }
    }
}
