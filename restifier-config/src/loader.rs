// Configuration file loaders

use crate::{ConfigError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
    Env,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            "env" => Some(FileFormat::Env),
            _ => None,
        }
    }

    /// Detect the format of a path; `.env` files have no extension of their own
    pub fn detect(path: &Path) -> Option<Self> {
        if path.file_name().and_then(|n| n.to_str()) == Some(".env") {
            return Some(FileFormat::Env);
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Parses one configuration source into a JSON object
#[derive(Debug, Clone, Copy)]
pub struct ConfigLoader {
    format: FileFormat,
}

impl ConfigLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Pick the loader from a file's extension
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        FileFormat::detect(path).map(Self::new).ok_or_else(|| {
            ConfigError::LoadError(format!("Unsupported format: {}", path.display()))
        })
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Load configuration from a file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Map<String, Value>> {
        let content = fs::read_to_string(path.as_ref())?;
        self.parse(&content)
    }

    /// Parse configuration text
    pub fn parse(&self, content: &str) -> Result<Map<String, Value>> {
        let value = match self.format {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))?,
            FileFormat::Toml => parse_toml(content)?,
            FileFormat::Env => parse_env(content)?,
        };

        match value {
            Value::Object(map) => Ok(map),
            _ => Err(ConfigError::ParseError(
                "configuration root must be a table".to_string(),
            )),
        }
    }
}

fn parse_toml(content: &str) -> Result<Value> {
    let toml_value: toml::Value = toml::from_str(content)
        .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

    serde_json::to_value(toml_value)
        .map_err(|e| ConfigError::ParseError(format!("TOML conversion error: {}", e)))
}

/// `KEY=value` lines; keys are kept verbatim for the environment mapping
fn parse_env(content: &str) -> Result<Value> {
    let mut map = Map::new();
    for item in dotenvy::from_read_iter(content.as_bytes()) {
        let (key, value) =
            item.map_err(|e| ConfigError::ParseError(format!("env parse error: {}", e)))?;
        map.insert(key, Value::String(value));
    }
    Ok(Value::Object(map))
}
