// Environment variable loading

use crate::{ConfigError, Result};
use std::collections::BTreeMap;
use std::env;

/// Default prefix for service environment variables
pub const DEFAULT_PREFIX: &str = "RESTIFIER";

/// Maps prefixed environment variables onto dotted configuration keys.
///
/// `RESTIFIER_DOCS_API_BASE` becomes `docs.api_base`: the first segment after
/// the prefix names the section, the rest names the field.
#[derive(Debug, Clone)]
pub struct EnvLoader {
    prefix: String,
}

impl EnvLoader {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Load every matching variable from the process environment
    pub fn load(&self) -> BTreeMap<String, String> {
        self.load_from(env::vars())
    }

    /// Load every matching variable from an explicit set of pairs
    pub fn load_from<I, K, V>(&self, vars: I) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        vars.into_iter()
            .filter_map(|(key, value)| Some((self.config_key(key.as_ref())?, value.into())))
            .collect()
    }

    /// Configuration key for an environment variable name, if it carries the prefix
    pub fn config_key(&self, var: &str) -> Option<String> {
        let rest = var.strip_prefix(&self.prefix)?.strip_prefix('_')?;
        let rest = rest.to_lowercase();
        match rest.split_once('_') {
            Some((section, field)) if !section.is_empty() && !field.is_empty() => {
                Some(format!("{}.{}", section, field))
            }
            _ if !rest.is_empty() => Some(rest),
            _ => None,
        }
    }

    /// Environment variable name for a dotted configuration key
    pub fn var_name(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key.replace('.', "_").to_uppercase())
    }

    /// Read one variable by configuration key
    pub fn load_var(&self, key: &str) -> Result<String> {
        env::var(self.var_name(key)).map_err(ConfigError::EnvError)
    }

    /// Read one variable, falling back to a default
    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_var(key).unwrap_or_else(|_| default.to_string())
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}
