// Typed service settings

use crate::validation::{ConfigValidator, Validate};
use crate::{ConfigManager, Result};
use restifier_core::logging::{LogConfig, LogFormat, LogLevel};
use restifier_docs::DocsConfig;
use serde::{Deserialize, Serialize};

/// Settings for a Restifier service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub docs: DocsSettings,
    pub log: LogSettings,
}

/// Documentation page settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsSettings {
    pub api_base: String,
    pub api_overview: String,
    pub title: String,
}

impl Default for DocsSettings {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            api_overview: String::new(),
            title: "API Documentation".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub format: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Deserialize and validate settings from loaded configuration
    pub fn from_manager(manager: &ConfigManager) -> Result<Self> {
        let config: Self = manager.deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Settings from the process environment only
    pub fn from_env() -> Result<Self> {
        Self::from_manager(&ConfigManager::builder().add_env().build())
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        self.docs.validate()?;
        self.log.validate()
    }
}

impl Validate for DocsSettings {
    fn validate(&self) -> Result<()> {
        ConfigValidator::is_path(&self.api_base, "docs.api_base")?;
        ConfigValidator::not_empty(&self.title, "docs.title")
    }
}

impl Validate for LogSettings {
    fn validate(&self) -> Result<()> {
        self.to_log_config().map(|_| ())
    }
}

impl LogSettings {
    /// Logging configuration for these settings
    pub fn to_log_config(&self) -> Result<LogConfig> {
        let level = ConfigValidator::parses(&self.level, "log.level", LogLevel::from_str)?;
        let format = ConfigValidator::parses(&self.format, "log.format", LogFormat::from_str)?;
        Ok(LogConfig::new().level(level).format(format))
    }
}

impl From<DocsSettings> for DocsConfig {
    fn from(settings: DocsSettings) -> Self {
        DocsConfig::new(settings.api_base)
            .with_overview(settings.api_overview)
            .with_title(settings.title)
    }
}
