use crate::config::schema::SelfValidating;
use crate::errors::types::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`AgentConfig::host_tag`]
pub const ENV_HOST_TAG: &str = "REWIND_HOST_TAG";
/// Environment variable overriding [`AgentConfig::service_name`]
pub const ENV_SERVICE_NAME: &str = "REWIND_SERVICE_NAME";
/// Environment variable overriding [`LoggingSettings::level`]
pub const ENV_LOG_LEVEL: &str = "REWIND_LOG_LEVEL";

/// Process-wide agent configuration.
///
/// ```toml
/// service_name = "orders"
/// host_tag = "10.0.0.1"
/// ignored_operations = ["Database:health_check"]
///
/// [logging]
/// enabled = true
/// level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Name of the instrumented service
    pub service_name: String,
    /// Host or instance tag embedded in every session id
    pub host_tag: String,
    /// Leading segment of every session id
    pub id_brand: String,
    /// Operations whose replayed results are never substituted
    pub ignored_operations: Vec<String>,
    /// Logging section
    pub logging: LoggingSettings,
}

/// `[logging]` section of the agent configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Install a global `tracing` subscriber during agent startup
    pub enabled: bool,
    /// Minimum level, parsed with `tracing::Level::from_str`
    pub level: String,
    /// Emit JSON lines instead of the human-readable format
    pub json: bool,
    /// Include source file and line in every event
    pub file_info: bool,
    /// Log span enter and exit
    pub spans: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
            json: false,
            file_info: false,
            spans: false,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            service_name: "rewind".to_string(),
            host_tag: "127.0.0.1".to_string(),
            id_brand: "REWIND".to_string(),
            ignored_operations: Vec::new(),
            logging: LoggingSettings::default(),
        }
    }
}

impl AgentConfig {
    /// Create a configuration for a service running on the given host
    pub fn new(service_name: impl Into<String>, host_tag: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            host_tag: host_tag.into(),
            ..Default::default()
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: AgentConfig = toml::from_str(source)?;
        config.validate_after_load()
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading agent configuration");
        Self::from_toml_str(&source)
    }

    /// Apply `REWIND_*` overrides from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(host_tag) = lookup(ENV_HOST_TAG) {
            self.host_tag = host_tag;
        }
        if let Some(service_name) = lookup(ENV_SERVICE_NAME) {
            self.service_name = service_name;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        self
    }
}

impl SelfValidating for AgentConfig {
    fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(Error::Validation("service_name must not be empty".to_string()));
        }
        if self.id_brand.trim().is_empty() {
            return Err(Error::Validation("id_brand must not be empty".to_string()));
        }
        if self.id_brand.contains(char::is_whitespace) {
            return Err(Error::Validation(format!(
                "id_brand must not contain whitespace: {:?}",
                self.id_brand
            )));
        }
        if self.ignored_operations.iter().any(|op| op.trim().is_empty()) {
            return Err(Error::Validation("ignored_operations contains an empty entry".to_string()));
        }
        crate::logging::parse_log_level(&self.logging.level)?;
        Ok(())
    }
}
