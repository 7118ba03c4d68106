//! Render configuration file support
//!
//! Handles parsing of `.bpmn-tag.toml` configuration files and
//! environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::render::RenderOptions;

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".bpmn-tag.toml";

/// Environment variable for the empty element style
pub const ENV_EMPTY_ELEMENTS: &str = "BPMN_TAG_EMPTY_ELEMENTS";

/// Environment variable toggling the XML declaration
pub const ENV_XML_DECLARATION: &str = "BPMN_TAG_XML_DECLARATION";

/// Error type for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Main configuration structure
///
/// Represents the `.bpmn-tag.toml` configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TagConfig {
    /// Serialization options
    #[serde(default)]
    pub render: RenderOptions,
}

impl TagConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a directory
    ///
    /// Looks for `.bpmn-tag.toml` in `dir`, falls back to defaults if not
    /// found, then applies environment variable overrides.
    pub fn load(dir: &Path) -> ConfigResult<Self> {
        let config_path = dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Read configuration from an explicit file path
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("Failed to read config: {}", e)))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> ConfigResult<Self> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a directory
    pub fn save(&self, dir: &Path) -> ConfigResult<()> {
        let config_path = dir.join(CONFIG_FILENAME);
        let content = self.to_toml()?;

        std::fs::write(&config_path, content)
            .map_err(|e| ConfigError::IoError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to serialize config: {}", e))
        })
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup. Unparseable values
    /// are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(style) = lookup(ENV_EMPTY_ELEMENTS) {
            match style.parse() {
                Ok(style) => self.render.empty_elements = style,
                Err(e) => warn!("Ignoring {}: {}", ENV_EMPTY_ELEMENTS, e),
            }
        }

        if let Some(flag) = lookup(ENV_XML_DECLARATION) {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.render.xml_declaration = true,
                "0" | "false" | "no" | "off" => self.render.xml_declaration = false,
                other => warn!("Ignoring {}: not a boolean: {}", ENV_XML_DECLARATION, other),
            }
        }
    }

    /// Check if configuration exists in a directory
    pub fn exists(dir: &Path) -> bool {
        dir.join(CONFIG_FILENAME).exists()
    }
}

/// Generate a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# BPMN tag tree configuration

[render]
# Form of elements without children: "self-closing" (<a/>, default) or "expanded" (<a></a>)
empty_elements = "self-closing"

# Prefix output with <?xml version="1.0" encoding="UTF-8"?>
xml_declaration = false
"#
}
