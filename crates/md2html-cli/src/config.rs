//! Configuration file support for md2html CLI
//!
//! Loads settings from an `_md2html.toml` configuration file.

use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "_md2html.toml";

/// Schema URL for the configuration file
pub const SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/md2html/md2html/main/crates/md2html-cli/schema/md2html.schema.json";

/// Root configuration structure
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Output configuration
    #[serde(skip_serializing_if = "OutputConfig::is_empty")]
    pub output: OutputConfig,
    /// Standalone page configuration
    #[serde(skip_serializing_if = "PageConfig::is_empty")]
    pub page: PageConfig,
}

/// Output configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Wrap the converted fragments in a complete HTML page (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standalone: Option<bool>,
    /// Extension of generated files (default: "html")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl OutputConfig {
    fn is_empty(&self) -> bool {
        self.standalone.is_none() && self.extension.is_none()
    }
}

/// Head content used for standalone pages
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct PageConfig {
    /// Page title (default: text of the first header)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Language of the page, written to `<html lang="...">`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Stylesheet URL to link from the page head
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<String>,
}

impl PageConfig {
    fn is_empty(&self) -> bool {
        self.title.is_none() && self.lang.is_none() && self.stylesheet.is_none()
    }
}

impl Config {
    /// Load configuration from a specific file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Try to load configuration from a directory (looks for `_md2html.toml`)
    ///
    /// Returns `Ok(None)` if the config file doesn't exist.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            log::debug!("loading config from {}", config_path.display());
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Generate JSON schema for the configuration
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Generate JSON schema as a string
    pub fn json_schema_string() -> Result<String> {
        let schema = Self::json_schema();
        serde_json::to_string_pretty(&schema).context("Failed to serialize JSON schema")
    }

    /// Serialize configuration to TOML string with schema directive
    pub fn to_toml_with_schema(&self) -> Result<String> {
        let toml_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        Ok(format!("#:schema {}\n\n{}", SCHEMA_URL, toml_content))
    }

    /// Create a sample configuration with common defaults for init command
    pub fn sample() -> Self {
        Config {
            output: OutputConfig {
                standalone: Some(false),
                extension: Some("html".to_string()),
            },
            page: PageConfig {
                title: None, // first header
                lang: Some("en".to_string()),
                stylesheet: None,
            },
        }
    }
}
