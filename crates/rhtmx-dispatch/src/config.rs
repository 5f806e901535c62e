// File: src/config.rs
// Purpose: Dispatch configuration parsed from the [dispatch] table of rhtmx.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Dispatch settings for a host
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchConfig {
    /// Host name used in error reasons (default: "app")
    #[serde(default = "default_name")]
    pub name: String,

    /// Verbs registered in addition to the defaults
    #[serde(default)]
    pub methods: Vec<String>,

    /// Whether string route patterns match case-insensitively (default: false)
    #[serde(default = "default_false")]
    pub case_insensitive: bool,

    /// Whether the host owns named collections (default: true)
    #[serde(default = "default_true")]
    pub templates: bool,
}

/// Layout of rhtmx.toml as far as dispatch is concerned
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    dispatch: DispatchConfig,
}

fn default_name() -> String {
    "app".to_string()
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            methods: Vec::new(),
            case_insensitive: false,
            templates: true,
        }
    }
}

impl DispatchConfig {
    /// Load the [dispatch] table from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from default path (./rhtmx.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("rhtmx.toml")
    }

    /// Parse the [dispatch] table from TOML text; empty text gives defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.dispatch)
    }
}
