//! Configuration loading and defaults for x11wininfo.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputMode;

/// How property values longer than one read are handled.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReadStrategy {
    /// Keep only the first read (default).
    #[default]
    Truncate,
    /// Keep reading until the whole value is retrieved.
    Full,
}

/// Main configuration for x11wininfo.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output mode used when `-m` is not given (default: text).
    pub mode: OutputMode,

    /// Long property handling (default: truncate).
    pub property_read: ReadStrategy,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration from `path`, or the default path, or return defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(p) = path {
            return Self::load(p);
        }

        if let Some(p) = default_path()
            && p.exists()
        {
            return Self::load(&p);
        }

        Ok(Self::default())
    }
}

/// `<config dir>/x11wininfo/config.toml`, if a config dir is known.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("x11wininfo").join("config.toml"))
}
