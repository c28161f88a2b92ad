//! Store configuration
//!
//! Persisted as `config.toml` inside the store directory. Every field
//! has a sensible default so a missing or partial file still opens.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::buyer::{BuyerStatus, PROPERTY_TYPES, SOURCES, TIMELINES};
use crate::error::{DispoError, Result};
use crate::id::IdScheme;

/// Current store format version
pub const STORE_FORMAT_VERSION: u32 = 1;

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store format version for compatibility checking
    #[serde(default = "default_version")]
    pub version: u32,

    /// Default lifecycle status for new buyers
    #[serde(default)]
    pub default_status: BuyerStatus,

    /// ID generation scheme
    #[serde(default)]
    pub id_scheme: IdScheme,

    /// Custom store root path (optional, overrides default discovery)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<String>,

    /// Property type vocabulary offered at intake
    #[serde(default = "default_property_types")]
    pub property_types: Vec<String>,

    /// Purchase timeline vocabulary
    #[serde(default = "default_timelines")]
    pub timelines: Vec<String>,

    /// Acquisition source vocabulary
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,

    /// Console presentation settings
    #[serde(default)]
    pub ui: UiConfig,
}

/// Presentation settings carried between sessions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Start with the sidebar collapsed
    #[serde(default)]
    pub sidebar_collapsed: bool,
}

fn default_version() -> u32 {
    STORE_FORMAT_VERSION
}

fn default_property_types() -> Vec<String> {
    PROPERTY_TYPES.iter().map(|s| s.to_string()).collect()
}

fn default_timelines() -> Vec<String> {
    TIMELINES.iter().map(|s| s.to_string()).collect()
}

fn default_sources() -> Vec<String> {
    SOURCES.iter().map(|s| s.to_string()).collect()
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            version: STORE_FORMAT_VERSION,
            default_status: BuyerStatus::default(),
            id_scheme: IdScheme::default(),
            store_path: None,
            property_types: default_property_types(),
            timelines: default_timelines(),
            sources: default_sources(),
            ui: UiConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: StoreConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DispoError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }
}
