//! CLI configuration file
//!
//! ```toml
//! [search]
//! shard_timeout_ms = 30000
//! opensearch_hosts = ["http://localhost:9200"]
//!
//! [index_patterns]
//! short_dots_enable = true
//!
//! [import]
//! url = "http://localhost:5601"
//! data_source_enabled = false
//! ```

use anyhow::{Context, Result};
use dash_index_patterns::IndexPatternsConfig;
use dash_search::SearchStrategyConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default dashboards URL for imports
pub const DEFAULT_DASHBOARDS_URL: &str = "http://localhost:5601";

/// Saved object import settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Dashboards base URL
    pub url: String,
    pub data_source_enabled: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DASHBOARDS_URL.to_string(),
            data_source_enabled: false,
        }
    }
}

/// Whole CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub search: SearchStrategyConfig,
    pub index_patterns: IndexPatternsConfig,
    pub import: ImportConfig,
}

impl DashConfig {
    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// If the text is not valid TOML for this layout
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Load configuration; no path means defaults
    ///
    /// # Errors
    /// If the file cannot be read or parsed
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }
}
