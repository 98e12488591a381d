//! Search strategy configuration

use serde::{Deserialize, Serialize};

/// Default OpenSearch host
pub const DEFAULT_HOST: &str = "http://localhost:9200";

/// Advanced settings that shape default request parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSearchSettings {
    /// Forwarded only when positive
    pub max_concurrent_shard_requests: i64,
    /// Search frozen indices; `ignore_throttled` is its negation
    pub include_frozen: bool,
    pub data_frame_hydration_strategy: Option<String>,
}

/// Configuration of [`crate::OpenSearchSearchStrategy`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchStrategyConfig {
    /// Per-shard timeout in milliseconds, 0 disables it
    pub shard_timeout_ms: u64,
    /// Hosts of the default cluster; may be empty when only data sources are used
    pub opensearch_hosts: Vec<String>,
    /// Use the long-numerals-aware default client
    pub with_long_numerals_support: bool,
    pub ui: UiSearchSettings,
}

impl Default for SearchStrategyConfig {
    fn default() -> Self {
        Self {
            shard_timeout_ms: 0,
            opensearch_hosts: vec![DEFAULT_HOST.to_string()],
            with_long_numerals_support: false,
            ui: UiSearchSettings::default(),
        }
    }
}

impl SearchStrategyConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With shard timeout
    #[inline]
    #[must_use]
    pub fn with_shard_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.shard_timeout_ms = timeout_ms;
        self
    }

    /// With default cluster hosts
    #[must_use]
    pub fn with_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opensearch_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_long_numerals_support(mut self, enabled: bool) -> Self {
        self.with_long_numerals_support = enabled;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_concurrent_shard_requests(mut self, max: i64) -> Self {
        self.ui.max_concurrent_shard_requests = max;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_include_frozen(mut self, include: bool) -> Self {
        self.ui.include_frozen = include;
        self
    }

    /// Whether no default cluster is configured
    #[inline]
    #[must_use]
    pub fn hosts_empty(&self) -> bool {
        self.opensearch_hosts.is_empty()
    }
}
