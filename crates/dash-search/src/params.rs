//! Request parameter shaping
//!
//! Default parameters come from advanced settings; the shard timeout from
//! config; request params override both. Top-level keys are converted to
//! snake case before reaching the client.

use crate::config::{SearchStrategyConfig, UiSearchSettings};
use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Search request parameters
pub type SearchParams = Map<String, Value>;

/// Defaults derived from advanced settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultSearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent_shard_requests: Option<i64>,
    pub ignore_throttled: bool,
    pub ignore_unavailable: bool,
    pub track_total_hits: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_frame_hydration_strategy: Option<String>,
}

impl DefaultSearchParams {
    /// Defaults for the given settings
    #[must_use]
    pub fn from_settings(settings: &UiSearchSettings) -> Self {
        let max = settings.max_concurrent_shard_requests;
        Self {
            max_concurrent_shard_requests: (max > 0).then_some(max),
            ignore_throttled: !settings.include_frozen,
            ignore_unavailable: true,
            track_total_hits: true,
            data_frame_hydration_strategy: settings.data_frame_hydration_strategy.clone(),
        }
    }

    /// Parameters forwarded by the default strategy
    ///
    /// `ignoreThrottled` and `dataFrameHydrationStrategy` are not supported
    /// by the default client and are left out.
    #[must_use]
    pub fn forwarded(&self) -> SearchParams {
        let mut params = SearchParams::new();
        if let Some(max) = self.max_concurrent_shard_requests {
            params.insert("maxConcurrentShardRequests".to_string(), Value::from(max));
        }
        params.insert("ignoreUnavailable".to_string(), Value::Bool(self.ignore_unavailable));
        params.insert("trackTotalHits".to_string(), Value::Bool(self.track_total_hits));
        params
    }
}

/// `{timeout: "<ms>ms"}` when a shard timeout is set, else empty
#[must_use]
pub fn shard_timeout(timeout_ms: u64) -> SearchParams {
    let mut params = SearchParams::new();
    if timeout_ms > 0 {
        params.insert("timeout".to_string(), Value::String(format!("{timeout_ms}ms")));
    }
    params
}

/// Convert top-level keys to snake case; on collision the later key wins
#[must_use]
pub fn to_snake_case(params: SearchParams) -> SearchParams {
    let mut converted = SearchParams::with_capacity(params.len());
    for (key, value) in params {
        converted.insert(key.to_case(Case::Snake), value);
    }
    converted
}

/// Merge layers in order, later layers overriding earlier ones
#[must_use]
pub fn merge_params<I>(layers: I) -> SearchParams
where
    I: IntoIterator<Item = SearchParams>,
{
    let mut merged = SearchParams::new();
    for layer in layers {
        merged.extend(layer);
    }
    merged
}

/// Parameters sent to the client: defaults, then shard timeout, then
/// request params, with top-level keys in snake case
#[must_use]
pub fn build_search_params(
    config: &SearchStrategyConfig,
    request_params: SearchParams,
) -> SearchParams {
    let defaults = DefaultSearchParams::from_settings(&config.ui);
    to_snake_case(merge_params([
        defaults.forwarded(),
        shard_timeout(config.shard_timeout_ms),
        request_params,
    ]))
}

/// Shard counts reported in a response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShardStats {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    pub skipped: u64,
}

/// Progress figures of a completed search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalLoaded {
    pub total: u64,
    pub loaded: u64,
}

/// `total` shards and `loaded` = successful + failed
#[inline]
#[must_use]
pub fn get_total_loaded(shards: &ShardStats) -> TotalLoaded {
    TotalLoaded {
        total: shards.total,
        loaded: shards.successful.saturating_add(shards.failed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn as_params(value: Value) -> SearchParams {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn defaults_without_concurrency_limit() {
        let params = DefaultSearchParams::from_settings(&UiSearchSettings::default());
        assert!(params.ignore_throttled);
        assert_eq!(
            Value::Object(params.forwarded()),
            json!({"ignoreUnavailable": true, "trackTotalHits": true})
        );
    }

    #[test]
    fn positive_concurrency_limit_forwarded() {
        let settings = UiSearchSettings {
            max_concurrent_shard_requests: 5,
            include_frozen: true,
            data_frame_hydration_strategy: Some("perSource".to_string()),
        };
        let params = DefaultSearchParams::from_settings(&settings);
        assert!(!params.ignore_throttled);
        let forwarded = params.forwarded();
        assert_eq!(forwarded["maxConcurrentShardRequests"], json!(5));
        assert!(!forwarded.contains_key("ignoreThrottled"));
        assert!(!forwarded.contains_key("dataFrameHydrationStrategy"));
    }

    #[test]
    fn negative_concurrency_limit_dropped() {
        let settings = UiSearchSettings {
            max_concurrent_shard_requests: -1,
            ..UiSearchSettings::default()
        };
        let params = DefaultSearchParams::from_settings(&settings);
        assert_eq!(params.max_concurrent_shard_requests, None);
    }

    #[test]
    fn shard_timeout_formatting() {
        assert!(shard_timeout(0).is_empty());
        assert_eq!(shard_timeout(30_000)["timeout"], json!("30000ms"));
    }

    #[test]
    fn snake_case_top_level_only() {
        let converted = to_snake_case(as_params(json!({
            "trackTotalHits": true,
            "index": "logs-*",
            "body": {"queryString": "x"}
        })));
        assert_eq!(
            Value::Object(converted),
            json!({
                "track_total_hits": true,
                "index": "logs-*",
                "body": {"queryString": "x"}
            })
        );
    }

    #[test]
    fn later_layers_win() {
        let merged = merge_params([
            as_params(json!({"ignoreUnavailable": true, "timeout": "1ms"})),
            shard_timeout(500),
            as_params(json!({"ignoreUnavailable": false})),
        ]);
        let params = to_snake_case(merged);
        assert_eq!(params["ignore_unavailable"], json!(false));
        assert_eq!(params["timeout"], json!("500ms"));
    }

    #[test]
    fn snake_collision_keeps_later_value() {
        let params = to_snake_case(as_params(json!({
            "trackTotalHits": true,
            "track_total_hits": 100
        })));
        assert_eq!(params.len(), 1);
        assert_eq!(params["track_total_hits"], json!(100));
    }

    #[test]
    fn total_loaded_counts_failures() {
        let shards: ShardStats =
            serde_json::from_value(json!({"total": 5, "successful": 3, "failed": 1, "skipped": 1}))
                .unwrap();
        assert_eq!(get_total_loaded(&shards), TotalLoaded { total: 5, loaded: 4 });
    }

    #[test]
    fn total_loaded_saturates_on_huge_counts() {
        let shards = ShardStats {
            total: u64::MAX,
            successful: u64::MAX,
            failed: 2,
            skipped: 0,
        };
        assert_eq!(get_total_loaded(&shards).loaded, u64::MAX);
    }
}
