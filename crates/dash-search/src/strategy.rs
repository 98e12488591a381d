//! Default OpenSearch search strategy
//!
//! Forwards a request to the cluster chosen for it and reshapes the
//! response. The search either completes or fails; there is no progress
//! reporting, retry or backpressure.

use crate::client::{decide_client, ClientProvider};
use crate::config::SearchStrategyConfig;
use crate::data_source::DataSourceService;
use crate::error::SearchError;
use crate::params::{build_search_params, get_total_loaded, SearchParams, ShardStats};
use crate::usage::SearchUsage;
use futures::future::{AbortRegistration, Abortable};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Incoming search request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Index pattern type; only the default (absent) type is handled here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_type: Option<String>,
    #[serde(default)]
    pub params: SearchParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source_id: Option<String>,
}

impl SearchRequest {
    #[must_use]
    pub fn new(params: SearchParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_data_source(mut self, id: impl Into<String>) -> Self {
        self.data_source_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_index_type(mut self, index_type: impl Into<String>) -> Self {
        self.index_type = Some(index_type.into());
        self
    }
}

/// Per-call options
#[derive(Debug, Default)]
pub struct SearchOptions {
    /// Cancels the in-flight client call when its handle is aborted
    pub abort: Option<AbortRegistration>,
}

impl SearchOptions {
    #[must_use]
    pub fn with_abort(registration: AbortRegistration) -> Self {
        Self {
            abort: Some(registration),
        }
    }
}

/// Completed search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub is_partial: bool,
    pub is_running: bool,
    pub raw_response: Value,
    /// Shards targeted
    pub total: u64,
    /// Shards that answered, successfully or not
    pub loaded: u64,
    pub with_long_numerals_support: bool,
}

/// Search strategy for the default index pattern type
pub struct OpenSearchSearchStrategy {
    config: SearchStrategyConfig,
    clients: Arc<dyn ClientProvider>,
    usage: Option<Arc<dyn SearchUsage>>,
    data_source: Option<Arc<dyn DataSourceService>>,
}

impl std::fmt::Debug for OpenSearchSearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenSearchSearchStrategy")
            .field("config", &self.config)
            .field("usage", &self.usage.is_some())
            .field("data_source", &self.data_source.is_some())
            .finish_non_exhaustive()
    }
}

impl OpenSearchSearchStrategy {
    /// Create strategy without telemetry or data sources
    #[must_use]
    pub fn new(config: SearchStrategyConfig, clients: Arc<dyn ClientProvider>) -> Self {
        Self {
            config,
            clients,
            usage: None,
            data_source: None,
        }
    }

    /// With usage telemetry
    #[must_use]
    pub fn with_usage(mut self, usage: Arc<dyn SearchUsage>) -> Self {
        self.usage = Some(usage);
        self
    }

    /// With the data source feature
    #[must_use]
    pub fn with_data_source(mut self, data_source: Arc<dyn DataSourceService>) -> Self {
        self.data_source = Some(data_source);
        self
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &SearchStrategyConfig {
        &self.config
    }

    fn data_sources_enabled(&self) -> bool {
        self.data_source
            .as_ref()
            .is_some_and(|ds| ds.data_source_enabled())
    }

    /// Run a search
    ///
    /// # Errors
    /// - `UnsupportedIndexType` for any non-default index type, before
    ///   anything is counted
    /// - `MissingDataSourceId`, client and abort errors, counted as failures
    ///   and wrapped by the data source service when data sources are enabled
    pub async fn search(
        &self,
        request: SearchRequest,
        options: SearchOptions,
    ) -> Result<SearchResponse, SearchError> {
        let SearchRequest {
            index_type,
            params,
            data_source_id,
        } = request;

        if let Some(index_type) = index_type.filter(|t| !t.is_empty()) {
            return Err(SearchError::UnsupportedIndexType(index_type));
        }

        let params = build_search_params(&self.config, params);
        debug!(
            data_source_id = data_source_id.as_deref(),
            params = params.len(),
            "forwarding search"
        );

        match self
            .execute(data_source_id.as_deref(), params, options.abort)
            .await
        {
            Ok((raw_response, shards)) => {
                let took = raw_response.get("took").and_then(Value::as_u64).unwrap_or(0);
                if let Some(usage) = &self.usage {
                    usage.track_success(took);
                }

                let totals = get_total_loaded(&shards);
                debug!(took, total = totals.total, loaded = totals.loaded, "search completed");
                Ok(SearchResponse {
                    is_partial: false,
                    is_running: false,
                    raw_response,
                    total: totals.total,
                    loaded: totals.loaded,
                    with_long_numerals_support: self.config.with_long_numerals_support,
                })
            }
            Err(error) => {
                if let Some(usage) = &self.usage {
                    usage.track_error();
                }
                warn!(
                    data_source_id = data_source_id.as_deref(),
                    error = %error,
                    "search failed"
                );

                match &self.data_source {
                    Some(ds) if ds.data_source_enabled() => Err(ds.create_data_source_error(error)),
                    _ => Err(error),
                }
            }
        }
    }

    async fn execute(
        &self,
        data_source_id: Option<&str>,
        params: SearchParams,
        abort: Option<AbortRegistration>,
    ) -> Result<(Value, ShardStats), SearchError> {
        let enabled = self.data_sources_enabled();
        if enabled && self.config.hosts_empty() && data_source_id.map_or(true, str::is_empty) {
            return Err(SearchError::MissingDataSourceId);
        }

        let client = decide_client(
            self.clients.as_ref(),
            data_source_id,
            enabled,
            self.config.with_long_numerals_support,
        )
        .await?;

        let search = client.search(params);
        let raw_response = match abort {
            Some(registration) => Abortable::new(search, registration)
                .await
                .map_err(|_| SearchError::Aborted)??,
            None => search.await?,
        };

        let shards = match raw_response.get("_shards") {
            Some(shards) => serde_json::from_value(shards.clone())?,
            None => ShardStats::default(),
        };
        Ok((raw_response, shards))
    }
}
