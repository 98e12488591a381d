//! Search client capability and client selection

use crate::error::SearchError;
use crate::params::SearchParams;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// A client able to run a search against one cluster
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run a search and return the response body
    async fn search(&self, params: SearchParams) -> Result<Value, SearchError>;
}

/// Hands out the clients a request may be routed to
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientProvider: Send + Sync {
    /// Client of the default cluster acting as the current user
    fn default_client(&self, with_long_numerals_support: bool) -> Arc<dyn SearchClient>;

    /// Client bound to a registered data source
    async fn data_source_client(
        &self,
        data_source_id: &str,
    ) -> Result<Arc<dyn SearchClient>, SearchError>;
}

/// Pick the data source client when the request names a data source and
/// data sources are available, else the default client
///
/// # Errors
/// Whatever the provider returns for an unknown or unreachable data source
pub async fn decide_client(
    provider: &dyn ClientProvider,
    data_source_id: Option<&str>,
    data_sources_available: bool,
    with_long_numerals_support: bool,
) -> Result<Arc<dyn SearchClient>, SearchError> {
    match data_source_id.filter(|id| !id.is_empty()) {
        Some(id) if data_sources_available => provider.data_source_client(id).await,
        _ => Ok(provider.default_client(with_long_numerals_support)),
    }
}
