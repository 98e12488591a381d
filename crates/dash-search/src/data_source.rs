//! Data source capability
//!
//! Present when the multiple-data-source feature is installed. Decides
//! whether requests may be routed to data sources and how errors raised
//! while doing so are presented.

use crate::error::SearchError;

/// Data source feature as seen by the search strategy
#[cfg_attr(test, mockall::automock)]
pub trait DataSourceService: Send + Sync {
    /// Whether the feature is switched on
    fn data_source_enabled(&self) -> bool;

    /// Wrap an error raised during a data source enabled search
    fn create_data_source_error(&self, error: SearchError) -> SearchError;
}

/// Data source service with a fixed enabled flag
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticDataSourceService {
    enabled: bool,
}

impl StaticDataSourceService {
    #[inline]
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl DataSourceService for StaticDataSourceService {
    fn data_source_enabled(&self) -> bool {
        self.enabled
    }

    fn create_data_source_error(&self, error: SearchError) -> SearchError {
        match error {
            already @ SearchError::DataSource { .. } => already,
            other => SearchError::data_source(other),
        }
    }
}
