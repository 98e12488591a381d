//! Dash Search
//!
//! Search strategy adapter for the default index pattern type. A request's
//! parameters are merged with defaults from advanced settings and the shard
//! timeout, converted to snake case and forwarded to the client selected
//! for it (the default cluster or a data source).
//!
//! # Example
//!
//! ```rust,ignore
//! use dash_search::prelude::*;
//! use std::sync::Arc;
//!
//! let strategy = OpenSearchSearchStrategy::new(SearchStrategyConfig::default(), clients)
//!     .with_usage(Arc::new(MetricsSearchUsage));
//!
//! let response = strategy
//!     .search(SearchRequest::new(params), SearchOptions::default())
//!     .await?;
//! println!("{}/{} shards", response.loaded, response.total);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod client;
pub mod config;
pub mod data_source;
pub mod error;
pub mod params;
pub mod strategy;
pub mod usage;

pub use client::{decide_client, ClientProvider, SearchClient};
pub use config::{SearchStrategyConfig, UiSearchSettings, DEFAULT_HOST};
pub use data_source::{DataSourceService, StaticDataSourceService};
pub use error::SearchError;
pub use params::{
    build_search_params, get_total_loaded, merge_params, shard_timeout, to_snake_case,
    DefaultSearchParams, SearchParams, ShardStats, TotalLoaded,
};
pub use strategy::{OpenSearchSearchStrategy, SearchOptions, SearchRequest, SearchResponse};
pub use usage::{CountingSearchUsage, MetricsSearchUsage, SearchUsage};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running searches
    pub use crate::{
        ClientProvider, MetricsSearchUsage, OpenSearchSearchStrategy, SearchClient, SearchError,
        SearchOptions, SearchRequest, SearchResponse, SearchStrategyConfig,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
