//! Error types for the search strategy

/// Search strategy error
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Request targets a non-default index pattern type
    #[error("unsupported index pattern type {0}")]
    UnsupportedIndexType(String),

    /// Data sources are enabled, no hosts are configured and the request
    /// names no data source
    #[error("data source id is required when no opensearch hosts config provided")]
    MissingDataSourceId,

    /// The search client rejected the request
    #[error("search client error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Client {
        /// HTTP status, when the backend answered
        status: Option<u16>,
        message: String,
    },

    /// Error raised while talking to a data source
    #[error("data source error: {message}")]
    DataSource {
        message: String,
        /// The error the data source layer wrapped
        #[source]
        source: Option<Box<SearchError>>,
    },

    /// Cancelled through the abort handle
    #[error("search aborted")]
    Aborted,

    /// Malformed response
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SearchError {
    /// Create client error
    #[inline]
    #[must_use]
    pub fn client(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Client {
            status,
            message: message.into(),
        }
    }

    /// Wrap an error as a data source error, keeping it as the source
    #[must_use]
    pub fn data_source(error: SearchError) -> Self {
        Self::DataSource {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    /// Whether the request was rejected before reaching a client
    #[inline]
    #[must_use]
    pub fn is_rejected_early(&self) -> bool {
        matches!(self, Self::UnsupportedIndexType(_))
    }

    #[inline]
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// HTTP status carried by the error, looking through data source wrapping
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. } => *status,
            Self::DataSource {
                source: Some(inner),
                ..
            } => inner.status(),
            _ => None,
        }
    }
}
