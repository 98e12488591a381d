//! Error types for saved object operations

/// Saved object client errors
#[derive(Debug, thiserror::Error)]
pub enum SavedObjectsError {
    /// No object with this type and id
    #[error("saved object [{object_type}/{id}] not found")]
    NotFound { object_type: String, id: String },

    /// Object already exists, or the caller's version is stale
    #[error("saved object [{object_type}/{id}] conflict")]
    Conflict { object_type: String, id: String },

    /// Transport failure talking to the server
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Attributes could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SavedObjectsError {
    /// Create not-found error
    #[inline]
    pub fn not_found(object_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            object_type: object_type.into(),
            id: id.into(),
        }
    }

    /// Create conflict error
    #[inline]
    pub fn conflict(object_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Conflict {
            object_type: object_type.into(),
            id: id.into(),
        }
    }

    /// Check if error is a missing object
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error is a version or id conflict
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
