//! Error types for index patterns

use dash_saved_objects::SavedObjectsError;

/// Index pattern errors
#[derive(Debug, thiserror::Error)]
pub enum IndexPatternError {
    /// A field with this name already exists
    #[error("field [{name}] already exists in the index pattern")]
    DuplicateField { name: String },

    /// Format id not known to the field format registry
    #[error("unknown field format [{id}]")]
    UnknownFormat { id: String },

    /// Operation needs a persisted pattern but the pattern has no id
    #[error("index pattern has no id")]
    MissingId,

    /// Saved object attribute could not be decoded
    #[error("invalid saved object attribute [{attribute}]: {source}")]
    InvalidAttribute {
        attribute: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// JSON encoding failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persistence failure
    #[error("saved objects error: {0}")]
    SavedObjects(#[from] SavedObjectsError),
}

impl IndexPatternError {
    /// Create duplicate field error
    #[inline]
    pub fn duplicate_field(name: impl Into<String>) -> Self {
        Self::DuplicateField { name: name.into() }
    }

    /// Check if error is a duplicate field
    #[inline]
    #[must_use]
    pub fn is_duplicate_field(&self) -> bool {
        matches!(self, Self::DuplicateField { .. })
    }
}
