//! Field display formats
//!
//! A pattern stores one [`SerializedFieldFormat`] per formatted field and
//! resolves it to a live [`FieldFormat`] through an injected
//! [`FieldFormatsRegistry`].

mod builtin;

pub use builtin::{
    BooleanFormat, BytesFormat, DateFormat, DefaultFieldFormats, NumberFormat, StringFormat,
};

use crate::error::IndexPatternError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;
use std::sync::Arc;

/// Format parameters
pub type FormatParams = Map<String, Value>;

/// Persisted format assignment: format id plus parameters
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SerializedFieldFormat {
    pub id: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: FormatParams,
}

impl SerializedFieldFormat {
    /// Create format entry without parameters
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            params: Map::new(),
        }
    }

    /// With a single parameter
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Display-formatting strategy for field values
pub trait FieldFormat: Debug + Send + Sync {
    /// Registry id of this format
    fn id(&self) -> &str;

    /// Parameters the format was built with
    fn params(&self) -> &FormatParams;

    /// Render a raw value as display text
    fn convert(&self, value: &Value) -> String;

    /// Serialized form, inverse of [`FieldFormatsRegistry::get_instance`]
    fn to_json(&self) -> SerializedFieldFormat {
        SerializedFieldFormat {
            id: self.id().to_string(),
            params: self.params().clone(),
        }
    }
}

/// Capability resolving format ids to instances
pub trait FieldFormatsRegistry: Debug + Send + Sync {
    /// Instantiate a format by id
    ///
    /// # Errors
    /// `UnknownFormat` if the id is not registered
    fn get_instance(
        &self,
        id: &str,
        params: &FormatParams,
    ) -> Result<Arc<dyn FieldFormat>, IndexPatternError>;

    /// Default format for a field type
    fn get_default_instance(&self, field_type: &str, es_types: &[String]) -> Arc<dyn FieldFormat>;
}
