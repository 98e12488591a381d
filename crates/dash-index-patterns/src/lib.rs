//! Dash Index Patterns
//!
//! Schema-describing views over a search backend's fields:
//! - Ordered, name-unique field collection with scripted and mapped fields
//! - Field display formats resolved through an injected registry
//! - Spec and saved-object round-trips
//! - Hit flattening (shallow and deep)
//!
//! # Example
//!
//! ```rust,ignore
//! use dash_index_patterns::prelude::*;
//! use std::sync::Arc;
//!
//! let spec = IndexPatternSpec::new("logstash-*")
//!     .with_id("logstash")
//!     .with_time_field("@timestamp")
//!     .with_fields(vec![FieldSpec::new("@timestamp", "date").with_doc_values(true)]);
//!
//! let mut pattern = IndexPattern::from_spec(
//!     spec,
//!     Arc::new(DefaultFieldFormats::new()),
//!     &IndexPatternsConfig::default(),
//! )?;
//! pattern.add_scripted_field("hour", "doc['@timestamp'].value.hour", "number")?;
//! assert_eq!(pattern.get_scripted_fields().len(), 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod fields;
pub mod flatten;
pub mod formats;
pub mod index_pattern;
pub mod saved_object;
pub mod service;
pub mod spec;

pub use error::IndexPatternError;
pub use fields::{
    shorten_dotted_string, FieldCollection, FieldSpec, FieldSubType, IndexPatternField,
    MultiSubType, NestedSubType,
};
pub use flatten::{flatten_hit, FlattenedHit};
pub use formats::{
    BooleanFormat, BytesFormat, DateFormat, DefaultFieldFormats, FieldFormat,
    FieldFormatsRegistry, FormatParams, NumberFormat, SerializedFieldFormat, StringFormat,
};
pub use index_pattern::{
    ComputedFields, DocValueField, IndexPattern, IndexPatternsConfig, RemovedField, Script,
    ScriptField, SourceFiltering, DEFAULT_META_FIELDS, DOCVALUE_DATE_FORMAT,
};
pub use saved_object::saved_object_to_spec;
pub use service::IndexPatternsService;
pub use spec::{DataSourceRef, IndexPatternSpec, SourceFilter, TypeMeta};

/// Script language assigned to new scripted fields
pub const DEFAULT_SCRIPT_LANG: &str = "painless";

/// Field type used when a scripted field is added without one
pub const DEFAULT_FIELD_TYPE: &str = "string";

/// Reference name linking a pattern to its data source
pub const DATA_SOURCE_REFERENCE_NAME: &str = "dataSource";

/// Saved object type of index patterns
pub const INDEX_PATTERN_SAVED_OBJECT_TYPE: &str = "index-pattern";

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with index patterns
    pub use crate::{
        DataSourceRef, DefaultFieldFormats, FieldCollection, FieldFormatsRegistry, FieldSpec,
        IndexPattern, IndexPatternError, IndexPatternField, IndexPatternSpec,
        IndexPatternsConfig, IndexPatternsService, SerializedFieldFormat,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
