//! Index pattern
//!
//! Provides [`IndexPattern`]: a title, optional time field, ordered field
//! collection, per-field format assignments and an optional external data
//! source reference.
//!
//! # Lifecycle
//!
//! 1. Construct from an [`IndexPatternSpec`] (fresh or restored)
//! 2. Query fields, computed fields, formatters; flatten hits
//! 3. Mutate scripted fields in memory
//! 4. Serialize back with [`IndexPattern::to_spec`]
//!
//! Mutation goes through `&mut self`; callers sharing a pattern across tasks
//! must serialize access themselves.

use crate::error::IndexPatternError;
use crate::fields::{FieldCollection, FieldSpec, IndexPatternField};
use crate::flatten::{flatten_hit, FlattenedHit};
use crate::formats::{FieldFormat, FieldFormatsRegistry, SerializedFieldFormat};
use crate::spec::{DataSourceRef, IndexPatternSpec, SourceFilter, TypeMeta};
use crate::{DATA_SOURCE_REFERENCE_NAME, DEFAULT_FIELD_TYPE};
use dash_saved_objects::SavedObjectReference;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Format requested for date doc-value fields
pub const DOCVALUE_DATE_FORMAT: &str = "date_time";

/// Meta fields copied from a hit by default
pub const DEFAULT_META_FIELDS: &[&str] = &["_source", "_id", "_type", "_index", "_score"];

/// Construction options shared by every pattern a service creates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexPatternsConfig {
    /// Abbreviate dotted names in display names
    pub short_dots_enable: bool,
    /// Hit-level fields copied when flattening
    pub meta_fields: Vec<String>,
}

impl IndexPatternsConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_short_dots(mut self, enable: bool) -> Self {
        self.short_dots_enable = enable;
        self
    }

    #[must_use]
    pub fn with_meta_fields<I, S>(mut self, meta_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meta_fields = meta_fields.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for IndexPatternsConfig {
    fn default() -> Self {
        Self {
            short_dots_enable: false,
            meta_fields: DEFAULT_META_FIELDS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Script attached to a scripted field in a search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub source: String,
    pub lang: String,
}

/// `script_fields` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptField {
    pub script: Script,
}

/// `docvalue_fields` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocValueField {
    pub field: String,
    pub format: String,
}

/// Fields a search request should ask for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedFields {
    pub stored_fields: Vec<String>,
    pub script_fields: IndexMap<String, ScriptField>,
    pub docvalue_fields: Vec<DocValueField>,
}

/// Source filtering block for a search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFiltering {
    pub excludes: Vec<String>,
}

/// A field taken out of a pattern, with the positions it held
#[derive(Debug, Clone)]
pub struct RemovedField {
    index: usize,
    field: IndexPatternField,
    formatter: Option<(usize, Arc<dyn FieldFormat>)>,
}

impl RemovedField {
    #[inline]
    #[must_use]
    pub fn field(&self) -> &IndexPatternField {
        &self.field
    }
}

/// Schema-describing view over a backend's fields
#[derive(Debug, Clone)]
pub struct IndexPattern {
    id: Option<String>,
    title: String,
    version: Option<String>,
    pattern_type: Option<String>,
    time_field_name: Option<String>,
    interval_name: Option<String>,
    fields: FieldCollection,
    formatters: IndexMap<String, Arc<dyn FieldFormat>>,
    source_filters: Option<Vec<SourceFilter>>,
    type_meta: Option<TypeMeta>,
    data_source_ref: Option<DataSourceRef>,
    meta_fields: Vec<String>,
    field_formats: Arc<dyn FieldFormatsRegistry>,
}

impl IndexPattern {
    /// Build a pattern from its spec
    ///
    /// # Errors
    /// - `DuplicateField` if two fields share a name
    /// - `UnknownFormat` if a format assignment names an unregistered format
    pub fn from_spec(
        spec: IndexPatternSpec,
        field_formats: Arc<dyn FieldFormatsRegistry>,
        config: &IndexPatternsConfig,
    ) -> Result<Self, IndexPatternError> {
        let IndexPatternSpec {
            id,
            pattern_type,
            version,
            title,
            time_field_name,
            interval_name,
            fields,
            field_format_map,
            source_filters,
            type_meta,
            data_source_ref,
        } = spec;

        let mut formatters = IndexMap::with_capacity(field_format_map.len());
        for (field, format) in &field_format_map {
            let instance = field_formats.get_instance(&format.id, &format.params)?;
            formatters.insert(field.clone(), instance);
        }

        // Inline formats only arrive on freshly fetched mappings.
        for field in fields.values() {
            if let Some(format) = &field.format {
                if !formatters.contains_key(&field.name) {
                    let instance = field_formats.get_instance(&format.id, &format.params)?;
                    formatters.insert(field.name.clone(), instance);
                }
            }
        }

        let fields = FieldCollection::from_specs(
            fields.into_values().map(|mut f| {
                f.format = None;
                f
            }),
            config.short_dots_enable,
        )?;

        debug!(
            id = id.as_deref().unwrap_or("<unsaved>"),
            title = %title,
            fields = fields.len(),
            formats = formatters.len(),
            "index pattern built"
        );

        Ok(Self {
            id,
            title,
            version,
            pattern_type,
            time_field_name,
            interval_name,
            fields,
            formatters,
            source_filters,
            type_meta,
            data_source_ref,
            meta_fields: config.meta_fields.clone(),
            field_formats,
        })
    }

    /// Serialize back to a spec
    #[must_use]
    pub fn to_spec(&self) -> IndexPatternSpec {
        IndexPatternSpec {
            id: self.id.clone(),
            pattern_type: self.pattern_type.clone(),
            version: self.version.clone(),
            title: self.title.clone(),
            time_field_name: self.time_field_name.clone(),
            interval_name: self.interval_name.clone(),
            fields: self.fields.to_spec(),
            field_format_map: self.field_format_map(),
            source_filters: self.source_filters.clone(),
            type_meta: self.type_meta.clone(),
            data_source_ref: self.data_source_ref.clone(),
        }
    }

    // ---- identity ----

    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[inline]
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[inline]
    pub fn set_version(&mut self, version: Option<String>) {
        self.version = version;
    }

    #[inline]
    #[must_use]
    pub fn pattern_type(&self) -> Option<&str> {
        self.pattern_type.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn time_field_name(&self) -> Option<&str> {
        self.time_field_name.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn interval_name(&self) -> Option<&str> {
        self.interval_name.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn source_filters(&self) -> Option<&[SourceFilter]> {
        self.source_filters.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn type_meta(&self) -> Option<&TypeMeta> {
        self.type_meta.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn data_source_ref(&self) -> Option<&DataSourceRef> {
        self.data_source_ref.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn meta_fields(&self) -> &[String] {
        &self.meta_fields
    }

    // ---- fields ----

    #[inline]
    #[must_use]
    pub fn fields(&self) -> &FieldCollection {
        &self.fields
    }

    #[inline]
    #[must_use]
    pub fn get_field_by_name(&self, name: &str) -> Option<&IndexPatternField> {
        self.fields.get_by_name(name)
    }

    /// Scripted fields in collection order
    #[must_use]
    pub fn get_scripted_fields(&self) -> Vec<&IndexPatternField> {
        self.fields.iter().filter(|f| f.scripted()).collect()
    }

    /// Non-scripted fields in collection order
    #[must_use]
    pub fn get_non_scripted_fields(&self) -> Vec<&IndexPatternField> {
        self.fields.iter().filter(|f| !f.scripted()).collect()
    }

    /// Add a scripted field; an empty type defaults to `string`
    ///
    /// # Errors
    /// `DuplicateField` if any field already has this name; the field set is
    /// left unchanged
    pub fn add_scripted_field(
        &mut self,
        name: &str,
        script: &str,
        field_type: &str,
    ) -> Result<(), IndexPatternError> {
        let field_type = if field_type.is_empty() {
            DEFAULT_FIELD_TYPE
        } else {
            field_type
        };
        self.fields
            .add(FieldSpec::scripted(name, script, field_type))?;
        debug!(field = name, "scripted field added");
        Ok(())
    }

    /// Remove a scripted field by name
    ///
    /// Returns `false` without touching anything when no scripted field has
    /// this name.
    pub fn remove_scripted_field(&mut self, name: &str) -> bool {
        self.take_scripted_field(name).is_some()
    }

    /// Remove a scripted field, keeping what [`IndexPattern::restore_field`]
    /// needs to undo it
    pub fn take_scripted_field(&mut self, name: &str) -> Option<RemovedField> {
        let is_scripted = self.fields.get_by_name(name).is_some_and(IndexPatternField::scripted);
        if !is_scripted {
            return None;
        }
        let (index, field) = self.fields.remove_full(name)?;
        let formatter = self
            .formatters
            .shift_remove_full(name)
            .map(|(position, _, format)| (position, format));
        debug!(field = name, "scripted field removed");
        Some(RemovedField {
            index,
            field,
            formatter,
        })
    }

    /// Put a removed field and its formatter back where they were
    pub fn restore_field(&mut self, removed: RemovedField) {
        let RemovedField {
            index,
            field,
            formatter,
        } = removed;
        let name = field.name().to_string();
        if let Some((position, format)) = formatter {
            let position = position.min(self.formatters.len());
            self.formatters.shift_insert(position, name.clone(), format);
        }
        self.fields.insert_at(index, field);
        debug!(field = %name, "field restored");
    }

    /// Fields to request alongside `_source`
    #[must_use]
    pub fn get_computed_fields(&self) -> ComputedFields {
        let docvalue_fields = self
            .fields
            .get_by_type("date")
            .filter(|f| !f.scripted() && f.read_from_doc_values())
            .map(|f| DocValueField {
                field: f.name().to_string(),
                format: DOCVALUE_DATE_FORMAT.to_string(),
            })
            .collect();

        let script_fields = self
            .fields
            .iter()
            .filter(|f| f.scripted())
            .map(|f| {
                let script = Script {
                    source: f.script().unwrap_or_default().to_string(),
                    lang: f.lang().unwrap_or(crate::DEFAULT_SCRIPT_LANG).to_string(),
                };
                (f.name().to_string(), ScriptField { script })
            })
            .collect();

        ComputedFields {
            stored_fields: vec!["*".to_string()],
            script_fields,
            docvalue_fields,
        }
    }

    /// Time field, if the pattern is time based and the field exists
    #[must_use]
    pub fn get_time_field(&self) -> Option<&IndexPatternField> {
        self.time_field_name
            .as_deref()
            .and_then(|name| self.fields.get_by_name(name))
    }

    #[inline]
    #[must_use]
    pub fn is_time_based(&self) -> bool {
        self.time_field_name.is_some()
    }

    /// Source excludes built from the source filters
    #[must_use]
    pub fn get_source_filtering(&self) -> SourceFiltering {
        SourceFiltering {
            excludes: self
                .source_filters
                .iter()
                .flatten()
                .map(|f| f.value.clone())
                .collect(),
        }
    }

    // ---- formats ----

    /// Formatter for a field: its assignment, or the type default
    #[must_use]
    pub fn get_formatter_for_field(&self, field: &IndexPatternField) -> Arc<dyn FieldFormat> {
        self.formatters.get(field.name()).cloned().unwrap_or_else(|| {
            self.field_formats
                .get_default_instance(field.field_type(), field.es_types())
        })
    }

    /// Assign a format to a field
    ///
    /// # Errors
    /// `UnknownFormat` if the registry does not know the id
    pub fn set_field_format(
        &mut self,
        field: &str,
        format: &SerializedFieldFormat,
    ) -> Result<(), IndexPatternError> {
        let instance = self.field_formats.get_instance(&format.id, &format.params)?;
        self.formatters.insert(field.to_string(), instance);
        Ok(())
    }

    /// Drop a format assignment, returning whether one existed
    pub fn delete_field_format(&mut self, field: &str) -> bool {
        self.formatters.shift_remove(field).is_some()
    }

    /// Serialized format assignments
    #[must_use]
    pub fn field_format_map(&self) -> IndexMap<String, SerializedFieldFormat> {
        self.formatters
            .iter()
            .map(|(field, format)| (field.clone(), format.to_json()))
            .collect()
    }

    /// Render a value of a field for display
    #[must_use]
    pub fn format_value(&self, field: &IndexPatternField, value: &Value) -> String {
        self.get_formatter_for_field(field).convert(value)
    }

    // ---- hits & references ----

    /// Flatten a hit's `_source` into dotted keys without touching the hit
    #[must_use]
    pub fn flatten_hit(&self, hit: &Value) -> FlattenedHit {
        flatten_hit(&self.fields, &self.meta_fields, hit, false)
    }

    /// Flatten a hit, also walking arrays of non-nested objects
    #[must_use]
    pub fn flatten_hit_deep(&self, hit: &Value) -> FlattenedHit {
        flatten_hit(&self.fields, &self.meta_fields, hit, true)
    }

    /// References to store with the saved object
    #[must_use]
    pub fn get_save_object_reference(&self) -> Vec<SavedObjectReference> {
        self.data_source_ref
            .iter()
            .map(|ds| SavedObjectReference::new(DATA_SOURCE_REFERENCE_NAME, &ds.id, &ds.object_type))
            .collect()
    }
}
