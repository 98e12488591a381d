//! Saved object attribute mapping
//!
//! Index patterns are stored with their field list, format map, source
//! filters and type meta as JSON-encoded strings inside the attribute bag;
//! the data source lives in the reference list.

use crate::error::IndexPatternError;
use crate::fields::FieldSpec;
use crate::formats::{FieldFormatsRegistry, SerializedFieldFormat};
use crate::index_pattern::{IndexPattern, IndexPatternsConfig};
use crate::spec::{DataSourceRef, IndexPatternSpec, SourceFilter, TypeMeta};
use crate::DATA_SOURCE_REFERENCE_NAME;
use dash_saved_objects::{SavedObject, SavedObjectAttributes};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

fn encoded<T: DeserializeOwned>(
    attributes: &SavedObjectAttributes,
    attribute: &'static str,
) -> Result<Option<T>, IndexPatternError> {
    match attributes.get(attribute) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => serde_json::from_str(s)
            .map(Some)
            .map_err(|source| IndexPatternError::InvalidAttribute { attribute, source }),
        // Older objects may carry the decoded form directly.
        Some(other) => serde_json::from_value(other.clone())
            .map(Some)
            .map_err(|source| IndexPatternError::InvalidAttribute { attribute, source }),
    }
}

fn string_attr(attributes: &SavedObjectAttributes, key: &str) -> Option<String> {
    attributes
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl IndexPattern {
    /// Restore a pattern from its stored saved object
    ///
    /// # Errors
    /// `InvalidAttribute` for malformed attributes, plus everything
    /// [`IndexPattern::from_spec`] can return
    pub fn from_saved_object(
        object: &SavedObject,
        field_formats: Arc<dyn FieldFormatsRegistry>,
        config: &IndexPatternsConfig,
    ) -> Result<Self, IndexPatternError> {
        Self::from_spec(saved_object_to_spec(object)?, field_formats, config)
    }

    /// Attribute bag for persisting this pattern
    ///
    /// # Errors
    /// `Serialization` if a nested value cannot be encoded
    pub fn get_as_saved_object_body(&self) -> Result<SavedObjectAttributes, IndexPatternError> {
        let spec = self.to_spec();
        let mut attributes = SavedObjectAttributes::new();

        attributes.insert("title".to_string(), Value::String(spec.title));
        if let Some(time_field) = spec.time_field_name {
            attributes.insert("timeFieldName".to_string(), Value::String(time_field));
        }
        if let Some(interval) = spec.interval_name {
            attributes.insert("intervalName".to_string(), Value::String(interval));
        }
        if let Some(pattern_type) = spec.pattern_type {
            attributes.insert("type".to_string(), Value::String(pattern_type));
        }

        let fields: Vec<&FieldSpec> = spec.fields.values().collect();
        attributes.insert(
            "fields".to_string(),
            Value::String(serde_json::to_string(&fields)?),
        );
        if !spec.field_format_map.is_empty() {
            attributes.insert(
                "fieldFormatMap".to_string(),
                Value::String(serde_json::to_string(&spec.field_format_map)?),
            );
        }
        if let Some(filters) = &spec.source_filters {
            attributes.insert(
                "sourceFilters".to_string(),
                Value::String(serde_json::to_string(filters)?),
            );
        }
        if let Some(type_meta) = &spec.type_meta {
            attributes.insert(
                "typeMeta".to_string(),
                Value::String(serde_json::to_string(type_meta)?),
            );
        }

        Ok(attributes)
    }
}

/// Rebuild a spec from a stored saved object
///
/// # Errors
/// `InvalidAttribute` if an encoded attribute is malformed
pub fn saved_object_to_spec(object: &SavedObject) -> Result<IndexPatternSpec, IndexPatternError> {
    let attributes = &object.attributes;

    let fields: Vec<FieldSpec> = encoded(attributes, "fields")?.unwrap_or_default();
    let field_format_map: IndexMap<String, SerializedFieldFormat> =
        encoded(attributes, "fieldFormatMap")?.unwrap_or_default();
    let source_filters: Option<Vec<SourceFilter>> = encoded(attributes, "sourceFilters")?;
    let type_meta: Option<TypeMeta> = encoded(attributes, "typeMeta")?;

    // The reference name is the fixed link key, not the data source's
    // display name, so `DataSourceRef::name` stays unset.
    let data_source_ref = object
        .reference(DATA_SOURCE_REFERENCE_NAME)
        .map(|r| DataSourceRef::new(&r.id, &r.object_type));

    Ok(IndexPatternSpec {
        id: Some(object.id.clone()),
        pattern_type: string_attr(attributes, "type"),
        version: object.version.clone(),
        title: string_attr(attributes, "title").unwrap_or_default(),
        time_field_name: string_attr(attributes, "timeFieldName"),
        interval_name: string_attr(attributes, "intervalName"),
        fields: fields.into_iter().map(|f| (f.name.clone(), f)).collect(),
        field_format_map,
        source_filters,
        type_meta,
        data_source_ref,
    })
}
