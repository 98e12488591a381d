//! Persisted and transferable index pattern form

use crate::fields::FieldSpec;
use crate::formats::SerializedFieldFormat;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reference to the external data source a pattern queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceRef {
    pub id: String,
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DataSourceRef {
    /// Create data source reference
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, object_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object_type: object_type.into(),
            name: None,
        }
    }
}

/// Source field exclusion entry (wildcards allowed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFilter {
    pub value: String,
}

/// Extra metadata for non-default pattern types (e.g. rollups)
pub type TypeMeta = Map<String, Value>;

/// Serializable index pattern
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexPatternSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub pattern_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_field_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_name: Option<String>,
    #[serde(default)]
    pub fields: IndexMap<String, FieldSpec>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub field_format_map: IndexMap<String, SerializedFieldFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_filters: Option<Vec<SourceFilter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_meta: Option<TypeMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source_ref: Option<DataSourceRef>,
}

impl IndexPatternSpec {
    /// Create spec with a title and no fields
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_time_field(mut self, name: impl Into<String>) -> Self {
        self.time_field_name = Some(name.into());
        self
    }

    /// With fields, keyed by their own names
    #[must_use]
    pub fn with_fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = FieldSpec>,
    {
        self.fields = fields.into_iter().map(|f| (f.name.clone(), f)).collect();
        self
    }

    #[must_use]
    pub fn with_data_source(mut self, data_source_ref: DataSourceRef) -> Self {
        self.data_source_ref = Some(data_source_ref);
        self
    }

    #[must_use]
    pub fn with_field_format(
        mut self,
        field: impl Into<String>,
        format: SerializedFieldFormat,
    ) -> Self {
        self.field_format_map.insert(field.into(), format);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn spec_uses_camel_case_keys() {
        let spec = IndexPatternSpec::new("logstash-*")
            .with_id("test-pattern")
            .with_time_field("@timestamp")
            .with_data_source(DataSourceRef::new("ds-1", "data-source"));

        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["timeFieldName"], json!("@timestamp"));
        assert_eq!(value["dataSourceRef"], json!({"id": "ds-1", "type": "data-source"}));
        assert!(value.get("fieldFormatMap").is_none());
    }

    #[test]
    fn spec_parses_minimal_document() {
        let spec: IndexPatternSpec = serde_json::from_value(json!({
            "id": "test-nested-array",
            "type": "index-pattern",
            "fields": {
                "a": {"name": "a", "type": "string"}
            }
        }))
        .unwrap();

        assert_eq!(spec.pattern_type.as_deref(), Some("index-pattern"));
        assert!(spec.title.is_empty());
        assert_eq!(spec.fields.len(), 1);
        assert!(!spec.fields["a"].searchable);
    }
}
