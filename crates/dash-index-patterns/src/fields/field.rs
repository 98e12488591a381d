//! Field descriptors
//!
//! [`FieldSpec`] is the persisted form; [`IndexPatternField`] wraps it with
//! the derived properties the rest of the system reads (display name,
//! filterability, sortability).

use crate::formats::SerializedFieldFormat;
use serde::{Deserialize, Serialize};

/// Field types that can never be used in a filter
const NOT_FILTERABLE_TYPES: &[&str] = &["geo_shape", "geo_point", "object"];

/// Field types the backend can sort on
const SORTABLE_TYPES: &[&str] = &["string", "number", "date", "boolean", "ip"];

/// Path of the enclosing nested object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedSubType {
    pub path: String,
}

/// Parent of a multi-field (e.g. `name.keyword` → `name`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiSubType {
    pub parent: String,
}

/// Sub-type information for nested and multi fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldSubType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<NestedSubType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi: Option<MultiSubType>,
}

/// Persisted field descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Field name, unique within a pattern
    pub name: String,
    /// Semantic type (`string`, `number`, `date`, ...)
    #[serde(rename = "type")]
    pub field_type: String,
    /// Types reported by the search engine mapping
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub es_types: Vec<String>,
    /// Popularity counter
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub scripted: bool,
    /// Script body for scripted fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// Script language for scripted fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default)]
    pub searchable: bool,
    #[serde(default)]
    pub aggregatable: bool,
    #[serde(default)]
    pub read_from_doc_values: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<FieldSubType>,
    /// Inline format, only present on freshly fetched mappings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<SerializedFieldFormat>,
}

impl FieldSpec {
    /// Create a plain mapped field
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            es_types: Vec::new(),
            count: 0,
            scripted: false,
            script: None,
            lang: None,
            searchable: true,
            aggregatable: true,
            read_from_doc_values: false,
            sub_type: None,
            format: None,
        }
    }

    /// Create a scripted field
    #[must_use]
    pub fn scripted(
        name: impl Into<String>,
        script: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Self {
        Self {
            scripted: true,
            script: Some(script.into()),
            lang: Some(crate::DEFAULT_SCRIPT_LANG.to_string()),
            ..Self::new(name, field_type)
        }
    }

    /// With engine types
    #[must_use]
    pub fn with_es_types<I, S>(mut self, es_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.es_types = es_types.into_iter().map(Into::into).collect();
        self
    }

    /// With doc-values flag
    #[inline]
    #[must_use]
    pub fn with_doc_values(mut self, read_from_doc_values: bool) -> Self {
        self.read_from_doc_values = read_from_doc_values;
        self
    }

    /// With searchable and aggregatable flags
    #[inline]
    #[must_use]
    pub fn with_capabilities(mut self, searchable: bool, aggregatable: bool) -> Self {
        self.searchable = searchable;
        self.aggregatable = aggregatable;
        self
    }

    /// With nested path
    #[must_use]
    pub fn with_nested_path(mut self, path: impl Into<String>) -> Self {
        let sub_type = self.sub_type.get_or_insert_with(FieldSubType::default);
        sub_type.nested = Some(NestedSubType { path: path.into() });
        self
    }
}

/// Field as seen through an index pattern
#[derive(Debug, Clone, PartialEq)]
pub struct IndexPatternField {
    spec: FieldSpec,
    display_name: String,
}

impl IndexPatternField {
    /// Wrap a spec, computing the display name
    #[must_use]
    pub fn new(spec: FieldSpec, short_dots_enable: bool) -> Self {
        let display_name = if short_dots_enable {
            shorten_dotted_string(&spec.name)
        } else {
            spec.name.clone()
        };
        Self { spec, display_name }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    #[inline]
    #[must_use]
    pub fn field_type(&self) -> &str {
        &self.spec.field_type
    }

    #[inline]
    #[must_use]
    pub fn es_types(&self) -> &[String] {
        &self.spec.es_types
    }

    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[inline]
    #[must_use]
    pub fn scripted(&self) -> bool {
        self.spec.scripted
    }

    #[inline]
    #[must_use]
    pub fn script(&self) -> Option<&str> {
        self.spec.script.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn lang(&self) -> Option<&str> {
        self.spec.lang.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn searchable(&self) -> bool {
        self.spec.searchable
    }

    #[inline]
    #[must_use]
    pub fn aggregatable(&self) -> bool {
        self.spec.aggregatable
    }

    #[inline]
    #[must_use]
    pub fn read_from_doc_values(&self) -> bool {
        self.spec.read_from_doc_values
    }

    #[inline]
    #[must_use]
    pub fn count(&self) -> u32 {
        self.spec.count
    }

    /// Path of the enclosing nested object, if any
    #[must_use]
    pub fn nested_path(&self) -> Option<&str> {
        self.spec
            .sub_type
            .as_ref()
            .and_then(|s| s.nested.as_ref())
            .map(|n| n.path.as_str())
    }

    /// Whether the field can appear in a filter
    #[must_use]
    pub fn filterable(&self) -> bool {
        self.name() == "_id"
            || self.scripted()
            || (self.searchable() && !NOT_FILTERABLE_TYPES.contains(&self.field_type()))
    }

    /// Whether results can be sorted on this field
    #[must_use]
    pub fn sortable(&self) -> bool {
        self.name() == "_score"
            || ((self.searchable() || self.aggregatable())
                && SORTABLE_TYPES.contains(&self.field_type()))
    }

    /// Whether the field exists in the backend mapping
    #[inline]
    #[must_use]
    pub fn is_mapped(&self) -> bool {
        !self.scripted()
    }

    /// Bump the popularity counter
    #[inline]
    pub fn increment_count(&mut self) {
        self.spec.count = self.spec.count.saturating_add(1);
    }

    /// Borrow the persisted form
    #[inline]
    #[must_use]
    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    /// Clone out the persisted form
    #[inline]
    #[must_use]
    pub fn to_spec(&self) -> FieldSpec {
        self.spec.clone()
    }
}

/// Abbreviate every segment but the last: `machine.os.raw` → `m.o.raw`
#[must_use]
pub fn shorten_dotted_string(input: &str) -> String {
    let mut segments: Vec<&str> = input.split('.').collect();
    let Some(last) = segments.pop() else {
        return input.to_string();
    };

    let mut out = String::with_capacity(input.len());
    for segment in segments {
        if let Some(first) = segment.chars().next() {
            out.push(first);
        }
        out.push('.');
    }
    out.push_str(last);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn spec_deserializes_camel_case() {
        let spec: FieldSpec = serde_json::from_value(json!({
            "name": "nested_test1.d_values",
            "type": "number",
            "esTypes": ["double"],
            "count": 0,
            "scripted": false,
            "searchable": true,
            "aggregatable": true,
            "readFromDocValues": true,
            "subType": {"nested": {"path": "nested_test1"}}
        }))
        .unwrap();

        assert_eq!(spec.es_types, vec!["double"]);
        assert!(spec.read_from_doc_values);
        let field = IndexPatternField::new(spec, false);
        assert_eq!(field.nested_path(), Some("nested_test1"));
    }

    #[test]
    fn scripted_constructor_sets_defaults() {
        let spec = FieldSpec::scripted("calc", "doc['a'].value * 2", "number");
        assert!(spec.scripted);
        assert_eq!(spec.lang.as_deref(), Some("painless"));
        assert!(spec.searchable && spec.aggregatable);
        assert!(!spec.read_from_doc_values);
    }

    #[test]
    fn shorten_dotted() {
        assert_eq!(shorten_dotted_string("machine.os.raw"), "m.o.raw");
        assert_eq!(shorten_dotted_string("bytes"), "bytes");
        assert_eq!(shorten_dotted_string(""), "");
    }

    #[test]
    fn display_name_respects_short_dots() {
        let spec = FieldSpec::new("machine.os", "string");
        assert_eq!(IndexPatternField::new(spec.clone(), true).display_name(), "m.os");
        assert_eq!(IndexPatternField::new(spec, false).display_name(), "machine.os");
    }

    #[test]
    fn filterable_rules() {
        let geo = IndexPatternField::new(FieldSpec::new("location", "geo_point"), false);
        assert!(!geo.filterable());

        let id = IndexPatternField::new(
            FieldSpec::new("_id", "string").with_capabilities(false, false),
            false,
        );
        assert!(id.filterable());

        let script = IndexPatternField::new(FieldSpec::scripted("s", "1", "number"), false);
        assert!(script.filterable());
    }

    #[test]
    fn sortable_rules() {
        let score = IndexPatternField::new(
            FieldSpec::new("_score", "number").with_capabilities(false, false),
            false,
        );
        assert!(score.sortable());

        let source = IndexPatternField::new(FieldSpec::new("_source", "_source"), false);
        assert!(!source.sortable());

        let date = IndexPatternField::new(FieldSpec::new("@timestamp", "date"), false);
        assert!(date.sortable());
    }

    #[test]
    fn increment_count_saturates() {
        let mut spec = FieldSpec::new("a", "string");
        spec.count = u32::MAX;
        let mut field = IndexPatternField::new(spec, false);
        field.increment_count();
        assert_eq!(field.count(), u32::MAX);
    }
}
