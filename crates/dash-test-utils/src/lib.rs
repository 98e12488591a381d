//! Testing utilities for the Dash workspace
//!
//! Shared fixtures: the logstash field set, a stubbed saved index pattern,
//! the nested-array document and a saved objects client that can be told to
//! fail.

#![allow(missing_docs)]

use async_trait::async_trait;
use dash_index_patterns::{
    saved_object_to_spec, DataSourceRef, DefaultFieldFormats, FieldSpec, FieldSubType,
    IndexPattern, IndexPatternSpec, IndexPatternsConfig, MultiSubType,
    INDEX_PATTERN_SAVED_OBJECT_TYPE,
};
use dash_saved_objects::{
    CreateOptions, InMemorySavedObjectsClient, SavedObject, SavedObjectAttributes,
    SavedObjectReference, SavedObjectsClient, SavedObjectsError, UpdateOptions,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const STUB_TITLE: &str = "logstash-*";
pub const STUB_TIME_FIELD: &str = "@timestamp";
pub const STUB_DATA_SOURCE_ID: &str = "dataSourceId";
pub const STUB_DATA_SOURCE_TYPE: &str = "data-source";

struct Row {
    name: &'static str,
    es_type: &'static str,
    aggregatable: bool,
    searchable: bool,
    count: u32,
    script: Option<&'static str>,
    lang: Option<&'static str>,
    parent: Option<&'static str>,
}

fn row(name: &'static str, es_type: &'static str, aggregatable: bool, searchable: bool) -> Row {
    Row {
        name,
        es_type,
        aggregatable,
        searchable,
        count: 0,
        script: None,
        lang: None,
        parent: None,
    }
}

fn counted(mut r: Row, count: u32) -> Row {
    r.count = count;
    r
}

fn script(mut r: Row, body: &'static str, lang: &'static str) -> Row {
    r.script = Some(body);
    r.lang = Some(lang);
    r
}

fn multi(mut r: Row, parent: &'static str) -> Row {
    r.parent = Some(parent);
    r
}

/// Semantic type for an engine type
#[must_use]
pub fn cast_es_type(es_type: &str) -> &'static str {
    match es_type {
        "long" | "integer" | "short" | "byte" | "double" | "float" | "half_float"
        | "scaled_float" | "unsigned_long" | "token_count" => "number",
        "boolean" => "boolean",
        "date" | "date_nanos" => "date",
        "text" | "keyword" | "string" | "_id" | "_type" => "string",
        "ip" => "ip",
        "attachment" => "attachment",
        "geo_point" => "geo_point",
        "geo_shape" => "geo_shape",
        "murmur3" => "murmur3",
        "_source" => "_source",
        "conflict" => "conflict",
        "nested" => "nested",
        _ => "unknown",
    }
}

fn reads_from_doc_values(aggregatable: bool, es_type: &str) -> bool {
    aggregatable && !matches!(es_type, "text" | "geo_shape") && !es_type.starts_with('_')
}

fn logstash_rows() -> Vec<Row> {
    vec![
        counted(row("bytes", "long", true, true), 10),
        counted(row("ssl", "boolean", true, true), 20),
        counted(row("@timestamp", "date", true, true), 30),
        counted(row("time", "date", true, true), 30),
        row("@tags", "keyword", true, true),
        row("utc_time", "date", true, true),
        row("phpmemory", "integer", true, true),
        row("ip", "ip", true, true),
        row("request_body", "attachment", true, true),
        row("point", "geo_point", true, true),
        row("area", "geo_shape", true, true),
        row("hashed", "murmur3", false, true),
        row("geo.coordinates", "geo_point", true, true),
        row("extension", "text", true, true),
        multi(row("extension.keyword", "keyword", true, true), "extension"),
        row("machine.os", "text", true, true),
        multi(row("machine.os.raw", "keyword", true, true), "machine.os"),
        row("geo.src", "keyword", true, true),
        row("_id", "_id", true, true),
        row("_type", "_type", true, true),
        row("_source", "_source", true, true),
        row("non-filterable", "text", true, false),
        row("non-sortable", "text", false, false),
        row("custom_user_field", "conflict", true, true),
        script(row("script string", "text", true, false), "'i am a string'", "expression"),
        script(row("script number", "long", true, false), "1234", "expression"),
        script(row("script date", "date", true, false), "1234", "painless"),
        script(row("script murmur3", "murmur3", true, false), "1234", "expression"),
    ]
}

/// The logstash field set, in fixture order
#[must_use]
pub fn logstash_fields() -> Vec<FieldSpec> {
    logstash_rows()
        .into_iter()
        .map(|r| {
            let mut spec = FieldSpec::new(r.name, cast_es_type(r.es_type))
                .with_es_types([r.es_type])
                .with_capabilities(r.searchable, r.aggregatable)
                .with_doc_values(reads_from_doc_values(r.aggregatable, r.es_type));
            spec.count = r.count;
            if let Some(body) = r.script {
                spec.scripted = true;
                spec.script = Some(body.to_string());
                spec.lang = r.lang.map(str::to_string);
            }
            if let Some(parent) = r.parent {
                spec.sub_type = Some(FieldSubType {
                    nested: None,
                    multi: Some(MultiSubType {
                        parent: parent.to_string(),
                    }),
                });
            }
            spec
        })
        .collect()
}

/// Names of the logstash fixture fields matching `scripted`
#[must_use]
pub fn logstash_field_names(scripted: bool) -> Vec<String> {
    logstash_fields()
        .into_iter()
        .filter(|f| f.scripted == scripted)
        .map(|f| f.name)
        .collect()
}

/// Stored index pattern as the saved objects backend returns it
#[must_use]
pub fn stubbed_saved_object_index_pattern(id: &str, with_data_source: bool) -> SavedObject {
    let fields = serde_json::to_string(&logstash_fields()).unwrap_or_default();
    let mut attributes = SavedObjectAttributes::new();
    attributes.insert("title".to_string(), json!(STUB_TITLE));
    attributes.insert("timeFieldName".to_string(), json!(STUB_TIME_FIELD));
    attributes.insert("fields".to_string(), Value::String(fields));
    attributes.insert(
        "fieldFormatMap".to_string(),
        json!(r#"{"bytes":{"id":"number","params":{"pattern":"$0,0.[00]"}}}"#),
    );

    let references = if with_data_source {
        vec![SavedObjectReference::new(
            "dataSource",
            STUB_DATA_SOURCE_ID,
            STUB_DATA_SOURCE_TYPE,
        )]
    } else {
        Vec::new()
    };

    SavedObject {
        id: id.to_string(),
        object_type: INDEX_PATTERN_SAVED_OBJECT_TYPE.to_string(),
        version: Some("2".to_string()),
        attributes,
        references,
    }
}

/// Spec restored from [`stubbed_saved_object_index_pattern`]
#[must_use]
pub fn stubbed_index_pattern_spec(id: &str, with_data_source: bool) -> IndexPatternSpec {
    let object = stubbed_saved_object_index_pattern(id, with_data_source);
    let mut spec = saved_object_to_spec(&object).unwrap_or_default();
    spec.pattern_type = Some(INDEX_PATTERN_SAVED_OBJECT_TYPE.to_string());
    spec
}

/// Construction config used by fixtures: no short dots, no meta fields
#[must_use]
pub fn test_config() -> IndexPatternsConfig {
    IndexPatternsConfig::new().with_meta_fields(Vec::<String>::new())
}

/// Build a pattern from a spec with the built-in format registry
///
/// # Panics
/// If the spec is invalid
#[must_use]
pub fn create_from_spec(spec: IndexPatternSpec) -> IndexPattern {
    IndexPattern::from_spec(spec, Arc::new(DefaultFieldFormats::new()), &test_config())
        .expect("fixture spec is valid")
}

/// Logstash pattern without a data source
#[must_use]
pub fn create_index_pattern(id: &str) -> IndexPattern {
    create_from_spec(stubbed_index_pattern_spec(id, false))
}

/// Logstash pattern bound to [`STUB_DATA_SOURCE_ID`]
#[must_use]
pub fn create_index_pattern_with_data_source(id: &str) -> IndexPattern {
    let spec = stubbed_index_pattern_spec(id, true);
    debug_assert_eq!(
        spec.data_source_ref,
        Some(DataSourceRef::new(STUB_DATA_SOURCE_ID, STUB_DATA_SOURCE_TYPE))
    );
    create_from_spec(spec)
}

/// Two nested-typed fields under `nested_test1`
#[must_use]
pub fn nested_array_spec() -> IndexPatternSpec {
    let mut spec = IndexPatternSpec::new("test-nested-array")
        .with_id("test-nested-array")
        .with_fields(vec![
            FieldSpec::new("nested_test1.d_values", "number")
                .with_es_types(["double"])
                .with_doc_values(true)
                .with_nested_path("nested_test1"),
            FieldSpec::new("nested_test1.s_entry", "string")
                .with_es_types(["keyword"])
                .with_doc_values(true)
                .with_nested_path("nested_test1"),
        ]);
    spec.pattern_type = Some(INDEX_PATTERN_SAVED_OBJECT_TYPE.to_string());
    spec
}

/// Hit whose `_source` holds an array of nested objects
#[must_use]
pub fn nested_array_hit() -> Value {
    json!({
        "_index": "test-nested-array",
        "_id": "JPas2pQBluzwIEYCwD0y",
        "_score": 1,
        "_source": {
            "nested_test1": [
                {"d_values": [0.1, 0.2], "s_entry": "4"},
                {"d_values": [0.3, 0.4], "s_entry": "5"},
                {"d_values": [0.5, 0.6], "s_entry": "6"}
            ]
        }
    })
}

/// In-memory client whose updates can be switched to fail
#[derive(Debug, Default)]
pub struct FlakySavedObjectsClient {
    inner: InMemorySavedObjectsClient,
    fail_updates: AtomicBool,
}

impl FlakySavedObjectsClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SavedObjectsClient for FlakySavedObjectsClient {
    async fn create(
        &self,
        object_type: &str,
        attributes: SavedObjectAttributes,
        options: CreateOptions,
    ) -> Result<SavedObject, SavedObjectsError> {
        self.inner.create(object_type, attributes, options).await
    }

    async fn get(&self, object_type: &str, id: &str) -> Result<SavedObject, SavedObjectsError> {
        self.inner.get(object_type, id).await
    }

    async fn update(
        &self,
        object_type: &str,
        id: &str,
        attributes: SavedObjectAttributes,
        options: UpdateOptions,
    ) -> Result<SavedObject, SavedObjectsError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(SavedObjectsError::conflict(object_type, id));
        }
        self.inner.update(object_type, id, attributes, options).await
    }

    async fn delete(&self, object_type: &str, id: &str) -> Result<(), SavedObjectsError> {
        self.inner.delete(object_type, id).await
    }

    async fn find(&self, object_type: &str) -> Result<Vec<SavedObject>, SavedObjectsError> {
        self.inner.find(object_type).await
    }
}
