//! Integration tests for index patterns built from the logstash fixtures

use dash_index_patterns::prelude::*;
use dash_index_patterns::{saved_object_to_spec, DocValueField, DATA_SOURCE_REFERENCE_NAME};
use dash_saved_objects::SavedObject;
use dash_test_utils::{
    create_from_spec, create_index_pattern, create_index_pattern_with_data_source,
    logstash_field_names, logstash_fields, nested_array_hit, nested_array_spec,
    STUB_DATA_SOURCE_ID, STUB_DATA_SOURCE_TYPE,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn names(fields: Vec<&IndexPatternField>) -> Vec<String> {
    fields.into_iter().map(|f| f.name().to_string()).collect()
}

#[test]
fn fields_expose_derived_properties() {
    let pattern = create_index_pattern("test-pattern");
    let bytes = pattern.get_field_by_name("bytes").unwrap();
    assert_eq!(bytes.display_name(), "bytes");
    assert!(bytes.filterable());
    assert!(bytes.sortable());
    assert!(!bytes.scripted());

    assert!(!pattern.get_field_by_name("point").unwrap().filterable());
    assert!(!pattern.get_field_by_name("request_body").unwrap().sortable());
}

#[test]
fn scripted_fields_match_fixture() {
    let pattern = create_index_pattern("test-pattern");
    assert_eq!(names(pattern.get_scripted_fields()), logstash_field_names(true));
}

#[test]
fn non_scripted_fields_match_fixture() {
    let pattern = create_index_pattern("test-pattern");
    assert_eq!(
        names(pattern.get_non_scripted_fields()),
        logstash_field_names(false)
    );
}

#[test]
fn computed_fields_request_everything_stored() {
    let computed = create_index_pattern("test-pattern").get_computed_fields();
    assert!(computed.stored_fields.contains(&"*".to_string()));
}

#[test]
fn computed_fields_request_doc_value_dates() {
    let computed = create_index_pattern("test-pattern").get_computed_fields();
    let doc_value_names: Vec<&str> = computed
        .docvalue_fields
        .iter()
        .map(|f| f.field.as_str())
        .collect();

    assert_eq!(doc_value_names, vec!["@timestamp", "time", "utc_time"]);
    assert!(computed
        .docvalue_fields
        .iter()
        .all(|f| f.format == "date_time"));
    assert!(!doc_value_names.contains(&"script date"));
}

#[test]
fn computed_fields_carry_scripts() {
    let computed = create_index_pattern("test-pattern").get_computed_fields();
    let script = &computed.script_fields["script date"].script;
    assert_eq!(script.source, "1234");
    assert_eq!(script.lang, "painless");
    assert_eq!(computed.script_fields.len(), 4);
}

#[test]
fn add_scripted_field_appends() {
    let mut pattern = create_index_pattern("test-pattern");
    let old_count = pattern.get_scripted_fields().len();

    pattern
        .add_scripted_field("new scripted field", "false", "boolean")
        .unwrap();

    assert_eq!(pattern.get_scripted_fields().len(), old_count + 1);
    let added = pattern.get_field_by_name("new scripted field").unwrap();
    assert_eq!(added.name(), "new scripted field");
    assert_eq!(added.field_type(), "boolean");
}

#[test]
fn remove_scripted_field_by_name() {
    let mut pattern = create_index_pattern("test-pattern");
    let scripted = names(pattern.get_scripted_fields());
    let last = scripted.last().unwrap();

    assert!(pattern.remove_scripted_field(last));
    assert_eq!(pattern.get_scripted_fields().len(), scripted.len() - 1);
    assert!(pattern.get_field_by_name(last).is_none());
}

#[test]
fn duplicate_scripted_name_rejected() {
    let mut pattern = create_index_pattern("test-pattern");
    let before = pattern.fields().to_spec();
    let last = names(pattern.get_scripted_fields()).pop().unwrap();

    let err = pattern
        .add_scripted_field(&last, "'new script'", "string")
        .unwrap_err();

    assert!(matches!(err, IndexPatternError::DuplicateField { .. }));
    assert_eq!(pattern.fields().to_spec(), before);
}

#[test]
fn to_spec_shape() {
    let spec = create_index_pattern("test-pattern").to_spec();
    let value = serde_json::to_value(&spec).unwrap();

    assert_eq!(value["id"], json!("test-pattern"));
    assert_eq!(value["type"], json!("index-pattern"));
    assert_eq!(value["version"], json!("2"));
    assert_eq!(value["title"], json!("logstash-*"));
    assert_eq!(value["timeFieldName"], json!("@timestamp"));
    assert_eq!(
        value["fieldFormatMap"],
        json!({"bytes": {"id": "number", "params": {"pattern": "$0,0.[00]"}}})
    );
    assert_eq!(value["fields"]["bytes"]["count"], json!(10));
    assert_eq!(
        value["fields"]["machine.os.raw"]["subType"],
        json!({"multi": {"parent": "machine.os"}})
    );
    assert!(value.get("dataSourceRef").is_none());
}

#[test]
fn restores_from_spec() {
    let pattern = create_index_pattern("test-pattern");
    let restored = create_from_spec(pattern.to_spec());

    assert_eq!(restored.id(), pattern.id());
    assert_eq!(restored.title(), pattern.title());
    assert_eq!(restored.time_field_name(), pattern.time_field_name());
    assert_eq!(restored.fields().len(), pattern.fields().len());
    assert_eq!(restored.field_format_map(), pattern.field_format_map());
    assert_eq!(restored.field_format_map()["bytes"].id, "number");
}

#[test]
fn restores_from_spec_with_data_source() {
    let pattern = create_index_pattern_with_data_source("test-pattern");
    let restored = create_from_spec(pattern.to_spec());

    assert_eq!(restored.id(), pattern.id());
    assert_eq!(restored.fields().len(), pattern.fields().len());
    assert_eq!(restored.field_format_map(), pattern.field_format_map());
    assert_eq!(restored.data_source_ref(), pattern.data_source_ref());
}

#[test]
fn save_object_reference_names_data_source() {
    let pattern = create_index_pattern_with_data_source("test-pattern");
    let references = pattern.get_save_object_reference();

    assert_eq!(references.len(), 1);
    assert_eq!(references[0].name, DATA_SOURCE_REFERENCE_NAME);
    assert_eq!(references[0].id, STUB_DATA_SOURCE_ID);
    assert_eq!(references[0].object_type, STUB_DATA_SOURCE_TYPE);

    assert!(create_index_pattern("test-pattern")
        .get_save_object_reference()
        .is_empty());
}

#[test]
fn flatten_hit_leaves_nested_array_untouched() {
    let pattern = create_from_spec(nested_array_spec());
    let hit = nested_array_hit();
    let clone = hit.clone();

    let _ = pattern.flatten_hit(&hit);
    let _ = pattern.flatten_hit_deep(&hit);

    assert_eq!(hit, clone);
}

#[test]
fn flatten_hit_with_meta_fields() {
    let pattern = IndexPattern::from_spec(
        nested_array_spec(),
        std::sync::Arc::new(DefaultFieldFormats::new()),
        &IndexPatternsConfig::default(),
    )
    .unwrap();

    let flat = pattern.flatten_hit_deep(&nested_array_hit());
    assert_eq!(flat["_id"], json!("JPas2pQBluzwIEYCwD0y"));
    assert_eq!(flat["_index"], json!("test-nested-array"));
    assert_eq!(flat["nested_test1.s_entry"], json!(["4", "5", "6"]));
}

#[test]
fn saved_object_body_round_trip() {
    let pattern = create_index_pattern_with_data_source("test-pattern");
    let object = SavedObject {
        id: "test-pattern".to_string(),
        object_type: "index-pattern".to_string(),
        version: Some("7".to_string()),
        attributes: pattern.get_as_saved_object_body().unwrap(),
        references: pattern.get_save_object_reference(),
    };

    let restored = create_from_spec(saved_object_to_spec(&object).unwrap());
    assert_eq!(restored.version(), Some("7"));
    assert_eq!(restored.fields().to_spec(), pattern.fields().to_spec());
    assert_eq!(restored.data_source_ref(), pattern.data_source_ref());
}

#[test]
fn bytes_format_renders_currency_pattern() {
    let pattern = create_index_pattern("test-pattern");
    let bytes = pattern.get_field_by_name("bytes").unwrap();
    assert_eq!(pattern.format_value(bytes, &json!(1234.5)), "$1,234.5");
}

#[test]
fn fixture_has_expected_size() {
    assert_eq!(create_index_pattern("x").fields().len(), logstash_fields().len());
    assert_eq!(
        create_index_pattern("x").get_computed_fields().docvalue_fields[0],
        DocValueField {
            field: "@timestamp".to_string(),
            format: "date_time".to_string(),
        }
    );
}
