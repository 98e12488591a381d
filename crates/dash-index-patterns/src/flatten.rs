//! Hit flattening
//!
//! Turns a search hit's nested `_source` into a single-level map keyed by
//! dotted field path. The hit is only ever borrowed; every emitted value is
//! a copy.

use crate::fields::FieldCollection;
use serde_json::map::Entry;
use serde_json::{Map, Value};

/// Flattened document keyed by dotted field path
pub type FlattenedHit = Map<String, Value>;

/// Flatten a hit against a field collection
///
/// With `deep`, arrays of objects that are not mapped as `nested` are walked
/// element by element and repeated keys accumulate into arrays.
#[must_use]
pub fn flatten_hit(
    fields: &FieldCollection,
    meta_fields: &[String],
    hit: &Value,
    deep: bool,
) -> FlattenedHit {
    let mut flat = Map::new();

    if let Some(Value::Object(source)) = hit.get("_source") {
        flatten_object(&mut flat, fields, source, None, deep);
    }

    for meta in meta_fields {
        if meta == "_source" {
            continue;
        }
        if let Some(value) = hit.get(meta) {
            flat.insert(meta.clone(), value.clone());
        }
    }

    if let Some(Value::Object(hit_fields)) = hit.get("fields") {
        for (key, value) in hit_fields {
            if !flat.contains_key(key) {
                flat.insert(key.clone(), value.clone());
            }
        }
    }

    flat
}

fn flatten_object(
    flat: &mut FlattenedHit,
    fields: &FieldCollection,
    object: &Map<String, Value>,
    prefix: Option<&str>,
    deep: bool,
) {
    for (key, value) in object {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        let field = fields.get_by_name(&path);
        let is_nested_field = field.is_some_and(|f| f.field_type() == "nested");

        if deep {
            if let Value::Array(items) = value {
                if !is_nested_field && items.first().is_some_and(Value::is_object) {
                    for item in items {
                        match item {
                            Value::Object(inner) => {
                                flatten_object(flat, fields, inner, Some(&path), deep);
                            }
                            other => append(flat, path.clone(), other),
                        }
                    }
                    continue;
                }
            }
        } else if flat.contains_key(&path) {
            continue;
        }

        let has_valid_mapping = field.is_some_and(|f| f.field_type() != "conflict");
        let is_leaf = !value.is_object();

        if has_valid_mapping || is_leaf {
            append(flat, path, value);
            continue;
        }

        if let Value::Object(inner) = value {
            flatten_object(flat, fields, inner, Some(&path), deep);
        }
    }
}

fn append(flat: &mut FlattenedHit, path: String, value: &Value) {
    match flat.entry(path) {
        Entry::Vacant(vacant) => {
            vacant.insert(value.clone());
        }
        Entry::Occupied(mut occupied) => {
            let existing = occupied.get_mut();
            if !existing.is_array() {
                let first = existing.take();
                *existing = Value::Array(vec![first]);
            }
            if let Value::Array(values) = existing {
                match value {
                    Value::Array(more) => values.extend(more.iter().cloned()),
                    single => values.push(single.clone()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldSpec;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn meta() -> Vec<String> {
        ["_id", "_index", "_score", "_source"]
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    }

    fn nested_fields() -> FieldCollection {
        FieldCollection::from_specs(
            vec![
                FieldSpec::new("nested_test1.d_values", "number")
                    .with_es_types(["double"])
                    .with_doc_values(true)
                    .with_nested_path("nested_test1"),
                FieldSpec::new("nested_test1.s_entry", "string")
                    .with_es_types(["keyword"])
                    .with_doc_values(true)
                    .with_nested_path("nested_test1"),
            ],
            false,
        )
        .unwrap()
    }

    fn nested_hit() -> Value {
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

    #[test]
    fn flattens_objects_into_dotted_keys() {
        let fields = FieldCollection::from_specs(
            vec![FieldSpec::new("machine.os", "string")],
            false,
        )
        .unwrap();
        let hit = json!({
            "_id": "1",
            "_source": {"machine": {"os": "win", "ram": 16}, "bytes": 10}
        });

        let flat = flatten_hit(&fields, &meta(), &hit, false);
        assert_eq!(flat.get("machine.os"), Some(&json!("win")));
        assert_eq!(flat.get("machine.ram"), Some(&json!(16)));
        assert_eq!(flat.get("bytes"), Some(&json!(10)));
        assert_eq!(flat.get("_id"), Some(&json!("1")));
        assert!(flat.get("_source").is_none());
    }

    #[test]
    fn mapped_object_kept_whole() {
        let fields =
            FieldCollection::from_specs(vec![FieldSpec::new("geo", "geo_point")], false).unwrap();
        let hit = json!({"_source": {"geo": {"lat": 1.0, "lon": 2.0}}});

        let flat = flatten_hit(&fields, &[], &hit, false);
        assert_eq!(flat.get("geo"), Some(&json!({"lat": 1.0, "lon": 2.0})));
    }

    #[test]
    fn shallow_keeps_arrays_of_objects() {
        let hit = nested_hit();
        let flat = flatten_hit(&nested_fields(), &meta(), &hit, false);
        assert_eq!(flat.get("nested_test1"), hit["_source"].get("nested_test1"));
        assert_eq!(flat.get("_index"), Some(&json!("test-nested-array")));
    }

    #[test]
    fn deep_accumulates_repeated_keys() {
        let hit = nested_hit();
        let flat = flatten_hit(&nested_fields(), &meta(), &hit, true);
        assert_eq!(
            flat.get("nested_test1.d_values"),
            Some(&json!([0.1, 0.2, 0.3, 0.4, 0.5, 0.6]))
        );
        assert_eq!(flat.get("nested_test1.s_entry"), Some(&json!(["4", "5", "6"])));
    }

    #[test]
    fn deep_keeps_scalars_mixed_into_object_arrays() {
        let hit = json!({"_source": {"tags": [{"name": "a"}, "loose", {"name": "b"}, 7]}});
        let flat = flatten_hit(&FieldCollection::default(), &[], &hit, true);
        assert_eq!(flat.get("tags.name"), Some(&json!(["a", "b"])));
        assert_eq!(flat.get("tags"), Some(&json!(["loose", 7])));
    }

    #[test]
    fn deep_flatten_leaves_hit_untouched() {
        let hit = nested_hit();
        let clone = hit.clone();
        let _ = flatten_hit(&nested_fields(), &meta(), &hit, true);
        assert_eq!(hit, clone);
    }

    #[test]
    fn nested_typed_arrays_not_descended() {
        let fields =
            FieldCollection::from_specs(vec![FieldSpec::new("items", "nested")], false).unwrap();
        let hit = json!({"_source": {"items": [{"a": 1}, {"a": 2}]}});

        let flat = flatten_hit(&fields, &[], &hit, true);
        assert_eq!(flat.get("items"), Some(&json!([{"a": 1}, {"a": 2}])));
        assert!(flat.get("items.a").is_none());
    }

    #[test]
    fn hit_fields_fill_gaps_only() {
        let hit = json!({
            "_source": {"a": 1},
            "fields": {"a": [99], "runtime": ["x"]}
        });
        let flat = flatten_hit(&FieldCollection::default(), &[], &hit, false);
        assert_eq!(flat.get("a"), Some(&json!(1)));
        assert_eq!(flat.get("runtime"), Some(&json!(["x"])));
    }

    #[test]
    fn missing_source_yields_meta_only() {
        let hit = json!({"_id": "x"});
        let flat = flatten_hit(&FieldCollection::default(), &meta(), &hit, false);
        assert_eq!(flat.len(), 1);
    }
}
