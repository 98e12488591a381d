//! Subcommand implementations
//!
//! Each command reads its JSON inputs from disk and returns a JSON value for
//! `main` to print.

use crate::config::DashConfig;
use anyhow::{bail, Context, Result};
use dash_index_patterns::{DefaultFieldFormats, IndexPattern, IndexPatternField, IndexPatternSpec};
use dash_saved_objects::{import_file, HttpClient, ImportFile, ImportMode, ImportResponse};
use dash_search::{build_search_params, SearchRequest};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Build a pattern from a spec file
///
/// # Errors
/// If the file is unreadable or the spec is invalid
pub fn load_pattern(spec_path: &Path, config: &DashConfig) -> Result<IndexPattern> {
    let spec: IndexPatternSpec = read_json(spec_path)?;
    IndexPattern::from_spec(
        spec,
        Arc::new(DefaultFieldFormats::new()),
        &config.index_patterns,
    )
    .with_context(|| format!("invalid index pattern in {}", spec_path.display()))
}

/// Summary of a pattern: fields, scripted fields, computed request fields
/// and saved object references
///
/// # Errors
/// See [`load_pattern`]
pub fn inspect(spec_path: &Path, config: &DashConfig) -> Result<Value> {
    let pattern = load_pattern(spec_path, config)?;

    let scripted: Vec<&str> = pattern
        .get_scripted_fields()
        .into_iter()
        .map(IndexPatternField::name)
        .collect();
    let fields: Vec<Value> = pattern
        .fields()
        .iter()
        .map(|f| {
            json!({
                "name": f.name(),
                "displayName": f.display_name(),
                "type": f.field_type(),
                "scripted": f.scripted(),
                "filterable": f.filterable(),
                "sortable": f.sortable(),
                "format": pattern.get_formatter_for_field(f).id(),
            })
        })
        .collect();

    Ok(json!({
        "id": pattern.id(),
        "title": pattern.title(),
        "timeFieldName": pattern.time_field_name(),
        "fields": fields,
        "scripted": scripted,
        "computed": pattern.get_computed_fields(),
        "source": pattern.get_source_filtering(),
        "references": pattern.get_save_object_reference(),
    }))
}

/// Flatten a hit against a pattern
///
/// # Errors
/// If either file is unreadable or invalid
pub fn flatten(
    spec_path: &Path,
    hit_path: &Path,
    deep: bool,
    config: &DashConfig,
) -> Result<Value> {
    let pattern = load_pattern(spec_path, config)?;
    let hit: Value = read_json(hit_path)?;

    let flat = if deep {
        pattern.flatten_hit_deep(&hit)
    } else {
        pattern.flatten_hit(&hit)
    };
    Ok(Value::Object(flat))
}

/// Parameters the search strategy would forward for a request
///
/// # Errors
/// If the request file is invalid or targets a non-default index type
pub fn params(request_path: &Path, config: &DashConfig) -> Result<Value> {
    let request: SearchRequest = read_json(request_path)?;
    if let Some(index_type) = request.index_type.as_deref().filter(|t| !t.is_empty()) {
        bail!("unsupported index pattern type {index_type}");
    }
    Ok(Value::Object(build_search_params(&config.search, request.params)))
}

/// Import an export file through the saved objects import endpoint
///
/// # Errors
/// If the file is unreadable or the request fails
pub async fn import<H>(
    http: &H,
    file_path: &Path,
    mode: ImportMode,
    data_source_id: Option<&str>,
    config: &DashConfig,
) -> Result<ImportResponse>
where
    H: HttpClient + ?Sized,
{
    let contents = std::fs::read(file_path)
        .with_context(|| format!("failed to read {}", file_path.display()))?;
    let file_name = file_path
        .file_name()
        .map_or_else(|| "export.ndjson".to_string(), |n| n.to_string_lossy().into_owned());

    let response = import_file(
        http,
        ImportFile::new(file_name, contents),
        mode,
        data_source_id,
        config.import.data_source_enabled,
    )
    .await
    .context("import request failed")?;

    info!(
        success = response.success,
        count = response.success_count,
        "import finished"
    );
    Ok(response)
}
