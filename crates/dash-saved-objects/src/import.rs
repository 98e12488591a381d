//! Saved object import boundary
//!
//! Builds the multipart import request and sends it through an injected
//! [`HttpClient`]. The file contents are passed through untouched; the
//! export/import file format belongs to the server.

use crate::error::SavedObjectsError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Fixed import endpoint
pub const IMPORT_PATH: &str = "/api/saved_objects/_import";

/// Conflict handling for an import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportMode {
    /// Regenerate ids for every imported object
    pub create_new_copies: bool,
    /// Overwrite objects with matching ids
    pub overwrite: bool,
}

impl ImportMode {
    /// Import as new copies
    #[inline]
    #[must_use]
    pub fn new_copies() -> Self {
        Self {
            create_new_copies: true,
            overwrite: false,
        }
    }

    /// Import over existing objects
    #[inline]
    #[must_use]
    pub fn overwrite() -> Self {
        Self {
            create_new_copies: false,
            overwrite: true,
        }
    }
}

/// Query flags sent with the import request
///
/// Exactly one of `create_new_copies` and `overwrite` is present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_new_copies: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source_enabled: Option<bool>,
}

impl ImportQuery {
    /// Build query flags from mode and data source selection
    #[must_use]
    pub fn new(
        mode: ImportMode,
        selected_data_source_id: Option<&str>,
        data_source_enabled: bool,
    ) -> Self {
        let (create_new_copies, overwrite) = if mode.create_new_copies {
            (Some(true), None)
        } else {
            (None, Some(mode.overwrite))
        };

        Self {
            create_new_copies,
            overwrite,
            data_source_id: selected_data_source_id
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            data_source_enabled: data_source_enabled.then_some(true),
        }
    }

    /// Flatten into `(key, value)` pairs for a query string
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(v) = self.create_new_copies {
            pairs.push(("createNewCopies", v.to_string()));
        }
        if let Some(v) = self.overwrite {
            pairs.push(("overwrite", v.to_string()));
        }
        if let Some(id) = &self.data_source_id {
            pairs.push(("dataSourceId", id.clone()));
        }
        if let Some(v) = self.data_source_enabled {
            pairs.push(("dataSourceEnabled", v.to_string()));
        }
        pairs
    }
}

/// File uploaded as the `file` part of the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl ImportFile {
    /// Create import file
    #[inline]
    #[must_use]
    pub fn new(file_name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            contents,
        }
    }
}

/// Fully assembled import request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub path: &'static str,
    pub file: ImportFile,
    pub query: ImportQuery,
}

/// Per-object failure reported by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportObjectError {
    pub id: String,
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub error: Value,
}

/// Import endpoint response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub success: bool,
    pub success_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ImportObjectError>>,
}

/// HTTP capability used for the import call
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Post a multipart import request
    async fn post_import(&self, request: ImportRequest) -> Result<ImportResponse, SavedObjectsError>;
}

/// [`HttpClient`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create client for a server base URL (e.g. `http://localhost:5601`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Base URL requests are sent to
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_import(&self, request: ImportRequest) -> Result<ImportResponse, SavedObjectsError> {
        let url = format!("{}{}", self.base_url, request.path);
        let part = Part::bytes(request.file.contents).file_name(request.file.file_name);
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .header("osd-xsrf", "true")
            .query(&request.query.pairs())
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<ImportResponse>().await?)
    }
}

/// Import a saved objects file
///
/// # Errors
/// Propagates transport and decoding failures from the client.
pub async fn import_file<H>(
    http: &H,
    file: ImportFile,
    mode: ImportMode,
    selected_data_source_id: Option<&str>,
    data_source_enabled: bool,
) -> Result<ImportResponse, SavedObjectsError>
where
    H: HttpClient + ?Sized,
{
    let query = ImportQuery::new(mode, selected_data_source_id, data_source_enabled);
    debug!(file = %file.file_name, ?query, "importing saved objects");

    let response = http
        .post_import(ImportRequest {
            path: IMPORT_PATH,
            file,
            query,
        })
        .await?;

    if !response.success {
        warn!(
            success_count = response.success_count,
            errors = response.errors.as_ref().map_or(0, Vec::len),
            "import finished with errors"
        );
    }
    Ok(response)
}
