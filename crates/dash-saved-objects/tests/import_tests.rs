//! Import boundary tests
//!
//! Drives `import_file` through a recording HTTP client.

use async_trait::async_trait;
use dash_saved_objects::{
    import_file, HttpClient, ImportFile, ImportMode, ImportRequest, ImportResponse,
    SavedObjectsError, IMPORT_PATH,
};
use pretty_assertions::assert_eq;
use std::sync::Mutex;

#[derive(Default)]
struct RecordingHttp {
    requests: Mutex<Vec<ImportRequest>>,
}

#[async_trait]
impl HttpClient for RecordingHttp {
    async fn post_import(&self, request: ImportRequest) -> Result<ImportResponse, SavedObjectsError> {
        self.requests.lock().unwrap().push(request);
        Ok(ImportResponse {
            success: true,
            success_count: 2,
            errors: None,
        })
    }
}

fn ndjson() -> ImportFile {
    ImportFile::new("export.ndjson", b"{\"id\":\"a\"}\n{\"id\":\"b\"}\n".to_vec())
}

#[tokio::test]
async fn import_posts_to_fixed_endpoint() {
    let http = RecordingHttp::default();
    let response = import_file(&http, ndjson(), ImportMode::overwrite(), None, false)
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.success_count, 2);

    let requests = http.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, IMPORT_PATH);
    assert_eq!(requests[0].file.file_name, "export.ndjson");
    assert_eq!(requests[0].query.pairs(), vec![("overwrite", "true".to_string())]);
}

#[tokio::test]
async fn import_forwards_data_source_flags() {
    let http = RecordingHttp::default();
    import_file(&http, ndjson(), ImportMode::new_copies(), Some("remote"), true)
        .await
        .unwrap();

    let requests = http.requests.lock().unwrap();
    assert_eq!(
        requests[0].query.pairs(),
        vec![
            ("createNewCopies", "true".to_string()),
            ("dataSourceId", "remote".to_string()),
            ("dataSourceEnabled", "true".to_string()),
        ]
    );
}

#[tokio::test]
async fn import_through_trait_object() {
    let http: Box<dyn HttpClient> = Box::new(RecordingHttp::default());
    let response = import_file(http.as_ref(), ndjson(), ImportMode::default(), None, false)
        .await
        .unwrap();
    assert!(response.errors.is_none());
}
