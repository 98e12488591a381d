use dash_index_patterns::{
    DefaultFieldFormats, IndexPatternError, IndexPatternsService, INDEX_PATTERN_SAVED_OBJECT_TYPE,
};
use dash_saved_objects::{InMemorySavedObjectsClient, SavedObjectsClient};
use dash_test_utils::{
    logstash_field_names, stubbed_index_pattern_spec, test_config, FlakySavedObjectsClient,
    STUB_DATA_SOURCE_ID,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn service(client: Arc<dyn SavedObjectsClient>) -> IndexPatternsService {
    IndexPatternsService::new(client, Arc::new(DefaultFieldFormats::new()), test_config())
}

#[tokio::test]
async fn create_and_get_round_trip() {
    let client = Arc::new(InMemorySavedObjectsClient::new());
    let svc = service(client.clone());

    let mut spec = stubbed_index_pattern_spec("logs", true);
    spec.version = None;
    let created = svc.create_and_save(spec, false).await.unwrap();
    assert_eq!(created.version(), Some("1"));
    assert_eq!(client.len(), 1);

    let stored = client
        .get(INDEX_PATTERN_SAVED_OBJECT_TYPE, "logs")
        .await
        .unwrap();
    assert_eq!(stored.references.len(), 1);
    assert!(stored.attributes["fields"].is_string());

    let loaded = svc.get("logs").await.unwrap();
    assert_eq!(loaded.title(), created.title());
    assert_eq!(loaded.fields().len(), created.fields().len());
    assert_eq!(loaded.field_format_map(), created.field_format_map());
    assert_eq!(
        loaded.data_source_ref().map(|d| d.id.as_str()),
        Some(STUB_DATA_SOURCE_ID)
    );
}

#[tokio::test]
async fn create_without_id_generates_one() {
    let svc = service(Arc::new(InMemorySavedObjectsClient::new()));
    let mut spec = stubbed_index_pattern_spec("ignored", false);
    spec.id = None;

    let created = svc.create_and_save(spec, false).await.unwrap();
    let id = created.id().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(svc.get_ids().await.unwrap(), vec![id]);
}

#[tokio::test]
async fn create_existing_without_overwrite_conflicts() {
    let svc = service(Arc::new(InMemorySavedObjectsClient::new()));
    svc.create_and_save(stubbed_index_pattern_spec("logs", false), false)
        .await
        .unwrap();

    let err = svc
        .create_and_save(stubbed_index_pattern_spec("logs", false), false)
        .await
        .unwrap_err();
    assert!(matches!(err, IndexPatternError::SavedObjects(e) if e.is_conflict()));

    svc.create_and_save(stubbed_index_pattern_spec("logs", false), true)
        .await
        .unwrap();
}

#[tokio::test]
async fn scripted_field_changes_are_persisted() {
    let svc = service(Arc::new(InMemorySavedObjectsClient::new()));
    let mut pattern = svc
        .create_and_save(stubbed_index_pattern_spec("logs", false), false)
        .await
        .unwrap();

    svc.add_scripted_field(&mut pattern, "new scripted field", "false", "boolean")
        .await
        .unwrap();
    assert_eq!(pattern.version(), Some("2"));

    let reloaded = svc.get("logs").await.unwrap();
    assert_eq!(
        reloaded.get_scripted_fields().len(),
        logstash_field_names(true).len() + 1
    );

    assert!(svc
        .remove_scripted_field(&mut pattern, "new scripted field")
        .await
        .unwrap());
    assert!(!svc
        .remove_scripted_field(&mut pattern, "new scripted field")
        .await
        .unwrap());
    assert_eq!(pattern.version(), Some("3"));

    let reloaded = svc.get("logs").await.unwrap();
    assert!(reloaded.get_field_by_name("new scripted field").is_none());
}

#[tokio::test]
async fn failed_save_rolls_back_scripted_field() {
    let client = Arc::new(FlakySavedObjectsClient::new());
    let svc = service(client.clone());
    let mut pattern = svc
        .create_and_save(stubbed_index_pattern_spec("logs", false), false)
        .await
        .unwrap();
    let before = pattern.fields().len();

    client.fail_updates(true);
    let err = svc
        .add_scripted_field(&mut pattern, "doomed", "1", "number")
        .await
        .unwrap_err();

    assert!(matches!(err, IndexPatternError::SavedObjects(_)));
    assert_eq!(pattern.fields().len(), before);
    assert!(pattern.get_field_by_name("doomed").is_none());
}

#[tokio::test]
async fn failed_save_restores_removed_scripted_field() {
    let client = Arc::new(FlakySavedObjectsClient::new());
    let svc = service(client.clone());
    let mut pattern = svc
        .create_and_save(stubbed_index_pattern_spec("logs", false), false)
        .await
        .unwrap();
    let order_before: Vec<String> = pattern
        .fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    let target = logstash_field_names(true).remove(0);

    client.fail_updates(true);
    let err = svc
        .remove_scripted_field(&mut pattern, &target)
        .await
        .unwrap_err();
    assert!(matches!(err, IndexPatternError::SavedObjects(_)));

    let order_after: Vec<String> = pattern
        .fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    assert_eq!(order_after, order_before);
    assert!(pattern.get_field_by_name(&target).unwrap().scripted());

    client.fail_updates(false);
    let stored = svc.get("logs").await.unwrap();
    assert!(stored.get_field_by_name(&target).is_some());
    assert_eq!(stored.fields().len(), pattern.fields().len());
}

#[tokio::test]
async fn update_requires_id() {
    let svc = service(Arc::new(InMemorySavedObjectsClient::new()));
    let mut spec = stubbed_index_pattern_spec("x", false);
    spec.id = None;
    let mut pattern = svc.create(spec).unwrap();

    let err = svc.update_saved_object(&mut pattern).await.unwrap_err();
    assert!(matches!(err, IndexPatternError::MissingId));
}

#[tokio::test]
async fn delete_removes_pattern() {
    let svc = service(Arc::new(InMemorySavedObjectsClient::new()));
    svc.create_and_save(stubbed_index_pattern_spec("logs", false), false)
        .await
        .unwrap();

    svc.delete("logs").await.unwrap();
    let err = svc.get("logs").await.unwrap_err();
    assert!(matches!(err, IndexPatternError::SavedObjects(e) if e.is_not_found()));
}
