//! Saved object client capability and in-memory implementation
//!
//! Services receive an `Arc<dyn SavedObjectsClient>` at construction instead
//! of looking one up from a global service registry.

use crate::error::SavedObjectsError;
use crate::types::{SavedObject, SavedObjectAttributes, SavedObjectReference};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

/// Options for [`SavedObjectsClient::create`]
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Explicit id; generated when absent
    pub id: Option<String>,
    /// Replace an existing object with the same id
    pub overwrite: bool,
    /// Outgoing references
    pub references: Vec<SavedObjectReference>,
}

impl CreateOptions {
    /// With explicit id
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// With overwrite flag
    #[inline]
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// With references
    #[inline]
    #[must_use]
    pub fn with_references(mut self, references: Vec<SavedObjectReference>) -> Self {
        self.references = references;
        self
    }
}

/// Options for [`SavedObjectsClient::update`]
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Expected current version; mismatch is a conflict
    pub version: Option<String>,
    /// Replacement references, if any
    pub references: Option<Vec<SavedObjectReference>>,
}

/// Persistence capability for saved objects
#[async_trait]
pub trait SavedObjectsClient: Send + Sync {
    /// Create a new object
    ///
    /// # Errors
    /// `Conflict` if the id exists and `overwrite` is not set
    async fn create(
        &self,
        object_type: &str,
        attributes: SavedObjectAttributes,
        options: CreateOptions,
    ) -> Result<SavedObject, SavedObjectsError>;

    /// Fetch an object
    async fn get(&self, object_type: &str, id: &str) -> Result<SavedObject, SavedObjectsError>;

    /// Replace attributes of an existing object
    ///
    /// # Errors
    /// `NotFound` if absent, `Conflict` on a stale version
    async fn update(
        &self,
        object_type: &str,
        id: &str,
        attributes: SavedObjectAttributes,
        options: UpdateOptions,
    ) -> Result<SavedObject, SavedObjectsError>;

    /// Delete an object
    async fn delete(&self, object_type: &str, id: &str) -> Result<(), SavedObjectsError>;

    /// List all objects of a type
    async fn find(&self, object_type: &str) -> Result<Vec<SavedObject>, SavedObjectsError>;
}

/// Concurrent in-process saved object store
///
/// Versions are monotonically increasing integers rendered as strings.
#[derive(Debug, Default)]
pub struct InMemorySavedObjectsClient {
    objects: DashMap<(String, String), SavedObject>,
}

impl InMemorySavedObjectsClient {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: DashMap::new(),
        }
    }

    /// Number of stored objects
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if store is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

fn next_version(current: Option<&str>) -> String {
    let n = current.and_then(|v| v.parse::<u64>().ok()).unwrap_or(0);
    (n + 1).to_string()
}

#[async_trait]
impl SavedObjectsClient for InMemorySavedObjectsClient {
    async fn create(
        &self,
        object_type: &str,
        attributes: SavedObjectAttributes,
        options: CreateOptions,
    ) -> Result<SavedObject, SavedObjectsError> {
        let id = options
            .id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let key = (object_type.to_string(), id.clone());

        match self.objects.entry(key) {
            Entry::Occupied(mut occupied) => {
                if !options.overwrite {
                    return Err(SavedObjectsError::conflict(object_type, id));
                }
                let version = next_version(occupied.get().version.as_deref());
                let object = SavedObject {
                    id,
                    object_type: object_type.to_string(),
                    version: Some(version),
                    attributes,
                    references: options.references,
                };
                occupied.insert(object.clone());
                debug!(object_type, id = %object.id, "saved object overwritten");
                Ok(object)
            }
            Entry::Vacant(vacant) => {
                let object = SavedObject {
                    id,
                    object_type: object_type.to_string(),
                    version: Some(next_version(None)),
                    attributes,
                    references: options.references,
                };
                vacant.insert(object.clone());
                debug!(object_type, id = %object.id, "saved object created");
                Ok(object)
            }
        }
    }

    async fn get(&self, object_type: &str, id: &str) -> Result<SavedObject, SavedObjectsError> {
        self.objects
            .get(&(object_type.to_string(), id.to_string()))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| SavedObjectsError::not_found(object_type, id))
    }

    async fn update(
        &self,
        object_type: &str,
        id: &str,
        attributes: SavedObjectAttributes,
        options: UpdateOptions,
    ) -> Result<SavedObject, SavedObjectsError> {
        let mut entry = self
            .objects
            .get_mut(&(object_type.to_string(), id.to_string()))
            .ok_or_else(|| SavedObjectsError::not_found(object_type, id))?;

        if let Some(expected) = options.version.as_deref() {
            if entry.version.as_deref() != Some(expected) {
                return Err(SavedObjectsError::conflict(object_type, id));
            }
        }

        let object = entry.value_mut();
        object.version = Some(next_version(object.version.as_deref()));
        object.attributes = attributes;
        if let Some(references) = options.references {
            object.references = references;
        }
        debug!(object_type, id, version = ?object.version, "saved object updated");
        Ok(object.clone())
    }

    async fn delete(&self, object_type: &str, id: &str) -> Result<(), SavedObjectsError> {
        self.objects
            .remove(&(object_type.to_string(), id.to_string()))
            .map(|_| ())
            .ok_or_else(|| SavedObjectsError::not_found(object_type, id))
    }

    async fn find(&self, object_type: &str) -> Result<Vec<SavedObject>, SavedObjectsError> {
        let mut found: Vec<SavedObject> = self
            .objects
            .iter()
            .filter(|entry| entry.key().0 == object_type)
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }
}
