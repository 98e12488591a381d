//! Index pattern persistence service
//!
//! Owns the capabilities every pattern needs (saved objects client, format
//! registry, construction config) and persists in-memory mutations.

use crate::error::IndexPatternError;
use crate::formats::FieldFormatsRegistry;
use crate::index_pattern::{IndexPattern, IndexPatternsConfig};
use crate::spec::IndexPatternSpec;
use crate::INDEX_PATTERN_SAVED_OBJECT_TYPE;
use dash_saved_objects::{CreateOptions, SavedObjectsClient, UpdateOptions};
use std::sync::Arc;
use tracing::{debug, warn};

/// Creates, loads and saves index patterns
#[derive(Clone)]
pub struct IndexPatternsService {
    saved_objects: Arc<dyn SavedObjectsClient>,
    field_formats: Arc<dyn FieldFormatsRegistry>,
    config: IndexPatternsConfig,
}

impl std::fmt::Debug for IndexPatternsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexPatternsService")
            .field("field_formats", &self.field_formats)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl IndexPatternsService {
    /// Create service from its capabilities
    #[must_use]
    pub fn new(
        saved_objects: Arc<dyn SavedObjectsClient>,
        field_formats: Arc<dyn FieldFormatsRegistry>,
        config: IndexPatternsConfig,
    ) -> Self {
        Self {
            saved_objects,
            field_formats,
            config,
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &IndexPatternsConfig {
        &self.config
    }

    /// Build an unsaved pattern from a spec
    ///
    /// # Errors
    /// See [`IndexPattern::from_spec`]
    pub fn create(&self, spec: IndexPatternSpec) -> Result<IndexPattern, IndexPatternError> {
        IndexPattern::from_spec(spec, Arc::clone(&self.field_formats), &self.config)
    }

    /// Build a pattern and persist it as a new saved object
    pub async fn create_and_save(
        &self,
        spec: IndexPatternSpec,
        overwrite: bool,
    ) -> Result<IndexPattern, IndexPatternError> {
        let mut pattern = self.create(spec)?;
        self.create_saved_object(&mut pattern, overwrite).await?;
        Ok(pattern)
    }

    /// Persist a pattern as a new saved object, adopting the stored id and version
    pub async fn create_saved_object(
        &self,
        pattern: &mut IndexPattern,
        overwrite: bool,
    ) -> Result<(), IndexPatternError> {
        let mut options = CreateOptions::default()
            .with_overwrite(overwrite)
            .with_references(pattern.get_save_object_reference());
        if let Some(id) = pattern.id() {
            options = options.with_id(id);
        }

        let saved = self
            .saved_objects
            .create(
                INDEX_PATTERN_SAVED_OBJECT_TYPE,
                pattern.get_as_saved_object_body()?,
                options,
            )
            .await?;

        pattern.set_id(saved.id);
        pattern.set_version(saved.version);
        debug!(id = pattern.id(), title = pattern.title(), "index pattern created");
        Ok(())
    }

    /// Load a pattern by id
    pub async fn get(&self, id: &str) -> Result<IndexPattern, IndexPatternError> {
        let object = self
            .saved_objects
            .get(INDEX_PATTERN_SAVED_OBJECT_TYPE, id)
            .await?;
        IndexPattern::from_saved_object(&object, Arc::clone(&self.field_formats), &self.config)
    }

    /// Ids of every stored pattern
    pub async fn get_ids(&self) -> Result<Vec<String>, IndexPatternError> {
        let objects = self
            .saved_objects
            .find(INDEX_PATTERN_SAVED_OBJECT_TYPE)
            .await?;
        Ok(objects.into_iter().map(|o| o.id).collect())
    }

    /// Save the current state of a pattern over its saved object
    ///
    /// # Errors
    /// `MissingId` for unsaved patterns; `Conflict` (wrapped) when the stored
    /// version moved on
    pub async fn update_saved_object(
        &self,
        pattern: &mut IndexPattern,
    ) -> Result<(), IndexPatternError> {
        let id = pattern.id().ok_or(IndexPatternError::MissingId)?.to_string();
        let options = UpdateOptions {
            version: pattern.version().map(str::to_string),
            references: Some(pattern.get_save_object_reference()),
        };

        let saved = self
            .saved_objects
            .update(
                INDEX_PATTERN_SAVED_OBJECT_TYPE,
                &id,
                pattern.get_as_saved_object_body()?,
                options,
            )
            .await?;

        pattern.set_version(saved.version);
        debug!(id = %id, version = pattern.version(), "index pattern saved");
        Ok(())
    }

    /// Add a scripted field and persist; rolled back if the save fails
    pub async fn add_scripted_field(
        &self,
        pattern: &mut IndexPattern,
        name: &str,
        script: &str,
        field_type: &str,
    ) -> Result<(), IndexPatternError> {
        pattern.add_scripted_field(name, script, field_type)?;

        if let Err(err) = self.update_saved_object(pattern).await {
            warn!(field = name, error = %err, "saving scripted field failed, rolling back");
            pattern.remove_scripted_field(name);
            return Err(err);
        }
        Ok(())
    }

    /// Remove a scripted field and persist; restored if the save fails,
    /// absent names save nothing
    pub async fn remove_scripted_field(
        &self,
        pattern: &mut IndexPattern,
        name: &str,
    ) -> Result<bool, IndexPatternError> {
        let Some(removed) = pattern.take_scripted_field(name) else {
            return Ok(false);
        };

        if let Err(err) = self.update_saved_object(pattern).await {
            warn!(field = name, error = %err, "saving field removal failed, restoring");
            pattern.restore_field(removed);
            return Err(err);
        }
        Ok(true)
    }

    /// Delete a stored pattern
    pub async fn delete(&self, id: &str) -> Result<(), IndexPatternError> {
        self.saved_objects
            .delete(INDEX_PATTERN_SAVED_OBJECT_TYPE, id)
            .await?;
        debug!(id, "index pattern deleted");
        Ok(())
    }
}
