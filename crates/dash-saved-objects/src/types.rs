//! Saved object wire types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute bag of a saved object
pub type SavedObjectAttributes = Map<String, Value>;

/// Named reference from one saved object to another
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SavedObjectReference {
    /// Reference name, unique within the referencing object
    pub name: String,
    /// Referenced object id
    pub id: String,
    /// Referenced object type
    #[serde(rename = "type")]
    pub object_type: String,
}

impl SavedObjectReference {
    /// Create reference
    #[inline]
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        object_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            object_type: object_type.into(),
        }
    }
}

/// A persisted, referenceable application entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedObject {
    /// Object id
    pub id: String,
    /// Object type (e.g. `index-pattern`)
    #[serde(rename = "type")]
    pub object_type: String,
    /// Optimistic concurrency token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Type-specific attributes
    #[serde(default)]
    pub attributes: SavedObjectAttributes,
    /// Outgoing references
    #[serde(default)]
    pub references: Vec<SavedObjectReference>,
}

impl SavedObject {
    /// Read a string attribute
    #[must_use]
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Find a reference by name
    #[must_use]
    pub fn reference(&self, name: &str) -> Option<&SavedObjectReference> {
        self.references.iter().find(|r| r.name == name)
    }
}
