//! Dash Saved Objects
//!
//! Persistence boundary for saved objects (index patterns, visualizations,
//! dashboards).
//!
//! # Overview
//!
//! - [`SavedObjectsClient`]: capability trait injected into services that persist state
//! - [`InMemorySavedObjectsClient`]: concurrent in-process implementation
//! - [`SavedObjectReference`]: named link from one saved object to another
//! - [`import_file`]: multipart import request against the import endpoint
//!
//! # Example
//!
//! ```rust,ignore
//! use dash_saved_objects::{CreateOptions, InMemorySavedObjectsClient, SavedObjectsClient};
//!
//! let client = InMemorySavedObjectsClient::new();
//! let created = client
//!     .create("index-pattern", attributes, CreateOptions::default().with_id("logs"))
//!     .await?;
//! assert_eq!(created.version.as_deref(), Some("1"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod client;
pub mod error;
pub mod import;
pub mod types;

pub use client::{CreateOptions, InMemorySavedObjectsClient, SavedObjectsClient, UpdateOptions};
pub use error::SavedObjectsError;
pub use import::{
    import_file, HttpClient, ImportFile, ImportMode, ImportObjectError, ImportQuery, ImportRequest,
    ImportResponse, ReqwestHttpClient, IMPORT_PATH,
};
pub use types::{SavedObject, SavedObjectAttributes, SavedObjectReference};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
