//! Registry client abstraction.

use crate::error::RegistryResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tilesync_types::{ProjectId, RemoteEntry, RemoteId};

/// A data file record to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFile {
    /// Display name within the parent folder.
    pub name: String,
    /// Containing folder, `None` for root level.
    pub parent_id: Option<RemoteId>,
    /// Where the data lives: the local relative path in link mode, the
    /// uploaded location in upload mode.
    pub location: String,
    /// Root-relative path of the sidecar index, recorded as the association.
    pub index_path: Option<String>,
    /// Uploaded location of the sidecar index (upload mode only).
    pub index_location: Option<String>,
}

/// Remote registry interface.
///
/// Implementations must report unreachable or unauthenticated registries as
/// [`RegistryError::Connectivity`](crate::RegistryError::Connectivity) or
/// [`RegistryError::Auth`](crate::RegistryError::Auth), never as validation
/// or not-found errors.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Returns the project with the given name, creating it if needed.
    async fn find_or_create_project(&self, name: &str) -> RegistryResult<ProjectId>;

    /// Lists every record in the project.
    async fn list_entries(&self, project: &ProjectId) -> RegistryResult<Vec<RemoteEntry>>;

    /// Creates a folder record.
    async fn create_folder(
        &self,
        project: &ProjectId,
        name: &str,
        parent_id: Option<&RemoteId>,
    ) -> RegistryResult<RemoteEntry>;

    /// Creates a data file record.
    async fn create_file(&self, project: &ProjectId, file: &NewFile)
    -> RegistryResult<RemoteEntry>;

    /// Replaces the index association of a record.
    async fn update_index(&self, id: &RemoteId, index_path: Option<&str>) -> RegistryResult<()>;

    /// Deletes a record.
    async fn delete(&self, id: &RemoteId) -> RegistryResult<()>;
}
