//! Local and remote entry types.

use crate::ids::RemoteId;
use crate::path;
use serde::{Deserialize, Serialize};

/// One filesystem object found beneath a scan root.
///
/// `relative_path` is unique within one scan and is the key the engine uses
/// to match the entry against the remote tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalEntry {
    /// Root-relative, `/`-separated path.
    pub relative_path: String,
    /// Last path segment.
    pub name: String,
    /// Whether the entry is a directory.
    pub is_folder: bool,
    /// Relative path of the associated sidecar index file, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_path: Option<String>,
}

impl LocalEntry {
    /// Creates a folder entry.
    #[must_use]
    pub fn folder(relative_path: impl Into<String>) -> Self {
        Self::new(relative_path.into(), true)
    }

    /// Creates a data file entry with no index association.
    #[must_use]
    pub fn file(relative_path: impl Into<String>) -> Self {
        Self::new(relative_path.into(), false)
    }

    fn new(relative_path: String, is_folder: bool) -> Self {
        let name = path::file_name(&relative_path).to_string();
        Self {
            relative_path,
            name,
            is_folder,
            index_path: None,
        }
    }

    /// Sets the associated index path.
    #[must_use]
    pub fn with_index(mut self, index_path: impl Into<String>) -> Self {
        self.index_path = Some(index_path.into());
        self
    }

    /// Returns the path of the containing folder, or `None` at root level.
    #[must_use]
    pub fn parent_path(&self) -> Option<&str> {
        path::parent(&self.relative_path)
    }

    /// Returns the number of path segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        path::depth(&self.relative_path)
    }
}

/// One record held by the remote registry.
///
/// Names are unique only within their parent folder; the full path is derived
/// by walking `parent_id` links up to a root-level record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Registry-issued identifier.
    pub id: RemoteId,
    /// Display name within the parent folder.
    pub name: String,
    /// Containing folder, absent for root-level records.
    #[serde(default)]
    pub parent_id: Option<RemoteId>,
    /// Index association as recorded by the registry.
    #[serde(default)]
    pub index_path: Option<String>,
    /// Whether the record is a folder.
    #[serde(default)]
    pub is_folder: bool,
}

impl RemoteEntry {
    /// Creates a folder record.
    #[must_use]
    pub fn folder(id: RemoteId, name: impl Into<String>, parent_id: Option<RemoteId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id,
            index_path: None,
            is_folder: true,
        }
    }

    /// Creates a data file record.
    #[must_use]
    pub fn file(
        id: RemoteId,
        name: impl Into<String>,
        parent_id: Option<RemoteId>,
        index_path: Option<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id,
            index_path,
            is_folder: false,
        }
    }

    /// Returns true if the record sits at the registry root.
    #[must_use]
    pub fn is_root_level(&self) -> bool {
        self.parent_id.is_none()
    }
}
