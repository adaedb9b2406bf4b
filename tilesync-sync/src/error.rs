//! Error types for the reconciliation engine.

use std::path::PathBuf;
use thiserror::Error;
use tilesync_license::LicenseError;
use tilesync_registry::RegistryError;
use tilesync_types::RemoteId;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// The local tree could not be read.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root is missing or unreadable.
    #[error("cannot read scan root {}: {source}", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scan root exists but is not a directory.
    #[error("scan root {} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// An entry beneath the root could not be read (permissions, symlink loop).
    #[error("failed to read {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A path cannot be expressed as a logical `/`-separated UTF-8 path.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8(PathBuf),
}

/// The remote records do not form a valid tree.
#[derive(Debug, Error)]
pub enum IntegrityError {
    /// The parent chain of a record did not terminate within the walk bound.
    #[error("parent chain of record {id} exceeds {bound} links")]
    ParentCycle { id: RemoteId, bound: usize },

    /// A record references a parent that is not in the listing.
    #[error("record {id} references unknown parent {parent_id}")]
    MissingParent { id: RemoteId, parent_id: RemoteId },

    /// Two records resolve to the same logical path.
    #[error("records {first} and {second} both resolve to {path}")]
    PathCollision {
        path: String,
        first: RemoteId,
        second: RemoteId,
    },

    /// Two records share an identifier.
    #[error("record id {0} appears more than once")]
    DuplicateId(RemoteId),

    /// A record name cannot be a path segment.
    #[error("record {id} has invalid name {name:?}")]
    InvalidName { id: RemoteId, name: String },
}

/// Errors that can occur during a reconciliation run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Local scan failed.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// Remote tree reconstruction failed.
    #[error("integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    /// License could not be obtained or the quota was exceeded.
    #[error("license error: {0}")]
    License(#[from] LicenseError),

    /// A registry call failed.
    #[error("{operation} failed for {path}: {source}")]
    Remote {
        operation: &'static str,
        path: String,
        #[source]
        source: RegistryError,
    },

    /// A create's parent path has no remote record.
    #[error("parent of {path} has no remote record")]
    UnresolvedParent { path: String },

    /// A create's parent path resolves to a data file.
    #[error("parent of {path} resolves to non-folder record {parent_id}")]
    ParentNotFolder { path: String, parent_id: RemoteId },

    /// Upload mode was selected without a transfer collaborator.
    #[error("upload mode requires a transfer collaborator")]
    TransferUnavailable,

    /// Invalid configuration or request.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SyncError {
    pub(crate) fn remote(operation: &'static str, path: impl Into<String>, source: RegistryError) -> Self {
        Self::Remote {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Returns true if re-running the whole reconciliation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Remote { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Returns true if the registry was unreachable or refused credentials.
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::Remote { source, .. } => source.is_connectivity(),
            _ => false,
        }
    }

    /// Returns true if the run was refused by the quota gate.
    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::License(LicenseError::QuotaExceeded { .. }))
    }
}
