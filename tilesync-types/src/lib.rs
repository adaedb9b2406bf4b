//! Core type definitions for tilesync.
//!
//! This crate defines the types shared by the scanner, the remote tree
//! reconstructor and the reconciliation engine:
//! - Remote record and project identifiers (opaque, registry-issued)
//! - Local entries (files and folders found under a scan root)
//! - Remote entries (records held by the registry, linked by parent ids)
//! - Logical path helpers (root-relative, `/`-separated)
//!
//! Local and remote entries are deliberately distinct types: a local entry is
//! keyed by its path, a remote entry by its id, and the two are only ever
//! matched through a reconstructed path.

mod entry;
mod ids;
pub mod path;

pub use entry::{LocalEntry, RemoteEntry};
pub use ids::{ProjectId, RemoteId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("identifier must not be empty")]
    EmptyIdentifier,

    #[error("invalid entry name: {0:?}")]
    InvalidName(String),
}
