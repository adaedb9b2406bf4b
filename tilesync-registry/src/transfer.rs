//! Transfer collaborator for upload mode.

use crate::error::RegistryResult;
use async_trait::async_trait;
use std::path::Path;

/// Moves a local file into storage the registry can address.
///
/// Chunking, multipart handling and progress reporting belong to the
/// implementation; the engine only needs the resulting location.
#[async_trait]
pub trait Transfer: Send + Sync {
    /// Uploads the file at `local_path` and returns its remote location.
    async fn upload(&self, local_path: &Path) -> RegistryResult<String>;
}
