//! Engine configuration.

use crate::error::{SyncError, SyncResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the reserved metadata directory at the scan root.
pub const DEFAULT_METADATA_DIR: &str = ".tilesync";

/// Name of the configuration file inside the metadata directory.
pub const CONFIG_FILE_NAME: &str = "sync.json";

/// How a recognized sidecar is treated once it has been associated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexRole {
    /// Consumed as a sidecar, never surfaced as a dataset.
    IndexOnly,
    /// Associated with its primary and also kept as a dataset.
    DualPurpose,
}

/// One entry of the sidecar suffix table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSuffix {
    /// Extension without the leading dot (e.g. `bai`).
    pub extension: String,
    pub role: IndexRole,
}

impl IndexSuffix {
    pub fn index_only(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            role: IndexRole::IndexOnly,
        }
    }

    pub fn dual_purpose(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            role: IndexRole::DualPurpose,
        }
    }
}

/// Configuration for the reconciliation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Reserved directory directly under the scan root, never synced.
    pub metadata_dir: String,
    /// Follow symbolic links while scanning.
    pub follow_links: bool,
    /// Sidecar suffixes, checked in order.
    pub index_suffixes: Vec<IndexSuffix>,
    /// License token file name inside the metadata directory.
    pub license_file: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            metadata_dir: DEFAULT_METADATA_DIR.to_string(),
            follow_links: true,
            index_suffixes: vec![
                IndexSuffix::index_only("bai"),
                IndexSuffix::index_only("tbi"),
                IndexSuffix::dual_purpose("fai"),
            ],
            license_file: "license.jwt".to_string(),
        }
    }
}

impl SyncConfig {
    /// Reads a JSON configuration file. Missing fields take defaults.
    pub fn load(path: &Path) -> SyncResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SyncError::Config(format!("failed to read {}: {e}", path.display())))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Reads `<root>/.tilesync/sync.json` if present, else returns defaults.
    ///
    /// The file lives inside `.tilesync`, so it may not move the metadata
    /// directory elsewhere; doing so would sync the file itself as data.
    pub fn load_or_default(root: &Path) -> SyncResult<Self> {
        let path = root.join(DEFAULT_METADATA_DIR).join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let config = Self::load(&path)?;
        if config.metadata_dir != DEFAULT_METADATA_DIR {
            return Err(SyncError::Config(format!(
                "{} sets metadata_dir to {:?}; it must stay {DEFAULT_METADATA_DIR:?}",
                path.display(),
                config.metadata_dir
            )));
        }
        Ok(config)
    }

    /// Returns the license file location for a scan root.
    #[must_use]
    pub fn license_path(&self, root: &Path) -> PathBuf {
        root.join(&self.metadata_dir).join(&self.license_file)
    }
}
