//! Local tree scanner.
//!
//! Walks a root directory and produces one [`LocalEntry`] per file and folder
//! beneath it, keyed by root-relative `/`-separated path. The reserved
//! metadata directory at the root is skipped together with its subtree.
//!
//! After the walk, recognized sidecar files are associated with their
//! primaries (`a.bam` + `a.bam.bai`). Index-only sidecars then disappear from
//! the listing; dual-purpose ones stay as datasets of their own.

use crate::config::{IndexRole, IndexSuffix, SyncConfig};
use crate::error::ScanError;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Component, Path};
use tilesync_types::path::SEPARATOR;
use tilesync_types::LocalEntry;
use tracing::debug;
use walkdir::WalkDir;

/// Scans `root` and returns its entries in walk order.
///
/// # Errors
///
/// Any unreadable entry aborts the scan; nothing is skipped silently.
pub fn scan(root: &Path, config: &SyncConfig) -> Result<Vec<LocalEntry>, ScanError> {
    let metadata = std::fs::metadata(root).map_err(|source| ScanError::Root {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let reserved = OsStr::new(&config.metadata_dir);
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(config.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && e.file_name() == reserved));

    let mut entries = Vec::new();
    for item in walker {
        let item = item.map_err(|source| ScanError::Walk {
            path: source
                .path()
                .map_or_else(|| root.to_path_buf(), Path::to_path_buf),
            source,
        })?;

        let relative = item
            .path()
            .strip_prefix(root)
            .ok()
            .and_then(logical_path)
            .ok_or_else(|| ScanError::NonUtf8(item.path().to_path_buf()))?;

        entries.push(if item.file_type().is_dir() {
            LocalEntry::folder(relative)
        } else {
            LocalEntry::file(relative)
        });
    }

    let walked = entries.len();
    let entries = associate_indexes(entries, &config.index_suffixes);
    debug!(
        "Scanned {}: {} entries ({} sidecars folded)",
        root.display(),
        entries.len(),
        walked - entries.len()
    );
    Ok(entries)
}

/// Associates sidecar files with their primaries.
///
/// For every file `p`, the first suffix `s` in table order for which `p.s` is
/// also a file becomes `p`'s `index_path`. Every sidecar matched through an
/// index-only suffix is then removed from the list, chosen or not.
#[must_use]
pub fn associate_indexes(mut entries: Vec<LocalEntry>, suffixes: &[IndexSuffix]) -> Vec<LocalEntry> {
    let files: HashSet<String> = entries
        .iter()
        .filter(|e| !e.is_folder)
        .map(|e| e.relative_path.clone())
        .collect();

    let mut consumed = HashSet::new();
    for entry in entries.iter_mut().filter(|e| !e.is_folder) {
        let mut chosen = None;
        for suffix in suffixes {
            let candidate = format!("{}.{}", entry.relative_path, suffix.extension);
            if !files.contains(&candidate) {
                continue;
            }
            if suffix.role == IndexRole::IndexOnly {
                consumed.insert(candidate.clone());
            }
            if chosen.is_none() {
                chosen = Some(candidate);
            }
        }
        if chosen.is_some() {
            entry.index_path = chosen;
        }
    }

    entries.retain(|e| !consumed.contains(&e.relative_path));
    entries
}

fn logical_path(relative: &Path) -> Option<String> {
    let mut logical = String::new();
    for component in relative.components() {
        let Component::Normal(segment) = component else {
            return None;
        };
        if !logical.is_empty() {
            logical.push(SEPARATOR);
        }
        logical.push_str(segment.to_str()?);
    }
    (!logical.is_empty()).then_some(logical)
}
