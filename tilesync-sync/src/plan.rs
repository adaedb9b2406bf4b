//! Reconciliation planning.
//!
//! Both trees are keyed by logical path. Local paths with no remote record
//! become creates, matched paths whose index association differs become
//! index updates, and (only when asked) remote paths with no local entry
//! become deletes.

use crate::remote_tree::RemoteTree;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tilesync_types::path;
use tilesync_types::{LocalEntry, RemoteId};

/// A single registry mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SyncOp {
    /// Create a folder record at `path`.
    CreateFolder { path: String },
    /// Create a data file record at `path`.
    CreateFile {
        path: String,
        index_path: Option<String>,
    },
    /// Replace the index association of an existing record.
    UpdateIndex {
        id: RemoteId,
        path: String,
        index_path: Option<String>,
    },
    /// Delete a record with no local counterpart.
    Delete { id: RemoteId, path: String },
}

impl SyncOp {
    /// Returns the logical path the operation targets.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::CreateFolder { path }
            | Self::CreateFile { path, .. }
            | Self::UpdateIndex { path, .. }
            | Self::Delete { path, .. } => path,
        }
    }

    /// Returns a short operation name for logs and errors.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateFolder { .. } => "create_folder",
            Self::CreateFile { .. } => "create_file",
            Self::UpdateIndex { .. } => "update_index",
            Self::Delete { .. } => "delete",
        }
    }

    #[must_use]
    pub fn is_create(&self) -> bool {
        matches!(self, Self::CreateFolder { .. } | Self::CreateFile { .. })
    }
}

/// Ordered list of operations for one run.
///
/// Creates and updates come first in (depth, path) order, so every folder
/// precedes its children. Deletes follow, deepest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReconciliationPlan {
    ops: Vec<SyncOp>,
}

impl ReconciliationPlan {
    /// Diffs the local entries against the remote tree.
    #[must_use]
    pub fn build(local: &[LocalEntry], remote: &RemoteTree, delete_stale: bool) -> Self {
        let by_path: BTreeMap<&str, &LocalEntry> = local
            .iter()
            .map(|entry| (entry.relative_path.as_str(), entry))
            .collect();

        let mut ordered: Vec<&LocalEntry> = by_path.values().copied().collect();
        ordered.sort_by(|a, b| {
            (a.depth(), &a.relative_path).cmp(&(b.depth(), &b.relative_path))
        });

        let mut ops = Vec::new();
        for entry in ordered {
            match remote.get(&entry.relative_path) {
                Some(existing) if existing.index_path != entry.index_path => {
                    ops.push(SyncOp::UpdateIndex {
                        id: existing.id.clone(),
                        path: entry.relative_path.clone(),
                        index_path: entry.index_path.clone(),
                    });
                }
                Some(_) => {}
                None if entry.is_folder => ops.push(SyncOp::CreateFolder {
                    path: entry.relative_path.clone(),
                }),
                None => ops.push(SyncOp::CreateFile {
                    path: entry.relative_path.clone(),
                    index_path: entry.index_path.clone(),
                }),
            }
        }

        if delete_stale {
            let local_paths: HashSet<&str> = by_path.keys().copied().collect();
            let mut stale: Vec<(&str, &RemoteId)> = remote
                .iter()
                .filter(|(p, _)| !local_paths.contains(p))
                .map(|(p, entry)| (p, &entry.id))
                .collect();
            stale.sort_by(|(a, _), (b, _)| {
                path::depth(b).cmp(&path::depth(a)).then_with(|| a.cmp(b))
            });

            ops.extend(stale.into_iter().map(|(p, id)| SyncOp::Delete {
                id: id.clone(),
                path: p.to_string(),
            }));
        }

        Self { ops }
    }

    #[must_use]
    pub fn ops(&self) -> &[SyncOp] {
        &self.ops
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SyncOp> {
        self.ops.iter()
    }

    /// Number of create operations.
    #[must_use]
    pub fn creates(&self) -> usize {
        self.ops.iter().filter(|op| op.is_create()).count()
    }

    /// Number of index updates.
    #[must_use]
    pub fn updates(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SyncOp::UpdateIndex { .. }))
            .count()
    }

    /// Number of deletes.
    #[must_use]
    pub fn deletes(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SyncOp::Delete { .. }))
            .count()
    }
}

impl<'a> IntoIterator for &'a ReconciliationPlan {
    type Item = &'a SyncOp;
    type IntoIter = std::slice::Iter<'a, SyncOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
