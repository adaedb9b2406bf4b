//! Remote tree reconstruction.
//!
//! The registry returns a flat list of records, each pointing at its
//! containing folder by id. [`RemoteTree::reconstruct`] turns that list into a
//! map keyed by full logical path, the same key the scanner produces.
//!
//! Parent walks are bounded by the number of records, so a corrupted parent
//! chain is reported as [`IntegrityError::ParentCycle`] instead of looping.

use crate::error::IntegrityError;
use std::collections::btree_map;
use std::collections::{BTreeMap, HashMap};
use tilesync_types::path;
use tilesync_types::{RemoteEntry, RemoteId};
use tracing::debug;

/// Remote records keyed by reconstructed path.
///
/// Append-only during a run: records created by the executor are added with
/// [`record`](Self::record) so their children can resolve them as parents.
#[derive(Debug, Clone, Default)]
pub struct RemoteTree {
    by_path: BTreeMap<String, RemoteEntry>,
}

impl RemoteTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconstructs full paths for every record.
    ///
    /// # Errors
    ///
    /// Fails on duplicate ids, invalid names, dangling parents, parent cycles
    /// and on two records resolving to the same path. Each error names the
    /// offending records.
    pub fn reconstruct(entries: Vec<RemoteEntry>) -> Result<Self, IntegrityError> {
        let paths = {
            let mut by_id: HashMap<&RemoteId, &RemoteEntry> = HashMap::with_capacity(entries.len());
            for entry in &entries {
                path::validate_name(&entry.name).map_err(|_| IntegrityError::InvalidName {
                    id: entry.id.clone(),
                    name: entry.name.clone(),
                })?;
                if by_id.insert(&entry.id, entry).is_some() {
                    return Err(IntegrityError::DuplicateId(entry.id.clone()));
                }
            }

            let bound = entries.len();
            entries
                .iter()
                .map(|entry| full_path(entry, &by_id, bound))
                .collect::<Result<Vec<_>, _>>()?
        };

        let mut tree = Self::new();
        for (path, entry) in paths.into_iter().zip(entries) {
            tree.record(path, entry)?;
        }

        debug!("Reconstructed remote tree with {} records", tree.len());
        Ok(tree)
    }

    /// Adds a record under `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrityError::PathCollision`] if the path is already taken.
    pub fn record(&mut self, path: String, entry: RemoteEntry) -> Result<(), IntegrityError> {
        match self.by_path.entry(path) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(())
            }
            btree_map::Entry::Occupied(slot) => Err(IntegrityError::PathCollision {
                path: slot.key().clone(),
                first: slot.get().id.clone(),
                second: entry.id,
            }),
        }
    }

    /// Returns the record at `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&RemoteEntry> {
        self.by_path.get(path)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Iterates `(path, record)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RemoteEntry)> {
        self.by_path.iter().map(|(path, entry)| (path.as_str(), entry))
    }
}

fn full_path(
    entry: &RemoteEntry,
    by_id: &HashMap<&RemoteId, &RemoteEntry>,
    bound: usize,
) -> Result<String, IntegrityError> {
    let mut segments = vec![entry.name.as_str()];
    let mut current = entry;
    let mut steps = 0;

    while let Some(parent_id) = &current.parent_id {
        steps += 1;
        if steps > bound {
            return Err(IntegrityError::ParentCycle {
                id: entry.id.clone(),
                bound,
            });
        }

        let parent = by_id
            .get(parent_id)
            .copied()
            .ok_or_else(|| IntegrityError::MissingParent {
                id: current.id.clone(),
                parent_id: parent_id.clone(),
            })?;
        segments.push(parent.name.as_str());
        current = parent;
    }

    segments.iter().rev().try_fold(String::new(), |parent, name| {
        path::join(&parent, name).map_err(|_| IntegrityError::InvalidName {
            id: entry.id.clone(),
            name: (*name).to_string(),
        })
    })
}
