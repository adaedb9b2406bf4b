//! Reconciliation engine.
//!
//! One [`SyncEngine::run`] is a single sequential pass:
//! scan, quota gate, project lookup, remote listing, reconstruction, plan,
//! execute. Nothing mutates the registry before the quota gate has passed,
//! and the first failing operation halts the run. Already-applied operations
//! stand; re-running re-diffs and skips them.

use crate::config::SyncConfig;
use crate::error::{ScanError, SyncError, SyncResult};
use crate::plan::{ReconciliationPlan, SyncOp};
use crate::remote_tree::RemoteTree;
use crate::scan::scan;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tilesync_license::{check_quota, LicenseProvider};
use tilesync_registry::{NewFile, RegistryClient, Transfer};
use tilesync_types::path;
use tilesync_types::{ProjectId, RemoteId};
use tracing::{debug, info};

/// How data files are registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    /// Register the local path as a reference.
    #[default]
    Link,
    /// Upload file (and index) bytes first, register the remote location.
    Upload,
}

/// Per-run options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncOptions {
    /// Delete remote records with no local counterpart.
    pub delete_stale: bool,
    pub mode: TransferMode,
    /// Compute the plan without applying it.
    pub dry_run: bool,
}

/// "Synchronize directory X into project Y".
#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub directory: PathBuf,
    /// Project name; defaults to the directory's base name.
    pub project: Option<String>,
    pub options: SyncOptions,
}

impl SyncRequest {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            project: None,
            options: SyncOptions::default(),
        }
    }

    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub project: ProjectId,
    /// Entries produced by the scan.
    pub local_entries: usize,
    /// Records listed before any mutation.
    pub remote_entries: usize,
    pub plan: ReconciliationPlan,
    pub folders_created: usize,
    pub files_created: usize,
    pub indexes_updated: usize,
    pub deleted: usize,
    pub dry_run: bool,
}

impl SyncReport {
    fn new(project: ProjectId, local_entries: usize, remote_entries: usize, plan: ReconciliationPlan, dry_run: bool) -> Self {
        Self {
            project,
            local_entries,
            remote_entries,
            plan,
            folders_created: 0,
            files_created: 0,
            indexes_updated: 0,
            deleted: 0,
            dry_run,
        }
    }

    /// Number of registry mutations actually issued.
    #[must_use]
    pub fn operations_applied(&self) -> usize {
        self.folders_created + self.files_created + self.indexes_updated + self.deleted
    }
}

/// Converges a registry project toward a local directory.
pub struct SyncEngine {
    config: SyncConfig,
    registry: Arc<dyn RegistryClient>,
    license: Arc<dyn LicenseProvider>,
    transfer: Option<Arc<dyn Transfer>>,
}

impl SyncEngine {
    /// Creates an engine in link mode (no transfer collaborator).
    pub fn new(
        config: SyncConfig,
        registry: Arc<dyn RegistryClient>,
        license: Arc<dyn LicenseProvider>,
    ) -> Self {
        Self {
            config,
            registry,
            license,
            transfer: None,
        }
    }

    /// Sets the transfer collaborator used in upload mode.
    #[must_use]
    pub fn with_transfer(mut self, transfer: Arc<dyn Transfer>) -> Self {
        self.transfer = Some(transfer);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Runs one reconciliation pass.
    ///
    /// # Errors
    ///
    /// Scan, integrity, license and quota errors abort before any mutating
    /// call. A failing registry call halts the remaining plan.
    pub async fn run(&self, request: &SyncRequest) -> SyncResult<SyncReport> {
        let options = &request.options;
        if options.mode == TransferMode::Upload && self.transfer.is_none() && !options.dry_run {
            return Err(SyncError::TransferUnavailable);
        }

        let root = request
            .directory
            .canonicalize()
            .map_err(|source| ScanError::Root {
                path: request.directory.clone(),
                source,
            })?;

        let local = scan(&root, &self.config)?;

        let license = self.license.get_license()?;
        check_quota(local.len(), &license)?;

        let project_name = match &request.project {
            Some(name) => name.clone(),
            None => project_name_for(&root)?,
        };
        let project = self
            .registry
            .find_or_create_project(&project_name)
            .await
            .map_err(|e| SyncError::remote("find_or_create_project", &project_name, e))?;

        let records = self
            .registry
            .list_entries(&project)
            .await
            .map_err(|e| SyncError::remote("list_entries", &project_name, e))?;
        let remote_entries = records.len();
        let mut tree = RemoteTree::reconstruct(records)?;

        let plan = ReconciliationPlan::build(&local, &tree, options.delete_stale);
        info!(
            "Planned {} operations for {} ({} creates, {} updates, {} deletes)",
            plan.len(),
            project_name,
            plan.creates(),
            plan.updates(),
            plan.deletes()
        );

        let mut report = SyncReport::new(project, local.len(), remote_entries, plan, options.dry_run);
        if options.dry_run {
            return Ok(report);
        }

        for op in report.plan.ops() {
            self.apply(op, &root, options.mode, &report.project, &mut tree)
                .await?;
            match op {
                SyncOp::CreateFolder { .. } => report.folders_created += 1,
                SyncOp::CreateFile { .. } => report.files_created += 1,
                SyncOp::UpdateIndex { .. } => report.indexes_updated += 1,
                SyncOp::Delete { .. } => report.deleted += 1,
            }
        }

        info!(
            "Synced {} into {}: {} operations applied",
            root.display(),
            project_name,
            report.operations_applied()
        );
        Ok(report)
    }

    async fn apply(
        &self,
        op: &SyncOp,
        root: &Path,
        mode: TransferMode,
        project: &ProjectId,
        tree: &mut RemoteTree,
    ) -> SyncResult<()> {
        match op {
            SyncOp::CreateFolder { path } => {
                let parent_id = resolve_parent(tree, path)?;
                let entry = self
                    .registry
                    .create_folder(project, path::file_name(path), parent_id.as_ref())
                    .await
                    .map_err(|e| SyncError::remote(op.kind(), path, e))?;
                debug!("Created folder {} ({})", path, entry.id);
                tree.record(path.clone(), entry)?;
            }
            SyncOp::CreateFile { path, index_path } => {
                let parent_id = resolve_parent(tree, path)?;
                let (location, index_location) = match mode {
                    TransferMode::Link => (path.clone(), None),
                    TransferMode::Upload => self.upload(root, path, index_path.as_deref()).await?,
                };
                let file = NewFile {
                    name: path::file_name(path).to_string(),
                    parent_id,
                    location,
                    index_path: index_path.clone(),
                    index_location,
                };
                let entry = self
                    .registry
                    .create_file(project, &file)
                    .await
                    .map_err(|e| SyncError::remote(op.kind(), path, e))?;
                debug!("Created file {} ({})", path, entry.id);
                tree.record(path.clone(), entry)?;
            }
            SyncOp::UpdateIndex {
                id,
                path,
                index_path,
            } => {
                self.registry
                    .update_index(id, index_path.as_deref())
                    .await
                    .map_err(|e| SyncError::remote(op.kind(), path, e))?;
                debug!("Updated index of {} to {:?}", path, index_path);
            }
            SyncOp::Delete { id, path } => {
                self.registry
                    .delete(id)
                    .await
                    .map_err(|e| SyncError::remote(op.kind(), path, e))?;
                debug!("Deleted {} ({})", path, id);
            }
        }
        Ok(())
    }

    /// Uploads a data file and its index, returning both locations.
    async fn upload(
        &self,
        root: &Path,
        path: &str,
        index_path: Option<&str>,
    ) -> SyncResult<(String, Option<String>)> {
        let transfer = self.transfer.as_ref().ok_or(SyncError::TransferUnavailable)?;

        let location = transfer
            .upload(&root.join(path))
            .await
            .map_err(|e| SyncError::remote("upload", path, e))?;

        let index_location = match index_path {
            Some(index_path) => Some(
                transfer
                    .upload(&root.join(index_path))
                    .await
                    .map_err(|e| SyncError::remote("upload", index_path, e))?,
            ),
            None => None,
        };

        Ok((location, index_location))
    }
}

/// Resolves the id of the folder that will contain `path`.
fn resolve_parent(tree: &RemoteTree, path: &str) -> SyncResult<Option<RemoteId>> {
    let Some(parent_path) = path::parent(path) else {
        return Ok(None);
    };

    let parent = tree
        .get(parent_path)
        .ok_or_else(|| SyncError::UnresolvedParent {
            path: path.to_string(),
        })?;
    if !parent.is_folder {
        return Err(SyncError::ParentNotFolder {
            path: path.to_string(),
            parent_id: parent.id.clone(),
        });
    }
    Ok(Some(parent.id.clone()))
}

fn project_name_for(root: &Path) -> SyncResult<String> {
    root.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            SyncError::Config(format!(
                "cannot derive a project name from {}",
                root.display()
            ))
        })
}
