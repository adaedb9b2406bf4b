//! Shared test helpers for reconciliation tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tilesync_license::{License, LicenseTier, StaticLicense};
use tilesync_registry::{NewFile, RegistryClient, RegistryError, RegistryResult, Transfer};
use tilesync_sync::{SyncConfig, SyncEngine};
use tilesync_types::{ProjectId, RemoteEntry, RemoteId};

/// Installs a test-writer subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ── Filesystem fixtures ─────────────────────────────────────────

/// Creates an empty file (and its parent directories) under `root`.
pub fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, relative.as_bytes()).unwrap();
    path
}

/// Creates a directory (and its parents) under `root`.
pub fn mkdir(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(&path).unwrap();
    path
}

// ── In-memory registry ──────────────────────────────────────────

/// One call received by [`InMemoryRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FindOrCreateProject(String),
    ListEntries(ProjectId),
    CreateFolder {
        name: String,
        parent_id: Option<RemoteId>,
    },
    CreateFile(NewFile),
    UpdateIndex {
        id: RemoteId,
        index_path: Option<String>,
    },
    Delete(RemoteId),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreateFolder { .. }
                | Self::CreateFile(_)
                | Self::UpdateIndex { .. }
                | Self::Delete(_)
        )
    }
}

#[derive(Default)]
struct State {
    records: Vec<RemoteEntry>,
    calls: Vec<Call>,
    fail_on_name: Option<String>,
    offline: bool,
}

/// Registry double holding records in memory and logging every call.
///
/// Creates are validated like a real registry would: a parent must exist
/// and be a folder.
#[derive(Default)]
pub struct InMemoryRegistry {
    state: Mutex<State>,
}

pub const PROJECT_ID: &str = "project-1";

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<RemoteEntry>) -> Self {
        let registry = Self::new();
        registry.state.lock().unwrap().records = records;
        registry
    }

    /// Makes creates of the named entry fail with a validation error.
    pub fn fail_on_create(&self, name: &str) {
        self.state.lock().unwrap().fail_on_name = Some(name.to_string());
    }

    /// Makes every call fail with a connectivity error.
    pub fn go_offline(&self) {
        self.state.lock().unwrap().offline = true;
    }

    pub fn records(&self) -> Vec<RemoteEntry> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Returns the record with the given name, if exactly one exists.
    pub fn record_named(&self, name: &str) -> Option<RemoteEntry> {
        let state = self.state.lock().unwrap();
        let mut matches = state.records.iter().filter(|r| r.name == name);
        let found = matches.next().cloned();
        if matches.next().is_some() {
            return None;
        }
        found
    }

    fn begin(&self, call: Call) -> RegistryResult<std::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.offline {
            return Err(RegistryError::Connectivity("registry offline".to_string()));
        }
        Ok(state)
    }

    fn check_create(state: &State, name: &str, parent_id: Option<&RemoteId>) -> RegistryResult<()> {
        if state.fail_on_name.as_deref() == Some(name) {
            return Err(RegistryError::Validation(format!("refused {name}")));
        }
        if let Some(parent_id) = parent_id {
            match state.records.iter().find(|r| &r.id == parent_id) {
                Some(parent) if parent.is_folder => {}
                Some(_) => return Err(RegistryError::Validation(format!("{parent_id} is not a folder"))),
                None => return Err(RegistryError::NotFound(format!("parent {parent_id}"))),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RegistryClient for InMemoryRegistry {
    async fn find_or_create_project(&self, name: &str) -> RegistryResult<ProjectId> {
        self.begin(Call::FindOrCreateProject(name.to_string()))?;
        Ok(ProjectId::new(PROJECT_ID))
    }

    async fn list_entries(&self, project: &ProjectId) -> RegistryResult<Vec<RemoteEntry>> {
        let state = self.begin(Call::ListEntries(project.clone()))?;
        Ok(state.records.clone())
    }

    async fn create_folder(
        &self,
        _project: &ProjectId,
        name: &str,
        parent_id: Option<&RemoteId>,
    ) -> RegistryResult<RemoteEntry> {
        let mut state = self.begin(Call::CreateFolder {
            name: name.to_string(),
            parent_id: parent_id.cloned(),
        })?;
        Self::check_create(&state, name, parent_id)?;

        let entry = RemoteEntry::folder(RemoteId::generate(), name, parent_id.cloned());
        state.records.push(entry.clone());
        Ok(entry)
    }

    async fn create_file(
        &self,
        _project: &ProjectId,
        file: &NewFile,
    ) -> RegistryResult<RemoteEntry> {
        let mut state = self.begin(Call::CreateFile(file.clone()))?;
        Self::check_create(&state, &file.name, file.parent_id.as_ref())?;

        let entry = RemoteEntry::file(
            RemoteId::generate(),
            &file.name,
            file.parent_id.clone(),
            file.index_path.clone(),
        );
        state.records.push(entry.clone());
        Ok(entry)
    }

    async fn update_index(&self, id: &RemoteId, index_path: Option<&str>) -> RegistryResult<()> {
        let mut state = self.begin(Call::UpdateIndex {
            id: id.clone(),
            index_path: index_path.map(str::to_string),
        })?;
        let record = state
            .records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        record.index_path = index_path.map(str::to_string);
        Ok(())
    }

    async fn delete(&self, id: &RemoteId) -> RegistryResult<()> {
        let mut state = self.begin(Call::Delete(id.clone()))?;
        let before = state.records.len();
        state.records.retain(|r| &r.id != id);
        if state.records.len() == before {
            return Err(RegistryError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

// ── Transfer double ─────────────────────────────────────────────

/// Records uploaded paths and hands out `mem://` locations.
#[derive(Default)]
pub struct FakeTransfer {
    uploaded: Mutex<Vec<PathBuf>>,
    fail: bool,
}

impl FakeTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn uploaded(&self) -> Vec<PathBuf> {
        self.uploaded.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transfer for FakeTransfer {
    async fn upload(&self, local_path: &Path) -> RegistryResult<String> {
        if self.fail {
            return Err(RegistryError::Transfer(format!(
                "cannot upload {}",
                local_path.display()
            )));
        }
        let name = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        self.uploaded.lock().unwrap().push(local_path.to_path_buf());
        Ok(format!("mem://{name}"))
    }
}

// ── Engine construction ─────────────────────────────────────────

pub fn guest_with_allowance(allowance: u64) -> Arc<StaticLicense> {
    Arc::new(StaticLicense::new(License::guest().with_allowance(allowance)))
}

pub fn admin() -> Arc<StaticLicense> {
    Arc::new(StaticLicense::new(License::for_tier(LicenseTier::Admin, "root")))
}

pub fn engine(registry: &Arc<InMemoryRegistry>) -> SyncEngine {
    SyncEngine::new(SyncConfig::default(), registry.clone(), admin())
}
