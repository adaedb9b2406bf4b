//! HTTP registry client.
//!
//! Talks to the registry's REST API. Datasets (folders and data files) are
//! addressed under `/api/v1/tilesets/`, projects under `/api/v1/projects/`.
//! Token acquisition is the caller's concern; a bearer token may be supplied
//! in the configuration.

use crate::client::{NewFile, RegistryClient};
use crate::error::{RegistryError, RegistryResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tilesync_types::{ProjectId, RemoteEntry, RemoteId};
use tracing::{debug, info};

/// HTTP registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpRegistryConfig {
    /// Base URL of the registry (e.g. `http://localhost:1807`).
    pub api_base_url: String,
    /// Bearer token sent with every request.
    pub access_token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum number of records fetched when listing a project.
    pub list_limit: usize,
    /// Whether newly created records are private.
    pub private: bool,
}

impl Default for HttpRegistryConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:1807".to_string(),
            access_token: None,
            timeout_secs: 60,
            list_limit: 10_000,
            private: false,
        }
    }
}

/// Paged list response.
#[derive(Debug, Deserialize)]
struct Page<T> {
    count: usize,
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ProjectRecord {
    uuid: String,
}

/// A dataset record as serialized by the registry.
#[derive(Debug, Deserialize)]
struct DatasetRecord {
    uuid: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    containing_folder: Option<String>,
    #[serde(default)]
    indexfile: Option<String>,
    #[serde(default)]
    is_folder: bool,
}

impl DatasetRecord {
    /// Converts to a [`RemoteEntry`]. `fallback_name` covers create responses
    /// that omit the name.
    fn into_entry(self, fallback_name: Option<&str>) -> RegistryResult<RemoteEntry> {
        let id = RemoteId::parse(&self.uuid)
            .map_err(|e| RegistryError::Validation(format!("record id: {e}")))?;
        let name = self
            .name
            .or_else(|| fallback_name.map(str::to_string))
            .ok_or_else(|| RegistryError::Validation(format!("record {id} has no name")))?;
        let parent_id = self
            .containing_folder
            .filter(|p| !p.is_empty())
            .map(RemoteId::new);

        Ok(RemoteEntry {
            id,
            name,
            parent_id,
            index_path: self.indexfile.filter(|p| !p.is_empty()),
            is_folder: self.is_folder,
        })
    }
}

/// [`RegistryClient`] over HTTP.
pub struct HttpRegistry {
    config: HttpRegistryConfig,
    client: Client,
}

impl HttpRegistry {
    /// Creates a new HTTP registry client.
    pub fn new(config: HttpRegistryConfig) -> RegistryResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RegistryError::Connectivity(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HttpRegistryConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn dispatch(&self, request: RequestBuilder, context: &str) -> RegistryResult<Response> {
        self.authorize(request)
            .send()
            .await
            .map_err(|e| RegistryError::Connectivity(format!("{context}: {e}")))
    }

    /// Sends a request and maps non-success statuses to errors.
    async fn send(&self, request: RequestBuilder, context: &str) -> RegistryResult<Response> {
        let response = self.dispatch(request, context).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(RegistryError::from_status(
            status.as_u16(),
            format!("{context}: {body}"),
        ))
    }

    async fn parse<T: DeserializeOwned>(response: Response, context: &str) -> RegistryResult<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RegistryError::Connectivity(format!("{context}: {e}")))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn find_project(&self, name: &str) -> RegistryResult<Option<ProjectId>> {
        let request = self
            .client
            .get(self.url("/api/v1/projects/"))
            .query(&[("pn", name)]);

        let response = match self.send(request, "project lookup").await {
            Ok(response) => response,
            Err(RegistryError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let page: Page<ProjectRecord> = Self::parse(response, "project lookup").await?;
        Ok(page.results.into_iter().next().map(|p| ProjectId::new(p.uuid)))
    }

    async fn create_project(&self, name: &str) -> RegistryResult<ProjectId> {
        let body = serde_json::json!({
            "name": name,
            "private": self.config.private,
            "tilesets": [],
        });
        let request = self.client.post(self.url("/api/v1/projects/")).json(&body);
        let response = self.dispatch(request, "project creation").await?;

        // 409 means someone else created it first; the body still names it.
        let status = response.status();
        if !status.is_success() && status != StatusCode::CONFLICT {
            let error = response.text().await.unwrap_or_default();
            return Err(RegistryError::from_status(
                status.as_u16(),
                format!("project creation: {error}"),
            ));
        }

        let project: ProjectRecord = Self::parse(response, "project creation").await?;
        info!("Created project: {} ({})", name, project.uuid);
        Ok(ProjectId::new(project.uuid))
    }

    async fn post_dataset(
        &self,
        body: serde_json::Value,
        name: &str,
        context: &str,
    ) -> RegistryResult<RemoteEntry> {
        let request = self.client.post(self.url("/api/v1/tilesets/")).json(&body);
        let response = self.send(request, context).await?;
        let record: DatasetRecord = Self::parse(response, context).await?;
        record.into_entry(Some(name))
    }
}

#[async_trait]
impl RegistryClient for HttpRegistry {
    async fn find_or_create_project(&self, name: &str) -> RegistryResult<ProjectId> {
        if let Some(project) = self.find_project(name).await? {
            debug!("Found project: {} ({})", name, project);
            return Ok(project);
        }
        self.create_project(name).await
    }

    async fn list_entries(&self, project: &ProjectId) -> RegistryResult<Vec<RemoteEntry>> {
        let limit = self.config.list_limit.to_string();
        let request = self
            .client
            .get(self.url("/api/v1/list_tilesets/"))
            .query(&[("ui", project.as_str()), ("limit", limit.as_str())]);

        let response = self.send(request, "dataset list").await?;
        let page: Page<DatasetRecord> = Self::parse(response, "dataset list").await?;

        if page.count > page.results.len() {
            return Err(RegistryError::Validation(format!(
                "project {project} holds {} records but only {} were returned",
                page.count,
                page.results.len()
            )));
        }

        let entries = page
            .results
            .into_iter()
            .map(|record| record.into_entry(None))
            .collect::<RegistryResult<Vec<_>>>()?;

        debug!("Listed {} records in project {}", entries.len(), project);
        Ok(entries)
    }

    async fn create_folder(
        &self,
        project: &ProjectId,
        name: &str,
        parent_id: Option<&RemoteId>,
    ) -> RegistryResult<RemoteEntry> {
        let body = serde_json::json!({
            "project": project.as_str(),
            "name": name,
            "is_folder": true,
            "containing_folder": parent_id.map(RemoteId::as_str),
            "private": self.config.private,
        });

        let entry = self.post_dataset(body, name, "folder creation").await?;
        info!("Created folder: {} (id: {})", name, entry.id);
        Ok(entry)
    }

    async fn create_file(
        &self,
        project: &ProjectId,
        file: &NewFile,
    ) -> RegistryResult<RemoteEntry> {
        let body = serde_json::json!({
            "project": project.as_str(),
            "name": file.name,
            "datafile": file.location,
            "indexfile": file.index_path,
            "index_location": file.index_location,
            "containing_folder": file.parent_id.as_ref().map(RemoteId::as_str),
            "private": self.config.private,
            "download": false,
            "tags": [],
        });

        let entry = self.post_dataset(body, &file.name, "dataset creation").await?;
        info!("Created dataset: {} (id: {})", file.name, entry.id);
        Ok(entry)
    }

    async fn update_index(&self, id: &RemoteId, index_path: Option<&str>) -> RegistryResult<()> {
        let body = serde_json::json!({ "indexfile": index_path });
        let request = self
            .client
            .patch(self.url(&format!("/api/v1/tilesets/{id}/")))
            .json(&body);

        self.send(request, "index update").await?;
        debug!("Updated index of {} to {:?}", id, index_path);
        Ok(())
    }

    async fn delete(&self, id: &RemoteId) -> RegistryResult<()> {
        let request = self
            .client
            .delete(self.url(&format!("/api/v1/tilesets/{id}/")));

        self.send(request, "dataset deletion").await?;
        info!("Deleted dataset: {}", id);
        Ok(())
    }
}
