// Dashboard API client
//
// Thin typed wrapper around reqwest for the local dashboard server. Every
// call is independent: no retries, no queueing. Callers decide how to
// surface failures (toast for mutations, empty results for searches).

mod error;
pub mod models;

#[cfg(test)]
mod tests;

pub use error::ApiError;
pub use models::{
    ArchivedChange, Change, ChangeId, DiagramResponse, DiagramSource, DocHit, GitStatus,
    MemoryRecord, Project, ProjectId, RagHit, StandaloneTask,
};

use crate::config::ApiConfig;
use models::SearchEnvelope;
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Error body shapes the server uses for non-2xx responses
#[derive(Debug, Deserialize, Default)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Cloneable handle to the dashboard API
///
/// `reqwest::Client` is reference-counted internally, so cloning is cheap and
/// each background task owns its own handle.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!("Dashboard API client for {}", base_url);

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments (each segment is percent-encoded)
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Turn non-2xx responses into `ApiError::Status`
    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let message = body
            .error
            .or(body.message)
            .unwrap_or_else(|| text.trim().to_string());

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::check(request.send().await?).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_empty(request: RequestBuilder) -> Result<(), ApiError> {
        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn search<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &str,
        limit: usize,
    ) -> Result<Vec<T>, ApiError> {
        let url = self.endpoint(segments)?;
        let request = self
            .client
            .get(url)
            .query(&[("query", query.to_string()), ("limit", limit.to_string())]);
        let envelope: SearchEnvelope<T> = Self::send_json(request).await?;
        Ok(envelope.results)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Projects
    // ─────────────────────────────────────────────────────────────────────

    /// Registered projects, in persisted order
    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        let url = self.endpoint(&["api", "projects"])?;
        Self::send_json(self.client.get(url)).await
    }

    pub async fn add_project(&self, path: &str) -> Result<Project, ApiError> {
        let url = self.endpoint(&["api", "projects"])?;
        let request = self
            .client
            .post(url)
            .json(&serde_json::json!({ "path": path }));
        Self::send_json(request).await
    }

    pub async fn remove_project(&self, project_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "projects", project_id])?;
        Self::send_empty(self.client.delete(url)).await
    }

    pub async fn activate_project(&self, project_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "projects", project_id, "activate"])?;
        Self::send_empty(self.client.post(url)).await
    }

    /// Persist the full project ordering
    pub async fn reorder_projects(&self, order: &[ProjectId]) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "projects", "order"])?;
        let request = self
            .client
            .put(url)
            .json(&serde_json::json!({ "projectIds": order }));
        Self::send_empty(request).await
    }

    pub async fn update_project_path(
        &self,
        project_id: &str,
        path: &str,
    ) -> Result<Project, ApiError> {
        let url = self.endpoint(&["api", "projects", project_id])?;
        let request = self
            .client
            .patch(url)
            .json(&serde_json::json!({ "path": path }));
        Self::send_json(request).await
    }

    pub async fn standalone_tasks(&self, project_id: &str) -> Result<Vec<StandaloneTask>, ApiError> {
        let url = self.endpoint(&["api", "projects", project_id, "tasks"])?;
        Self::send_json(self.client.get(url)).await
    }

    pub async fn archived_changes(&self, project_id: &str) -> Result<Vec<ArchivedChange>, ApiError> {
        let url = self.endpoint(&["api", "projects", project_id, "archived"])?;
        Self::send_json(self.client.get(url)).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────

    pub async fn search_docs(&self, query: &str, limit: usize) -> Result<Vec<DocHit>, ApiError> {
        self.search(&["api", "docs", "global-search"], query, limit)
            .await
    }

    pub async fn search_semantic(&self, query: &str, limit: usize) -> Result<Vec<RagHit>, ApiError> {
        self.search(&["api", "rag", "search"], query, limit).await
    }

    pub async fn search_memory(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, ApiError> {
        self.search(&["api", "memory", "search"], query, limit).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Git and diagrams
    // ─────────────────────────────────────────────────────────────────────

    pub async fn git_status(&self, project_id: &str) -> Result<GitStatus, ApiError> {
        let url = self.endpoint(&["api", "git", "status"])?;
        let request = self.client.get(url).query(&[("projectId", project_id)]);
        Self::send_json(request).await
    }

    /// `git pull` in the project's working tree
    pub async fn pull_project(&self, project_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "projects", project_id, "pull"])?;
        Self::send_empty(self.client.post(url)).await
    }

    pub async fn generate_diagram(&self, project_path: &str) -> Result<DiagramResponse, ApiError> {
        let url = self.endpoint(&["api", "diagram", "generate"])?;
        let request = self
            .client
            .post(url)
            .json(&serde_json::json!({ "projectPath": project_path }));
        Self::send_json(request).await
    }
}
