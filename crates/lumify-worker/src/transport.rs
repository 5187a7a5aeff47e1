//! JSON transport to the Lumify server

use crate::config::WorkerConfig;
use crate::error::WorkerError;
use async_trait::async_trait;
use lumify_store::WorkspaceId;
use serde_json::Value;

/// Header carrying the workspace a request is scoped to
pub const WORKSPACE_HEADER: &str = "Lumify-Workspace-Id";

/// Source of raw JSON responses
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` scoped to `workspace_id`
    async fn get_json(&self, path: &str, workspace_id: &WorkspaceId) -> Result<Value, WorkerError>;
}

/// Transport over HTTP
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create transport from worker configuration
    ///
    /// # Errors
    /// `WorkerError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &WorkerConfig) -> Result<Self, WorkerError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Server root
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(level = "debug", skip(self, workspace_id), fields(workspace = %workspace_id))]
    async fn get_json(&self, path: &str, workspace_id: &WorkspaceId) -> Result<Value, WorkerError> {
        let response = self
            .client
            .get(self.url(path))
            .query(&[("workspaceId", workspace_id.as_str())])
            .header(WORKSPACE_HEADER, workspace_id.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), path, "request failed");
            return Err(WorkerError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_without_double_slashes() {
        let config = WorkerConfig::default().with_base_url("http://lumify.local:8080/");
        let transport = HttpTransport::new(&config).unwrap();

        assert_eq!(transport.base_url(), "http://lumify.local:8080");
        assert_eq!(transport.url("/workspace/edges"), "http://lumify.local:8080/workspace/edges");
        assert_eq!(transport.url("workspace"), "http://lumify.local:8080/workspace");
    }
}
