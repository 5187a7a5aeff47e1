//! Workspace endpoints
//!
//! Responses are offered to the [`AjaxInterceptor`] before being decoded, so
//! every vertex or edge the worker fetches lands in the store first.

use crate::error::WorkerError;
use crate::interceptor::AjaxInterceptor;
use crate::transport::Transport;
use async_trait::async_trait;
use lumify_store::{Edge, Vertex, Workspace, WorkspaceId};
use serde::Deserialize;
use serde_json::Value;

/// Workspace metadata endpoint
pub const WORKSPACE_PATH: &str = "/workspace";
/// Vertices on the workspace graph
pub const WORKSPACE_VERTICES_PATH: &str = "/workspace/vertices";
/// Edges between workspace vertices
pub const WORKSPACE_EDGES_PATH: &str = "/workspace/edges";

/// Workspace data fetches used by the switch handler
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    /// Workspace metadata
    async fn get(&self, workspace_id: &WorkspaceId) -> Result<Workspace, WorkerError>;

    /// Vertices of the workspace
    async fn vertices(&self, workspace_id: &WorkspaceId) -> Result<Vec<Vertex>, WorkerError>;

    /// Edges of the workspace
    async fn edges(&self, workspace_id: &WorkspaceId) -> Result<Vec<Edge>, WorkerError>;
}

#[derive(Deserialize)]
struct VerticesResponse {
    #[serde(default)]
    vertices: Vec<Vertex>,
}

#[derive(Deserialize)]
struct EdgesResponse {
    #[serde(default)]
    edges: Vec<Edge>,
}

/// [`WorkspaceApi`] over a JSON [`Transport`]
#[derive(Debug, Clone)]
pub struct WorkspaceService<T> {
    transport: T,
    interceptor: AjaxInterceptor,
}

impl<T: Transport> WorkspaceService<T> {
    /// Create service
    #[must_use]
    pub fn new(transport: T, interceptor: AjaxInterceptor) -> Self {
        Self {
            transport,
            interceptor,
        }
    }

    /// Underlying transport
    #[inline]
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn fetch(&self, path: &str, workspace_id: &WorkspaceId) -> Result<Value, WorkerError> {
        let response = self.transport.get_json(path, workspace_id).await?;
        self.interceptor.intercept(&response, workspace_id);
        Ok(response)
    }
}

#[async_trait]
impl<T: Transport> WorkspaceApi for WorkspaceService<T> {
    async fn get(&self, workspace_id: &WorkspaceId) -> Result<Workspace, WorkerError> {
        let response = self.fetch(WORKSPACE_PATH, workspace_id).await?;
        Ok(serde_json::from_value(response)?)
    }

    async fn vertices(&self, workspace_id: &WorkspaceId) -> Result<Vec<Vertex>, WorkerError> {
        let response = self.fetch(WORKSPACE_VERTICES_PATH, workspace_id).await?;
        let decoded: VerticesResponse = serde_json::from_value(response)?;
        Ok(decoded.vertices)
    }

    async fn edges(&self, workspace_id: &WorkspaceId) -> Result<Vec<Edge>, WorkerError> {
        let response = self.fetch(WORKSPACE_EDGES_PATH, workspace_id).await?;
        let decoded: EdgesResponse = serde_json::from_value(response)?;
        Ok(decoded.edges)
    }
}
