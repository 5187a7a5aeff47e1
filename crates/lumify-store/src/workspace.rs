//! Workspace metadata as served by the workspace endpoint

use crate::types::{UserId, WorkspaceId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Access level of a user on a workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceAccess {
    /// No access
    None,
    /// Read only
    Read,
    /// Read and write
    Write,
}

/// User with access to a workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceUser {
    /// User id
    pub user_id: UserId,
    /// Access level
    pub access: WorkspaceAccess,
}

/// Canvas position of a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphPosition {
    /// Horizontal offset
    pub x: i64,
    /// Vertical offset
    pub y: i64,
}

/// Vertex placed on the workspace graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceVertex {
    /// Vertex id
    pub vertex_id: String,
    /// Position, absent until the vertex is laid out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_position: Option<GraphPosition>,
}

/// Workspace metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Workspace id
    pub workspace_id: WorkspaceId,
    /// Display title
    pub title: String,
    /// Creator, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
    /// Whether someone else shared this workspace with the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_shared_to_user: Option<bool>,
    /// Whether the user may write
    #[serde(default)]
    pub is_editable: bool,
    /// Users with access
    #[serde(default)]
    pub users: Vec<WorkspaceUser>,
    /// Vertices on the graph canvas
    #[serde(default)]
    pub vertices: Vec<WorkspaceVertex>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Workspace {
    /// Create empty workspace
    #[must_use]
    pub fn new(workspace_id: impl Into<WorkspaceId>, title: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            title: title.into(),
            created_by: None,
            is_shared_to_user: None,
            is_editable: true,
            users: Vec::new(),
            vertices: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Place a vertex on the canvas
    #[must_use]
    pub fn with_vertex(mut self, vertex_id: impl Into<String>, position: Option<GraphPosition>) -> Self {
        self.vertices.push(WorkspaceVertex {
            vertex_id: vertex_id.into(),
            graph_position: position,
        });
        self
    }

    /// Ids of the vertices on the canvas, in canvas order
    pub fn vertex_ids(&self) -> impl Iterator<Item = &str> {
        self.vertices.iter().map(|v| v.vertex_id.as_str())
    }
}
