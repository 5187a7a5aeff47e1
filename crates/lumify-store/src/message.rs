//! Messages posted from the worker to the UI thread
//!
//! Every message travels as `{ "type": <name>, "data": <payload> }`.

use crate::entity::{Edge, Vertex};
use crate::workspace::Workspace;
use serde::{Deserialize, Serialize};

/// Payload of `storeObjectsUpdated`
///
/// Exactly one of the two lists is set per message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectsUpdated {
    /// Updated vertices, in batch order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertices: Option<Vec<Vertex>>,
    /// Updated edges, in batch order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<Edge>>,
}

impl ObjectsUpdated {
    /// Vertex update
    #[inline]
    #[must_use]
    pub fn vertices(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices: Some(vertices),
            edges: None,
        }
    }

    /// Edge update
    #[inline]
    #[must_use]
    pub fn edges(edges: Vec<Edge>) -> Self {
        Self {
            vertices: None,
            edges: Some(edges),
        }
    }

    /// Number of updated entities
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.as_ref().map_or(0, Vec::len) + self.edges.as_ref().map_or(0, Vec::len)
    }

    /// Check if nothing was updated
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Worker → UI message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum MainMessage {
    /// Cached entities changed in the current workspace
    StoreObjectsUpdated(ObjectsUpdated),
    /// Workspace metadata and vertices are available
    WorkspaceLoaded {
        /// Workspace metadata
        workspace: Workspace,
        /// Vertices of the workspace
        vertices: Vec<Vertex>,
    },
    /// Workspace edges are available
    EdgesLoaded {
        /// Edges of the workspace
        edges: Vec<Edge>,
    },
}

impl MainMessage {
    /// Wire name of the message
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::StoreObjectsUpdated(_) => "storeObjectsUpdated",
            Self::WorkspaceLoaded { .. } => "workspaceLoaded",
            Self::EdgesLoaded { .. } => "edgesLoaded",
        }
    }
}
