//! Workspace switching
//!
//! A switch activates the requested workspace right away, then fetches edges
//! alongside workspace metadata and vertices:
//!
//! ```text
//!            ┌─ edges ────────────────────────────────┐
//! switch ────┤                                        ├─▶ edgesLoaded
//!            └─ get + vertices ─▶ setActiveWorkspace  │
//!                                 workspaceLoaded     │
//!                                 membership ─────────┘
//! ```
//!
//! Fetches are never cancelled. If another switch lands first, the stale one
//! still seeds its membership set (its responses were already cached by the
//! interceptor) but announces nothing.

use crate::error::WorkerError;
use crate::interceptor::SharedStore;
use crate::service::WorkspaceApi;
use crate::session::Session;
use crate::socket::{SocketMessage, SocketSink};
use lumify_store::{Dispatcher, MainMessage, UserId, Vertex, Workspace, WorkspaceId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request to display another workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchWorkspace {
    /// Target workspace
    pub workspace_id: WorkspaceId,
}

impl SwitchWorkspace {
    /// Create request
    #[must_use]
    pub fn new(workspace_id: impl Into<WorkspaceId>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
        }
    }
}

/// Result of a completed switch
#[derive(Debug, Clone, PartialEq)]
pub enum SwitchOutcome {
    /// Workspace was announced to the UI
    Loaded {
        /// Workspace metadata
        workspace: Workspace,
        /// Vertices announced
        vertices: usize,
        /// Edges announced
        edges: usize,
    },
    /// Another workspace became active while fetching
    Superseded {
        /// Workspace this switch was for
        workspace_id: WorkspaceId,
    },
}

impl SwitchOutcome {
    /// Check if the UI was told about this workspace
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Handles [`SwitchWorkspace`] requests
pub struct SwitchWorkspaceHandler<A> {
    api: A,
    store: SharedStore,
    session: Session,
    dispatcher: Arc<dyn Dispatcher>,
    socket: Arc<dyn SocketSink>,
}

impl<A: WorkspaceApi> SwitchWorkspaceHandler<A> {
    /// Create handler
    #[must_use]
    pub fn new(
        api: A,
        store: SharedStore,
        session: Session,
        dispatcher: Arc<dyn Dispatcher>,
        socket: Arc<dyn SocketSink>,
    ) -> Self {
        Self {
            api,
            store,
            session,
            dispatcher,
            socket,
        }
    }

    /// Workspace data source
    #[inline]
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Switch to `message.workspace_id`
    ///
    /// # Errors
    /// `WorkerError::NotAuthenticated` before any fetch if nobody is signed
    /// in; otherwise a fetch or socket failure, reported once every fetch
    /// has settled. Metadata and vertex failures take precedence over edge
    /// failures. Nothing is retried.
    #[tracing::instrument(skip_all, fields(workspace = %message.workspace_id))]
    pub async fn handle(&self, message: SwitchWorkspace) -> Result<SwitchOutcome, WorkerError> {
        let user_id = self.session.require_user()?;
        let workspace_id = message.workspace_id;

        self.session.activate(workspace_id.clone());
        tracing::info!("switching workspace");

        // every fetch runs to completion so each response reaches the interceptor
        let loaded = async {
            let (workspace, vertices) =
                futures::join!(self.api.get(&workspace_id), self.api.vertices(&workspace_id));
            self.workspace_loaded(workspace?, vertices?, &user_id)
        };
        let (edges, loaded) = futures::join!(self.api.edges(&workspace_id), loaded);
        let loaded = loaded?;
        let edges = edges?;

        let Some((workspace, vertices)) = loaded else {
            tracing::info!("switch superseded");
            return Ok(SwitchOutcome::Superseded { workspace_id });
        };

        if !self.session.is_active(&workspace_id) {
            tracing::info!("switch superseded before edges arrived");
            return Ok(SwitchOutcome::Superseded { workspace_id });
        }

        let edge_count = edges.len();
        self.dispatcher.dispatch_main(MainMessage::EdgesLoaded { edges });
        tracing::info!(vertices, edges = edge_count, "workspace loaded");

        Ok(SwitchOutcome::Loaded {
            workspace,
            vertices,
            edges: edge_count,
        })
    }

    /// Announce metadata and seed membership
    ///
    /// Returns `None` without announcing when the workspace is no longer
    /// active.
    fn workspace_loaded(
        &self,
        workspace: Workspace,
        vertices: Vec<Vertex>,
        user_id: &UserId,
    ) -> Result<Option<(Workspace, usize)>, WorkerError> {
        let workspace_id = workspace.workspace_id.clone();
        if !self.session.is_active(&workspace_id) {
            self.seed_membership(&workspace);
            return Ok(None);
        }

        self.socket.push_socket_message(SocketMessage::SetActiveWorkspace {
            workspace_id,
            user_id: user_id.clone(),
        })?;

        let count = vertices.len();
        self.dispatcher.dispatch_main(MainMessage::WorkspaceLoaded {
            workspace: workspace.clone(),
            vertices,
        });
        self.seed_membership(&workspace);
        Ok(Some((workspace, count)))
    }

    fn seed_membership(&self, workspace: &Workspace) {
        self.store
            .lock()
            .set_vertices_in_workspace(&workspace.workspace_id, workspace.vertex_ids());
    }
}

impl<A> std::fmt::Debug for SwitchWorkspaceHandler<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwitchWorkspaceHandler")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
