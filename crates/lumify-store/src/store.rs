//! Per-workspace object store
//!
//! [`WorkspaceStore`] owns one [`WorkspaceCache`] per workspace id, created
//! lazily on first write and kept for the life of the process. It is the
//! single source of truth for what the UI believes about an entity.
//!
//! # Update path
//!
//! ```text
//! response ─▶ ClassificationProbe ─▶ cache_vertices / cache_edges
//!                                        │ normalize, compare, write
//!                                        ▼
//!                                  UpdatePublisher ─▶ storeObjectsUpdated
//! ```
//!
//! Every public operation is synchronous. A compare-and-write sequence never
//! suspends, so two batches can never interleave.

use crate::cache::{CacheItemOptions, CachePriority, EntityCache, EvictionLogger, EvictionObserver};
use crate::config::StoreConfig;
use crate::diff::{BatchReport, Change, ChangeDetector};
use crate::entity::{Edge, Entity, GraphEntity, Vertex};
use crate::error::StoreError;
use crate::message::ObjectsUpdated;
use crate::probe::ClassificationProbe;
use crate::publish::{CurrentWorkspace, UpdatePublisher};
use crate::types::{EntityKind, WorkspaceId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Cache state of a single workspace
#[derive(Debug)]
pub struct WorkspaceCache {
    vertices: EntityCache<Vertex>,
    edges: EntityCache<Edge>,
    on_graph_vertex_ids: HashSet<String>,
}

impl WorkspaceCache {
    fn new(capacity: usize) -> Self {
        Self {
            vertices: EntityCache::new(capacity),
            edges: EntityCache::new(capacity),
            on_graph_vertex_ids: HashSet::new(),
        }
    }

    /// Vertex cache
    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &EntityCache<Vertex> {
        &self.vertices
    }

    /// Edge cache
    #[inline]
    #[must_use]
    pub fn edges(&self) -> &EntityCache<Edge> {
        &self.edges
    }

    /// Ids of the vertices placed on the graph canvas
    ///
    /// Independent of what is cached.
    #[inline]
    #[must_use]
    pub fn on_graph_vertex_ids(&self) -> &HashSet<String> {
        &self.on_graph_vertex_ids
    }

    fn get(&mut self, kind: EntityKind, id: &str) -> Option<Entity> {
        match kind {
            EntityKind::Vertex => self.vertices.get(id).cloned().map(Entity::Vertex),
            EntityKind::Edge => self.edges.get(id).cloned().map(Entity::Edge),
        }
    }
}

/// Batched read arriving as a message, with the kind still a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRequest {
    /// Workspace to read from
    pub workspace_id: WorkspaceId,
    /// `"vertex"` or `"edge"`
    pub kind: String,
    /// Ids to read, in the order results are wanted
    pub ids: Vec<String>,
}

struct Observers {
    vertex: Arc<dyn EvictionObserver<Vertex>>,
    edge: Arc<dyn EvictionObserver<Edge>>,
}

/// Ties a [`GraphEntity`] to its slot in a [`WorkspaceCache`]
trait StoredEntity: GraphEntity {
    fn cache(workspace: &mut WorkspaceCache) -> &mut EntityCache<Self>;

    fn observer(observers: &Observers) -> Arc<dyn EvictionObserver<Self>>;

    fn updated(entities: Vec<Self>) -> ObjectsUpdated;
}

impl StoredEntity for Vertex {
    fn cache(workspace: &mut WorkspaceCache) -> &mut EntityCache<Self> {
        &mut workspace.vertices
    }

    fn observer(observers: &Observers) -> Arc<dyn EvictionObserver<Self>> {
        observers.vertex.clone()
    }

    fn updated(entities: Vec<Self>) -> ObjectsUpdated {
        ObjectsUpdated::vertices(entities)
    }
}

impl StoredEntity for Edge {
    fn cache(workspace: &mut WorkspaceCache) -> &mut EntityCache<Self> {
        &mut workspace.edges
    }

    fn observer(observers: &Observers) -> Arc<dyn EvictionObserver<Self>> {
        observers.edge.clone()
    }

    fn updated(entities: Vec<Self>) -> ObjectsUpdated {
        ObjectsUpdated::edges(entities)
    }
}

/// Registry of workspace caches
pub struct WorkspaceStore {
    config: StoreConfig,
    detector: ChangeDetector,
    publisher: UpdatePublisher,
    observers: Observers,
    workspaces: HashMap<WorkspaceId, WorkspaceCache>,
}

impl WorkspaceStore {
    /// Create empty store
    ///
    /// Evictions are logged at debug level until an observer is installed.
    #[must_use]
    pub fn new(config: StoreConfig, publisher: UpdatePublisher) -> Self {
        let logger = Arc::new(EvictionLogger);
        Self {
            detector: ChangeDetector::from_config(&config),
            config,
            publisher,
            observers: Observers {
                vertex: logger.clone(),
                edge: logger,
            },
            workspaces: HashMap::new(),
        }
    }

    /// With eviction observer for both kinds
    ///
    /// Applies to records written from now on.
    #[must_use]
    pub fn with_eviction_observer<O>(mut self, observer: Arc<O>) -> Self
    where
        O: EvictionObserver<Vertex> + EvictionObserver<Edge> + 'static,
    {
        self.observers = Observers {
            vertex: observer.clone(),
            edge: observer,
        };
        self
    }

    /// Store configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Current-workspace slot used to gate notifications
    #[inline]
    #[must_use]
    pub fn current_workspace(&self) -> &CurrentWorkspace {
        self.publisher.current_workspace()
    }

    /// Look up a workspace cache without creating it
    #[inline]
    #[must_use]
    pub fn workspace(&self, workspace_id: &WorkspaceId) -> Option<&WorkspaceCache> {
        self.workspaces.get(workspace_id)
    }

    /// Get or create a workspace cache
    pub fn ensure_workspace(&mut self, workspace_id: &WorkspaceId) -> &mut WorkspaceCache {
        let capacity = self.config.entity_capacity;
        self.workspaces
            .entry(workspace_id.clone())
            .or_insert_with(|| {
                tracing::debug!(workspace = %workspace_id, "creating workspace cache");
                WorkspaceCache::new(capacity)
            })
    }

    /// Number of workspaces with cache state
    #[inline]
    #[must_use]
    pub fn workspace_count(&self) -> usize {
        self.workspaces.len()
    }

    /// Read one cached entity
    ///
    /// Never creates workspace state.
    pub fn get_object(
        &mut self,
        workspace_id: &WorkspaceId,
        kind: EntityKind,
        id: &str,
    ) -> Option<Entity> {
        self.workspaces.get_mut(workspace_id)?.get(kind, id)
    }

    /// Read cached entities, one slot per requested id in request order
    ///
    /// Never creates workspace state. `None` means "not yet known".
    pub fn get_objects<S: AsRef<str>>(
        &mut self,
        workspace_id: &WorkspaceId,
        kind: EntityKind,
        ids: &[S],
    ) -> Vec<Option<Entity>> {
        match self.workspaces.get_mut(workspace_id) {
            Some(workspace) => ids
                .iter()
                .map(|id| workspace.get(kind, id.as_ref()))
                .collect(),
            None => vec![None; ids.len()],
        }
    }

    /// Serve a read request whose kind arrived as a string
    ///
    /// # Errors
    /// `StoreError::InvalidKind` if `kind` is neither `vertex` nor `edge`;
    /// no partial result is produced.
    pub fn handle_request(
        &mut self,
        request: &StoreRequest,
    ) -> Result<Vec<Option<Entity>>, StoreError> {
        let kind: EntityKind = request.kind.parse()?;
        Ok(self.get_objects(&request.workspace_id, kind, &request.ids))
    }

    /// Replace the canvas membership set of a workspace
    pub fn set_vertices_in_workspace<I, S>(&mut self, workspace_id: &WorkspaceId, vertex_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: HashSet<String> = vertex_ids.into_iter().map(Into::into).collect();
        tracing::debug!(workspace = %workspace_id, count = ids.len(), "vertices in workspace");
        self.ensure_workspace(workspace_id).on_graph_vertex_ids = ids;
    }

    /// Canvas membership set, if the workspace has cache state
    #[must_use]
    pub fn vertices_in_workspace(&self, workspace_id: &WorkspaceId) -> Option<&HashSet<String>> {
        self.workspace(workspace_id).map(WorkspaceCache::on_graph_vertex_ids)
    }

    /// Check if a vertex is on the workspace canvas
    #[must_use]
    pub fn is_vertex_in_workspace(&self, workspace_id: &WorkspaceId, vertex_id: &str) -> bool {
        self.vertices_in_workspace(workspace_id)
            .is_some_and(|ids| ids.contains(vertex_id))
    }

    /// Cache a batch of vertices and report updates
    pub fn cache_vertices(&mut self, workspace_id: &WorkspaceId, vertices: Vec<Vertex>) -> BatchReport {
        self.cache_entities(workspace_id, vertices)
    }

    /// Cache a batch of edges and report updates
    pub fn cache_edges(&mut self, workspace_id: &WorkspaceId, edges: Vec<Edge>) -> BatchReport {
        self.cache_entities(workspace_id, edges)
    }

    /// Opportunistically cache whatever entities a response carries
    ///
    /// Runs the single-vertex, `vertices`, single-edge and `edges` checks in
    /// that order; each hit is cached as its own batch.
    pub fn check_ajax_for_possible_caching(
        &mut self,
        response: &Value,
        workspace_id: &WorkspaceId,
    ) -> BatchReport {
        let found = ClassificationProbe::inspect(response);
        let mut report = BatchReport::default();

        if let Some(vertex) = found.vertex {
            report.merge(self.cache_vertices(workspace_id, vec![vertex]));
        }
        if let Some(vertices) = found.vertices {
            report.merge(self.cache_vertices(workspace_id, vertices));
        }
        if let Some(edge) = found.edge {
            report.merge(self.cache_edges(workspace_id, vec![edge]));
        }
        if let Some(edges) = found.edges {
            report.merge(self.cache_edges(workspace_id, edges));
        }
        report
    }

    #[tracing::instrument(level = "debug", skip_all, fields(workspace = %workspace_id, kind = %E::KIND, count = entities.len()))]
    fn cache_entities<E: StoredEntity>(
        &mut self,
        workspace_id: &WorkspaceId,
        entities: Vec<E>,
    ) -> BatchReport {
        let observer = E::observer(&self.observers);
        let capacity = self.config.entity_capacity;
        let workspace = self
            .workspaces
            .entry(workspace_id.clone())
            .or_insert_with(|| WorkspaceCache::new(capacity));
        let cache = E::cache(workspace);

        let mut report = BatchReport::default();
        let mut updated = Vec::new();

        for mut entity in entities {
            self.detector.normalize(&mut entity);
            let change = ChangeDetector::classify(cache.peek(entity.id()), &entity);
            report.record(change);

            let options = CacheItemOptions::new()
                .with_priority(CachePriority::High)
                .with_observer(observer.clone());
            let id = entity.id().to_string();

            match change {
                Change::Unchanged => continue,
                Change::New => {
                    tracing::debug!(id = id.as_str(), "cache");
                    cache.insert(id, entity, options);
                }
                Change::Updated => {
                    tracing::debug!(id = id.as_str(), "cache updated");
                    cache.insert(id, entity.clone(), options);
                    updated.push(entity);
                }
            }
        }

        if !updated.is_empty() {
            report.notified = self.publisher.publish(workspace_id, E::updated(updated));
        }
        report
    }
}

impl std::fmt::Debug for WorkspaceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceStore")
            .field("config", &self.config)
            .field("publisher", &self.publisher)
            .field("workspaces", &self.workspaces.len())
            .finish_non_exhaustive()
    }
}
