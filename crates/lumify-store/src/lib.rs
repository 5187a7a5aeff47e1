//! Lumify workspace store
//!
//! The web worker keeps a cache of graph vertices and edges per workspace:
//! - Lazily created per-workspace caches ([`WorkspaceStore`])
//! - Priority-aware bounded entity caches ([`EntityCache`])
//! - Dirty-checking of incoming payloads ([`ChangeDetector`])
//! - Batched `storeObjectsUpdated` notifications for the current workspace
//!   only ([`UpdatePublisher`])
//! - Opportunistic population from arbitrary responses
//!   ([`ClassificationProbe`])
//!
//! # Example
//!
//! ```rust
//! use lumify_store::prelude::*;
//! use std::sync::Arc;
//!
//! let (dispatcher, mut ui) = ChannelDispatcher::channel();
//! let current = CurrentWorkspace::new();
//! let publisher = UpdatePublisher::new(Arc::new(dispatcher), current.clone());
//! let mut store = WorkspaceStore::new(StoreConfig::default(), publisher);
//!
//! let w1 = WorkspaceId::new("w1");
//! current.set(w1.clone());
//!
//! store.cache_vertices(&w1, vec![Vertex::new("v1", SandboxStatus::Public)]);
//! assert!(ui.try_recv().is_err()); // first sighting is silent
//!
//! store.cache_vertices(&w1, vec![Vertex::new("v1", SandboxStatus::Private)]);
//! assert!(matches!(ui.try_recv(), Ok(MainMessage::StoreObjectsUpdated(_))));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod cache;
pub mod config;
pub mod diff;
pub mod entity;
pub mod error;
pub mod message;
pub mod probe;
pub mod publish;
pub mod store;
pub mod types;
pub mod workspace;

// Re-exports for convenience
pub use cache::{
    CacheItemOptions, CachePriority, CacheStats, EntityCache, EvictionCause, EvictionLogger,
    EvictionObserver,
};
pub use config::StoreConfig;
pub use diff::{BatchReport, Change, ChangeDetector};
pub use entity::{Edge, EdgeTag, Entity, GraphEntity, PropertyValue, SandboxStatus, Vertex};
pub use error::StoreError;
pub use message::{MainMessage, ObjectsUpdated};
pub use probe::{ClassificationProbe, ProbeResult, Resemblance};
pub use publish::{ChannelDispatcher, CurrentWorkspace, Dispatcher, UpdatePublisher};
pub use store::{StoreRequest, WorkspaceCache, WorkspaceStore};
pub use types::{EntityKind, UserId, WorkspaceId};
pub use workspace::{GraphPosition, Workspace, WorkspaceAccess, WorkspaceUser, WorkspaceVertex};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the store
    pub use crate::{
        ChannelDispatcher, CurrentWorkspace, Dispatcher, Edge, Entity, EntityKind, MainMessage,
        ObjectsUpdated, SandboxStatus, StoreConfig, UpdatePublisher, Vertex, WorkspaceId,
        WorkspaceStore,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
