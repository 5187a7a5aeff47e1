//! Worker wiring
//!
//! [`WorkerContext`] owns the pieces every handler shares: the store, the
//! session and both outbound sinks.

use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::interceptor::{shared, AjaxInterceptor, SharedStore};
use crate::service::{WorkspaceApi, WorkspaceService};
use crate::session::Session;
use crate::socket::{ChannelSocket, SocketMessage, SocketSink};
use crate::switch::SwitchWorkspaceHandler;
use crate::transport::{HttpTransport, Transport};
use lumify_store::{
    ChannelDispatcher, Dispatcher, Entity, MainMessage, StoreRequest, UpdatePublisher,
    WorkspaceStore,
};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Receiving ends of the worker's outbound channels
#[derive(Debug)]
pub struct WorkerChannels {
    /// Worker → UI messages
    pub main: UnboundedReceiver<MainMessage>,
    /// Worker → server socket messages
    pub socket: UnboundedReceiver<SocketMessage>,
}

/// Shared worker state
#[derive(Clone)]
pub struct WorkerContext {
    config: WorkerConfig,
    store: SharedStore,
    session: Session,
    dispatcher: Arc<dyn Dispatcher>,
    socket: Arc<dyn SocketSink>,
}

impl WorkerContext {
    /// Create context around the given sinks
    #[must_use]
    pub fn new(config: WorkerConfig, dispatcher: Arc<dyn Dispatcher>, socket: Arc<dyn SocketSink>) -> Self {
        let session = Session::default();
        let publisher = UpdatePublisher::new(dispatcher.clone(), session.current_workspace().clone());
        let store = shared(WorkspaceStore::new(config.store.clone(), publisher));
        Self {
            config,
            store,
            session,
            dispatcher,
            socket,
        }
    }

    /// Create context with channel sinks
    #[must_use]
    pub fn with_channels(config: WorkerConfig) -> (Self, WorkerChannels) {
        let (dispatcher, main) = ChannelDispatcher::channel();
        let (socket, socket_rx) = ChannelSocket::channel();
        let context = Self::new(config, Arc::new(dispatcher), Arc::new(socket));
        (
            context,
            WorkerChannels {
                main,
                socket: socket_rx,
            },
        )
    }

    /// Worker configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Shared store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Session state
    #[inline]
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Interceptor feeding the shared store
    #[must_use]
    pub fn interceptor(&self) -> AjaxInterceptor {
        AjaxInterceptor::new(self.store.clone())
    }

    /// Workspace endpoints over `transport`
    #[must_use]
    pub fn workspace_service<T: Transport>(&self, transport: T) -> WorkspaceService<T> {
        WorkspaceService::new(transport, self.interceptor())
    }

    /// Workspace endpoints over HTTP against `base_url`
    ///
    /// # Errors
    /// `WorkerError::Transport` if the HTTP client cannot be built.
    pub fn http_service(&self) -> Result<WorkspaceService<HttpTransport>, WorkerError> {
        Ok(self.workspace_service(HttpTransport::new(&self.config)?))
    }

    /// Switch handler over `api`
    #[must_use]
    pub fn switch_handler<A: WorkspaceApi>(&self, api: A) -> SwitchWorkspaceHandler<A> {
        SwitchWorkspaceHandler::new(
            api,
            self.store.clone(),
            self.session.clone(),
            self.dispatcher.clone(),
            self.socket.clone(),
        )
    }

    /// Serve a batched read
    ///
    /// # Errors
    /// `WorkerError::Store` if the request kind is invalid.
    pub fn get_objects(&self, request: &StoreRequest) -> Result<Vec<Option<Entity>>, WorkerError> {
        Ok(self.store.lock().handle_request(request)?)
    }
}

impl std::fmt::Debug for WorkerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerContext")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumify_store::{EntityKind, WorkspaceId};
    use lumify_test_utils::vertex_json;
    use serde_json::json;

    #[test]
    fn interceptor_publishes_through_context_channel() {
        let (context, mut channels) = WorkerContext::with_channels(WorkerConfig::default());
        let w1 = WorkspaceId::new("w1");
        context.session().activate(w1.clone());

        let interceptor = context.interceptor();
        interceptor.intercept(&vertex_json("v1", "PUBLIC"), &w1);
        interceptor.intercept(&vertex_json("v1", "PRIVATE"), &w1);

        assert_eq!(channels.main.try_recv().unwrap().name(), "storeObjectsUpdated");
        assert!(channels.main.try_recv().is_err());
    }

    #[test]
    fn get_objects_surfaces_invalid_kind() {
        let (context, _channels) = WorkerContext::with_channels(WorkerConfig::default());
        let request: StoreRequest =
            serde_json::from_value(json!({"workspaceId": "w1", "kind": "node", "ids": ["v1"]})).unwrap();
        assert!(matches!(context.get_objects(&request), Err(WorkerError::Store(_))));

        let request = StoreRequest {
            kind: EntityKind::Vertex.to_string(),
            ..request
        };
        assert_eq!(context.get_objects(&request).unwrap(), vec![None]);
    }

    #[test]
    fn store_uses_configured_capacity() {
        let config = WorkerConfig::default()
            .with_store(lumify_store::StoreConfig::default().with_entity_capacity(3));
        let (context, _channels) = WorkerContext::with_channels(config);
        assert_eq!(context.store().lock().config().entity_capacity, 3);
    }
}
