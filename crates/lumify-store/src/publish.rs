//! Update propagation to the UI thread
//!
//! The publisher reads the current workspace at the moment it is about to
//! notify, never earlier, so a response that lands after the user switched
//! away is cached without waking the UI.

use crate::message::{MainMessage, ObjectsUpdated};
use crate::types::WorkspaceId;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Sink for worker → UI messages
pub trait Dispatcher: Send + Sync {
    /// Post a message to the UI thread
    fn dispatch_main(&self, message: MainMessage);
}

/// Dispatcher backed by an unbounded tokio channel
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    sender: mpsc::UnboundedSender<MainMessage>,
}

impl ChannelDispatcher {
    /// Create dispatcher and the receiving end for the UI side
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<MainMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Dispatcher for ChannelDispatcher {
    fn dispatch_main(&self, message: MainMessage) {
        let name = message.name();
        if self.sender.send(message).is_err() {
            tracing::warn!(message = name, "ui receiver dropped, message discarded");
        }
    }
}

/// Observable slot holding the workspace the UI is displaying
///
/// Cloning shares the slot.
#[derive(Debug, Clone)]
pub struct CurrentWorkspace {
    slot: Arc<watch::Sender<Option<WorkspaceId>>>,
}

impl CurrentWorkspace {
    /// Create empty slot
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            slot: Arc::new(sender),
        }
    }

    /// Set the active workspace
    pub fn set(&self, workspace_id: WorkspaceId) {
        tracing::debug!(workspace = %workspace_id, "current workspace changed");
        self.slot.send_replace(Some(workspace_id));
    }

    /// Clear the active workspace
    pub fn clear(&self) {
        self.slot.send_replace(None);
    }

    /// Read the active workspace
    #[must_use]
    pub fn get(&self) -> Option<WorkspaceId> {
        self.slot.borrow().clone()
    }

    /// Check if `workspace_id` is the active workspace
    #[must_use]
    pub fn is(&self, workspace_id: &WorkspaceId) -> bool {
        self.slot.borrow().as_ref() == Some(workspace_id)
    }

    /// Watch for changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<WorkspaceId>> {
        self.slot.subscribe()
    }
}

impl Default for CurrentWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Emits batched `storeObjectsUpdated` notifications for the current workspace
#[derive(Clone)]
pub struct UpdatePublisher {
    dispatcher: Arc<dyn Dispatcher>,
    current: CurrentWorkspace,
}

impl UpdatePublisher {
    /// Create publisher
    #[must_use]
    pub fn new(dispatcher: Arc<dyn Dispatcher>, current: CurrentWorkspace) -> Self {
        Self {
            dispatcher,
            current,
        }
    }

    /// Current-workspace slot consulted before every notification
    #[inline]
    #[must_use]
    pub fn current_workspace(&self) -> &CurrentWorkspace {
        &self.current
    }

    /// Publish one batch, returning whether a message was sent
    ///
    /// Empty batches and batches for a workspace other than the current one
    /// are dropped.
    pub fn publish(&self, workspace_id: &WorkspaceId, update: ObjectsUpdated) -> bool {
        if update.is_empty() {
            return false;
        }
        if !self.current.is(workspace_id) {
            tracing::debug!(
                workspace = %workspace_id,
                count = update.len(),
                "workspace not current, update not published"
            );
            return false;
        }

        tracing::info!(workspace = %workspace_id, count = update.len(), "updated");
        self.dispatcher
            .dispatch_main(MainMessage::StoreObjectsUpdated(update));
        true
    }
}

impl std::fmt::Debug for UpdatePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdatePublisher")
            .field("current", &self.current.get())
            .finish_non_exhaustive()
    }
}
