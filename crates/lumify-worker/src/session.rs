//! Signed-in user and active workspace

use crate::error::WorkerError;
use lumify_store::{CurrentWorkspace, UserId, WorkspaceId};
use parking_lot::RwLock;
use std::sync::Arc;

/// Worker-wide session state
///
/// Cloning shares the state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Arc<RwLock<Option<UserId>>>,
    current: CurrentWorkspace,
}

impl Session {
    /// Create session around an existing current-workspace slot
    #[must_use]
    pub fn new(current: CurrentWorkspace) -> Self {
        Self {
            user: Arc::new(RwLock::new(None)),
            current,
        }
    }

    /// With signed-in user
    #[must_use]
    pub fn with_user(self, user_id: UserId) -> Self {
        self.set_user(user_id);
        self
    }

    /// Record the signed-in user
    pub fn set_user(&self, user_id: UserId) {
        *self.user.write() = Some(user_id);
    }

    /// Forget the signed-in user
    pub fn clear_user(&self) {
        *self.user.write() = None;
    }

    /// Signed-in user, if any
    #[must_use]
    pub fn current_user(&self) -> Option<UserId> {
        self.user.read().clone()
    }

    /// Signed-in user
    ///
    /// # Errors
    /// `WorkerError::NotAuthenticated` if nobody is signed in.
    pub fn require_user(&self) -> Result<UserId, WorkerError> {
        self.current_user().ok_or(WorkerError::NotAuthenticated)
    }

    /// Current-workspace slot shared with the store
    #[inline]
    #[must_use]
    pub fn current_workspace(&self) -> &CurrentWorkspace {
        &self.current
    }

    /// Make `workspace_id` the active workspace
    pub fn activate(&self, workspace_id: WorkspaceId) {
        self.current.set(workspace_id);
    }

    /// Check if `workspace_id` is still the active workspace
    #[must_use]
    pub fn is_active(&self, workspace_id: &WorkspaceId) -> bool {
        self.current.is(workspace_id)
    }
}
