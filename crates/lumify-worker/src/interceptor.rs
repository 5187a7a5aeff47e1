//! Ajax interception hook
//!
//! Every response the worker receives passes through here before its caller
//! sees it, which is how the store gets populated.

use lumify_store::{BatchReport, WorkspaceId, WorkspaceStore};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// Store shared between handlers
///
/// The lock is only taken for synchronous store calls and never held across
/// an `.await`.
pub type SharedStore = Arc<Mutex<WorkspaceStore>>;

/// Wrap a store for sharing
#[must_use]
pub fn shared(store: WorkspaceStore) -> SharedStore {
    Arc::new(Mutex::new(store))
}

/// Feeds responses to [`WorkspaceStore::check_ajax_for_possible_caching`]
#[derive(Debug, Clone)]
pub struct AjaxInterceptor {
    store: SharedStore,
}

impl AjaxInterceptor {
    /// Create interceptor over a shared store
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Offer a decoded response to the store
    pub fn intercept(&self, response: &Value, workspace_id: &WorkspaceId) -> BatchReport {
        let report = self
            .store
            .lock()
            .check_ajax_for_possible_caching(response, workspace_id);
        if report.total() > 0 {
            tracing::debug!(
                workspace = %workspace_id,
                new = report.new,
                updated = report.updated,
                unchanged = report.unchanged,
                "intercepted response"
            );
        }
        report
    }

    /// Offer a raw response body to the store
    ///
    /// Bodies that are not JSON are ignored.
    pub fn intercept_text(&self, body: &str, workspace_id: &WorkspaceId) -> BatchReport {
        match serde_json::from_str::<Value>(body) {
            Ok(response) => self.intercept(&response, workspace_id),
            Err(err) => {
                tracing::trace!(%err, "response is not json, not intercepted");
                BatchReport::default()
            }
        }
    }
}
