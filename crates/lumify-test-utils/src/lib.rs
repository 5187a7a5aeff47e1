//! Testing utilities for the Lumify worker workspace
//!
//! Shared fixtures, recorders and store setup.

#![allow(missing_docs)]

use lumify_store::{
    CurrentWorkspace, Dispatcher, Edge, EvictionCause, EvictionObserver,
    MainMessage, ObjectsUpdated, PropertyValue, SandboxStatus, StoreConfig, UpdatePublisher,
    Vertex, WorkspaceId, WorkspaceStore,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const COMMENT: &str = "http://lumify.io/comment#entry";
pub const CREATE_DATE: &str = "http://lumify.io#createDate";
pub const MODIFIED_DATE: &str = "http://lumify.io#modifiedDate";
pub const MODIFIED_BY: &str = "http://lumify.io#modifiedBy";
pub const VISIBILITY: &str = "http://lumify.io#visibilityJson";

pub fn vertex(id: &str, status: SandboxStatus) -> Vertex {
    Vertex::new(id, status)
}

pub fn vertex_json(id: &str, status: &str) -> Value {
    json!({"id": id, "sandboxStatus": status, "properties": []})
}

pub fn edge(id: &str, source: &str, target: &str) -> Edge {
    Edge::new(id, "http://lumify.io/dev#knows", source, target)
}

pub fn edge_json(id: &str, label: &str, source: &str, target: &str) -> Value {
    json!({"id": id, "type": "edge", "label": label, "source": source, "target": target})
}

pub fn comment(text: &str, author: &str, created: i64, modified: i64) -> PropertyValue {
    PropertyValue::new(COMMENT, text)
        .with_metadata(MODIFIED_BY, author)
        .with_metadata(CREATE_DATE, created)
        .with_metadata(MODIFIED_DATE, modified)
        .with_metadata(VISIBILITY, json!({"source": ""}))
}

/// Dispatcher that keeps every message
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    messages: Mutex<Vec<MainMessage>>,
}

impl RecordingDispatcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<MainMessage> {
        self.messages.lock().clone()
    }

    pub fn updates(&self) -> Vec<ObjectsUpdated> {
        self.messages
            .lock()
            .iter()
            .filter_map(|m| match m {
                MainMessage::StoreObjectsUpdated(update) => Some(update.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.messages.lock().iter().map(MainMessage::name).collect()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl Dispatcher for RecordingDispatcher {
    fn dispatch_main(&self, message: MainMessage) {
        self.messages.lock().push(message);
    }
}

/// Eviction observer that counts calls per cause
#[derive(Debug, Default)]
pub struct CountingObserver {
    calls: AtomicUsize,
    log: Mutex<Vec<(String, EvictionCause)>>,
}

impl CountingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn log(&self) -> Vec<(String, EvictionCause)> {
        self.log.lock().clone()
    }
}

impl<V> EvictionObserver<V> for CountingObserver {
    fn on_evict(&self, key: &str, _value: &V, cause: EvictionCause) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().push((key.to_string(), cause));
    }
}

/// Store wired to a recorder and a counting observer
pub struct TestStore {
    pub store: WorkspaceStore,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub observer: Arc<CountingObserver>,
    pub current: CurrentWorkspace,
}

pub fn setup_test_store(config: StoreConfig) -> TestStore {
    let dispatcher = RecordingDispatcher::new();
    let observer = CountingObserver::new();
    let current = CurrentWorkspace::new();
    let publisher = UpdatePublisher::new(dispatcher.clone(), current.clone());
    let store = WorkspaceStore::new(config, publisher).with_eviction_observer(observer.clone());
    TestStore {
        store,
        dispatcher,
        observer,
        current,
    }
}

/// Store whose current workspace is already set
pub fn setup_store_in(workspace_id: &str) -> TestStore {
    let test = setup_test_store(StoreConfig::default());
    test.current.set(WorkspaceId::new(workspace_id));
    test
}
