//! WorkspaceStore Tests
//!
//! Caching, change detection and notification behaviour across the
//! public store surface.

use lumify_store::prelude::*;
use lumify_store::{EvictionCause, StoreRequest};
use lumify_test_utils::{edge, edge_json, setup_store_in, setup_test_store, vertex, vertex_json};
use pretty_assertions::assert_eq;
use serde_json::json;

fn ws(id: &str) -> WorkspaceId {
    WorkspaceId::new(id)
}

#[test]
fn test_status_change_emits_one_update() {
    let mut t = setup_store_in("w1");

    let first = t.store.cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::Public)]);
    assert_eq!(first.new, 1);
    assert!(!first.notified);
    assert!(t.dispatcher.messages().is_empty());

    let second = t.store.cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::Private)]);
    assert_eq!(second.updated, 1);
    assert!(second.notified);

    let updates = t.dispatcher.updates();
    assert_eq!(updates.len(), 1);
    let vertices = updates[0].vertices.as_ref().unwrap();
    assert_eq!(vertices.len(), 1);
    assert_eq!(vertices[0].sandbox_status, SandboxStatus::Private);
    assert!(updates[0].edges.is_none());
}

#[test]
fn test_identical_rewrite_is_silent() {
    let mut t = setup_store_in("w1");
    let v1 = vertex("v1", SandboxStatus::Public);

    t.store.cache_vertices(&ws("w1"), vec![v1.clone()]);
    let report = t.store.cache_vertices(&ws("w1"), vec![v1]);

    assert_eq!(report.unchanged, 1);
    assert_eq!(report.written(), 0);
    assert!(t.dispatcher.messages().is_empty());
    assert_eq!(t.observer.calls(), 0);
}

#[test]
fn test_score_only_difference_is_unchanged() {
    let mut t = setup_store_in("w1");
    t.store.cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::Public)]);

    let scored = vertex("v1", SandboxStatus::Public).with_field("score", 12.5);
    let report = t.store.cache_vertices(&ws("w1"), vec![scored]);

    assert_eq!(report.unchanged, 1);
    assert!(t.dispatcher.messages().is_empty());
}

#[test]
fn test_replacement_fires_eviction_callback() {
    let mut t = setup_store_in("w1");
    t.store.cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::Public)]);
    t.store.cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::Private)]);

    assert_eq!(t.observer.log(), vec![("v1".to_string(), EvictionCause::Replaced)]);
}

#[test]
fn test_non_current_workspace_caches_without_notifying() {
    let mut t = setup_store_in("w2");
    t.store.cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::Public)]);
    let report = t.store.cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::Private)]);

    assert_eq!(report.updated, 1);
    assert!(!report.notified);
    assert!(t.dispatcher.messages().is_empty());

    let cached = t.store.get_object(&ws("w1"), EntityKind::Vertex, "v1").unwrap();
    assert_eq!(cached.as_vertex().unwrap().sandbox_status, SandboxStatus::Private);
}

#[test]
fn test_no_current_workspace_never_notifies() {
    let mut t = setup_test_store(StoreConfig::default());
    t.store.cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::Public)]);
    t.store.cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::Private)]);
    assert!(t.dispatcher.messages().is_empty());
}

#[test]
fn test_workspaces_are_isolated() {
    let mut t = setup_store_in("w1");
    t.store.cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::Public)]);

    assert!(t.store.get_object(&ws("w2"), EntityKind::Vertex, "v1").is_none());

    // Same id in another workspace is a first sighting there.
    let report = t.store.cache_vertices(&ws("w2"), vec![vertex("v1", SandboxStatus::Private)]);
    assert_eq!(report.new, 1);
    assert!(t.dispatcher.messages().is_empty());
}

#[test]
fn test_get_objects_mixed_hits() {
    let mut t = setup_store_in("w1");
    t.store.cache_vertices(&ws("w1"), vec![vertex("b", SandboxStatus::Public)]);

    let result = t.store.get_objects(&ws("w1"), EntityKind::Vertex, &["a", "b", "c"]);
    let ids: Vec<Option<&str>> = result.iter().map(|e| e.as_ref().map(Entity::id)).collect();
    assert_eq!(ids, vec![None, Some("b"), None]);
}

#[test]
fn test_get_objects_on_unknown_workspace() {
    let mut t = setup_test_store(StoreConfig::default());
    let result = t.store.get_objects(&ws("nope"), EntityKind::Edge, &["e1", "e2"]);
    assert_eq!(result, vec![None, None]);
    assert_eq!(t.store.workspace_count(), 0);
}

#[test]
fn test_handle_request_from_wire() {
    let mut t = setup_store_in("w1");
    t.store.cache_edges(&ws("w1"), vec![edge("e1", "v1", "v2")]);

    let request: StoreRequest = serde_json::from_value(json!({
        "workspaceId": "w1",
        "kind": "edge",
        "ids": ["e1", "e9"]
    }))
    .unwrap();
    let result = t.store.handle_request(&request).unwrap();
    assert_eq!(result[0].as_ref().map(Entity::kind), Some(EntityKind::Edge));
    assert!(result[1].is_none());

    let bad = StoreRequest {
        kind: "property".to_string(),
        ..request
    };
    assert!(t.store.handle_request(&bad).is_err());
}

#[test]
fn test_ajax_single_edge_is_cached() {
    let mut t = setup_store_in("w1");
    let response = edge_json("e1", "knows", "v1", "v2");

    let report = t.store.check_ajax_for_possible_caching(&response, &ws("w1"));
    assert_eq!(report.new, 1);

    let cached = t.store.get_object(&ws("w1"), EntityKind::Edge, "e1").unwrap();
    let edge = cached.as_edge().unwrap();
    assert_eq!((edge.source.as_str(), edge.target.as_str()), ("v1", "v2"));
}

#[test]
fn test_ajax_edge_change_compares_against_previous_edge() {
    let mut t = setup_store_in("w1");
    t.store.check_ajax_for_possible_caching(&edge_json("e1", "knows", "v1", "v2"), &ws("w1"));

    let report = t
        .store
        .check_ajax_for_possible_caching(&edge_json("e1", "knows", "v1", "v2"), &ws("w1"));
    assert_eq!(report.unchanged, 1);
    assert!(t.dispatcher.messages().is_empty());

    t.store
        .check_ajax_for_possible_caching(&edge_json("e1", "worksFor", "v1", "v2"), &ws("w1"));
    let updates = t.dispatcher.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].edges.as_ref().unwrap()[0].label, "worksFor");
    assert!(updates[0].vertices.is_none());
}

#[test]
fn test_ajax_search_response_caches_vertex_array() {
    let mut t = setup_store_in("w1");
    let response = json!({
        "vertices": [vertex_json("v1", "PUBLIC"), vertex_json("v2", "PRIVATE")],
        "nextOffset": 2
    });

    let report = t.store.check_ajax_for_possible_caching(&response, &ws("w1"));
    assert_eq!(report.new, 2);
    assert_eq!(
        t.store.get_objects(&ws("w1"), EntityKind::Vertex, &["v1", "v2"]).iter().flatten().count(),
        2
    );
}

#[test]
fn test_ajax_mixed_response_sends_separate_batches() {
    let mut t = setup_store_in("w1");
    let response = json!({
        "vertices": [vertex_json("v1", "PUBLIC")],
        "edges": [edge_json("e1", "knows", "v1", "v2")]
    });
    t.store.check_ajax_for_possible_caching(&response, &ws("w1"));

    let changed = json!({
        "vertices": [vertex_json("v1", "PRIVATE")],
        "edges": [edge_json("e1", "knows", "v2", "v1")]
    });
    let report = t.store.check_ajax_for_possible_caching(&changed, &ws("w1"));
    assert_eq!(report.updated, 2);

    let updates = t.dispatcher.updates();
    assert_eq!(updates.len(), 2);
    assert!(updates[0].vertices.is_some() && updates[0].edges.is_none());
    assert!(updates[1].edges.is_some() && updates[1].vertices.is_none());
}

#[test]
fn test_ajax_unrelated_response_is_ignored() {
    let mut t = setup_store_in("w1");
    for response in [
        json!({"success": true}),
        json!([1, 2, 3]),
        json!({"vertices": [{"title": "not a vertex"}]}),
        json!("ok"),
    ] {
        let report = t.store.check_ajax_for_possible_caching(&response, &ws("w1"));
        assert_eq!(report.total(), 0);
    }
    assert_eq!(t.store.workspace_count(), 0);
}

#[test]
fn test_capacity_evicts_least_recently_used() {
    let mut t = setup_test_store(StoreConfig::default().with_entity_capacity(2));
    t.store.cache_vertices(
        &ws("w1"),
        vec![
            vertex("v1", SandboxStatus::Public),
            vertex("v2", SandboxStatus::Public),
        ],
    );
    // Touch v1 so v2 becomes the eviction candidate.
    assert!(t.store.get_object(&ws("w1"), EntityKind::Vertex, "v1").is_some());
    t.store.cache_vertices(&ws("w1"), vec![vertex("v3", SandboxStatus::Public)]);

    assert!(t.store.get_object(&ws("w1"), EntityKind::Vertex, "v2").is_none());
    assert!(t.store.get_object(&ws("w1"), EntityKind::Vertex, "v1").is_some());
    assert_eq!(t.observer.log(), vec![("v2".to_string(), EvictionCause::Capacity)]);
}

#[test]
fn test_identical_rewrite_keeps_recency() {
    let mut t = setup_test_store(StoreConfig::default().with_entity_capacity(2));
    t.store.cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::Public)]);
    t.store.cache_vertices(&ws("w1"), vec![vertex("v2", SandboxStatus::Public)]);

    // unchanged, so v1 stays the least recently used record
    let report = t.store.cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::Public)]);
    assert_eq!(report.unchanged, 1);
    t.store.cache_vertices(&ws("w1"), vec![vertex("v3", SandboxStatus::Public)]);

    assert_eq!(t.observer.log(), vec![("v1".to_string(), EvictionCause::Capacity)]);
    assert!(t.store.get_object(&ws("w1"), EntityKind::Vertex, "v1").is_none());
    assert!(t.store.get_object(&ws("w1"), EntityKind::Vertex, "v2").is_some());
}

#[test]
fn test_loose_property_payloads_are_cached_verbatim() {
    let mut t = setup_store_in("w1");
    let response = json!({
        "id": "v2",
        "sandboxStatus": "PUBLIC",
        "properties": [{"key": "k", "value": 1}, {"key": "k", "name": "title"}]
    });

    let report = t.store.check_ajax_for_possible_caching(&response, &ws("w1"));
    assert_eq!(report.new, 1);

    let cached = t.store.get_object(&ws("w1"), EntityKind::Vertex, "v2").unwrap();
    assert_eq!(serde_json::to_value(&cached).unwrap(), response);
}

#[test]
fn test_evicted_entity_returns_as_new() {
    let mut t = setup_store_in("w1");
    let mut t_small = setup_test_store(StoreConfig::default().with_entity_capacity(1));
    t_small.current.set(ws("w1"));

    t_small.store.cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::Public)]);
    t_small.store.cache_vertices(&ws("w1"), vec![vertex("v2", SandboxStatus::Public)]);
    let report = t_small
        .store
        .cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::Private)]);

    assert_eq!(report.new, 1);
    assert!(t_small.dispatcher.messages().is_empty());

    // Large store keeps both and reports the change.
    t.store.cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::Public)]);
    t.store.cache_vertices(&ws("w1"), vec![vertex("v2", SandboxStatus::Public)]);
    t.store.cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::Private)]);
    assert_eq!(t.dispatcher.updates().len(), 1);
}

#[test]
fn test_custom_volatile_fields() {
    let config = StoreConfig::default().with_volatile_fields(["highlight"]);
    let mut t = setup_test_store(config);
    t.current.set(ws("w1"));

    let a = vertex("v1", SandboxStatus::Public).with_field("highlight", "<em>a</em>");
    let b = vertex("v1", SandboxStatus::Public).with_field("highlight", "<em>b</em>");
    t.store.cache_vertices(&ws("w1"), vec![a]);
    assert_eq!(t.store.cache_vertices(&ws("w1"), vec![b]).unchanged, 1);

    // score is no longer volatile under this config
    t.store.cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::Public).with_field("score", 1)]);
    assert_eq!(t.dispatcher.updates().len(), 1);
}

#[test]
fn test_update_message_wire_shape() {
    let mut t = setup_store_in("w1");
    t.store.cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::Public)]);
    t.store.cache_vertices(&ws("w1"), vec![vertex("v1", SandboxStatus::PublicChanged)]);

    let message = &t.dispatcher.messages()[0];
    assert_eq!(
        serde_json::to_value(message).unwrap(),
        json!({
            "type": "storeObjectsUpdated",
            "data": {
                "vertices": [{"id": "v1", "sandboxStatus": "PUBLIC_CHANGED", "properties": []}]
            }
        })
    );
}

#[test]
fn test_membership_tracks_latest_set() {
    let mut t = setup_store_in("w1");
    t.store.set_vertices_in_workspace(&ws("w1"), ["v1", "v2"]);
    assert!(t.store.is_vertex_in_workspace(&ws("w1"), "v2"));

    t.store.set_vertices_in_workspace(&ws("w1"), Vec::<String>::new());
    assert!(!t.store.is_vertex_in_workspace(&ws("w1"), "v2"));
    assert!(t.store.vertices_in_workspace(&ws("w1")).unwrap().is_empty());
}
