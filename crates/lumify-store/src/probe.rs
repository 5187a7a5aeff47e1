//! Classification of arbitrary server responses
//!
//! Any JSON response passing through the worker may carry graph entities.
//! Each check is a shape test followed by a decode attempt; a payload that
//! fails either is skipped without error.
//!
//! Arrays are classified by their first element only. This is a best-effort
//! heuristic: later elements are decoded individually and dropped if they do
//! not decode, but a mixed array whose first element is not an entity is
//! ignored as a whole.

use crate::entity::{Edge, Vertex};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Result of decoding a single payload
#[derive(Debug, Clone, PartialEq)]
pub enum Resemblance {
    /// Payload is a vertex
    Vertex(Vertex),
    /// Payload is an edge
    Edge(Edge),
    /// Neither
    Unrecognized,
}

/// Everything cacheable found in one response
///
/// The four slots are independent, mirroring the four checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeResult {
    /// Response itself is a vertex
    pub vertex: Option<Vertex>,
    /// Response carries a `vertices` array
    pub vertices: Option<Vec<Vertex>>,
    /// Response itself is an edge
    pub edge: Option<Edge>,
    /// Response carries an `edges` array
    pub edges: Option<Vec<Edge>>,
}

impl ProbeResult {
    /// Check if nothing cacheable was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertex.is_none() && self.vertices.is_none() && self.edge.is_none() && self.edges.is_none()
    }
}

/// Heuristic response classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassificationProbe;

impl ClassificationProbe {
    /// Run all four checks against a response
    #[must_use]
    pub fn inspect(response: &Value) -> ProbeResult {
        ProbeResult {
            vertex: Self::try_vertex(response),
            vertices: Self::try_vertices(response.get("vertices")),
            edge: Self::try_edge(response),
            edges: Self::try_edges(response.get("edges")),
        }
    }

    /// Decode a single payload as vertex, then edge
    #[must_use]
    pub fn decode(value: &Value) -> Resemblance {
        if let Some(vertex) = Self::try_vertex(value) {
            return Resemblance::Vertex(vertex);
        }
        if let Some(edge) = Self::try_edge(value) {
            return Resemblance::Edge(edge);
        }
        Resemblance::Unrecognized
    }

    /// Object with `id`, `sandboxStatus` and a `properties` array, and
    /// neither `sourceVertexId` nor `destVertexId`
    #[must_use]
    pub fn try_vertex(value: &Value) -> Option<Vertex> {
        let object = value.as_object()?;
        let shaped = has_all(object, &["id", "sandboxStatus"])
            && object.get("properties").is_some_and(Value::is_array)
            && !object.contains_key("sourceVertexId")
            && !object.contains_key("destVertexId");
        if !shaped {
            return None;
        }
        decode(value, "vertex")
    }

    /// Object with `type == "edge"` and `id`, `label`, `source`, `target`
    #[must_use]
    pub fn try_edge(value: &Value) -> Option<Edge> {
        let object = value.as_object()?;
        let shaped = object.get("type").and_then(Value::as_str) == Some("edge")
            && has_all(object, &["id", "label", "source", "target"]);
        if !shaped {
            return None;
        }
        decode(value, "edge")
    }

    /// Non-empty array whose first element is a vertex
    #[must_use]
    pub fn try_vertices(value: Option<&Value>) -> Option<Vec<Vertex>> {
        sample_array(value?, Self::try_vertex)
    }

    /// Non-empty array whose first element is an edge
    #[must_use]
    pub fn try_edges(value: Option<&Value>) -> Option<Vec<Edge>> {
        sample_array(value?, Self::try_edge)
    }
}

fn has_all(object: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().all(|key| object.contains_key(*key))
}

fn decode<T: DeserializeOwned>(value: &Value, what: &'static str) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            tracing::debug!(%err, kind = what, "payload shaped like an entity did not decode");
            None
        }
    }
}

fn sample_array<T>(value: &Value, one: fn(&Value) -> Option<T>) -> Option<Vec<T>> {
    let items = value.as_array()?;
    let (first, rest) = items.split_first()?;
    let first = one(first)?;

    let mut decoded = Vec::with_capacity(items.len());
    decoded.push(first);
    for (offset, item) in rest.iter().enumerate() {
        match one(item) {
            Some(entity) => decoded.push(entity),
            None => tracing::warn!(index = offset + 1, "skipping array element that is not an entity"),
        }
    }
    Some(decoded)
}
