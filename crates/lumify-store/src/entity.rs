//! Graph entity wire model
//!
//! Vertices and edges keep every field the server sends. The fields the store
//! relies on are typed; everything else lands in a flattened `extra` map, so
//! structural equality and re-serialization see the whole payload.

use crate::types::EntityKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Vertex visibility / lifecycle tag
///
/// The server emits the first three; anything else is carried through
/// untouched so a newer server does not break decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SandboxStatus {
    /// Published to every workspace
    Public,
    /// Published, with unpublished changes in this workspace
    PublicChanged,
    /// Only visible in this workspace
    Private,
    /// Unrecognized status string
    Other(String),
}

impl SandboxStatus {
    /// Wire representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Public => "PUBLIC",
            Self::PublicChanged => "PUBLIC_CHANGED",
            Self::Private => "PRIVATE",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for SandboxStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PUBLIC" => Self::Public,
            "PUBLIC_CHANGED" => Self::PublicChanged,
            "PRIVATE" => Self::Private,
            _ => Self::Other(s),
        }
    }
}

impl From<SandboxStatus> for String {
    fn from(status: SandboxStatus) -> Self {
        match status {
            SandboxStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SandboxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single property value on a vertex or edge
///
/// Opaque to the store: the payload is kept exactly as the server sent it.
/// Display code reads it through the accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyValue(Value);

impl PropertyValue {
    /// Create property with a name and value
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(name.into()));
        fields.insert("value".to_string(), value.into());
        Self(Value::Object(fields))
    }

    /// Add metadata entry
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Value::Object(fields) = &mut self.0 {
            let metadata = fields
                .entry("metadata")
                .or_insert_with(|| Value::Object(Map::new()));
            if !metadata.is_object() {
                *metadata = Value::Object(Map::new());
            }
            if let Value::Object(metadata) = metadata {
                metadata.insert(key.into(), value.into());
            }
        }
        self
    }

    /// Ontology property IRI, if present and a string
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Property key distinguishing multi-valued entries
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.0.get("key").and_then(Value::as_str)
    }

    /// Property value
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.0.get("value")
    }

    /// Look up a metadata entry
    #[must_use]
    pub fn metadata(&self, key: &str) -> Option<&Value> {
        self.0.get("metadata")?.get(key)
    }

    /// Look up any top-level field
    #[inline]
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Raw payload
    #[inline]
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for PropertyValue {
    fn from(raw: Value) -> Self {
        Self(raw)
    }
}

/// Graph vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vertex {
    /// Vertex id, unique within a workspace
    pub id: String,
    /// Visibility tag
    pub sandbox_status: SandboxStatus,
    /// Ordered property list
    pub properties: Vec<PropertyValue>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Vertex {
    /// Create vertex with no properties
    #[must_use]
    pub fn new(id: impl Into<String>, sandbox_status: SandboxStatus) -> Self {
        Self {
            id: id.into(),
            sandbox_status,
            properties: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Append a property
    #[must_use]
    pub fn with_property(mut self, property: PropertyValue) -> Self {
        self.properties.push(property);
        self
    }

    /// Set an extra top-level field
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Literal `"edge"` type tag carried by every edge payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EdgeTag {
    /// The only accepted tag
    #[default]
    #[serde(rename = "edge")]
    Edge,
}

/// Graph edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Edge id, unique within a workspace
    pub id: String,
    /// Relationship label IRI
    pub label: String,
    /// Source vertex id
    pub source: String,
    /// Target vertex id
    pub target: String,
    /// Always `"edge"`
    #[serde(rename = "type")]
    pub tag: EdgeTag,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Edge {
    /// Create edge between two vertices
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            source: source.into(),
            target: target.into(),
            tag: EdgeTag::Edge,
            extra: Map::new(),
        }
    }

    /// Set an extra top-level field
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Either kind of cached entity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    /// A vertex
    Vertex(Vertex),
    /// An edge
    Edge(Edge),
}

impl Entity {
    /// Kind of the wrapped entity
    #[inline]
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Vertex(_) => EntityKind::Vertex,
            Self::Edge(_) => EntityKind::Edge,
        }
    }

    /// Id of the wrapped entity
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Vertex(v) => &v.id,
            Self::Edge(e) => &e.id,
        }
    }

    /// Borrow as vertex
    #[inline]
    #[must_use]
    pub fn as_vertex(&self) -> Option<&Vertex> {
        match self {
            Self::Vertex(v) => Some(v),
            Self::Edge(_) => None,
        }
    }

    /// Borrow as edge
    #[inline]
    #[must_use]
    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            Self::Edge(e) => Some(e),
            Self::Vertex(_) => None,
        }
    }
}

impl From<Vertex> for Entity {
    fn from(v: Vertex) -> Self {
        Self::Vertex(v)
    }
}

impl From<Edge> for Entity {
    fn from(e: Edge) -> Self {
        Self::Edge(e)
    }
}

/// Behaviour shared by vertices and edges
///
/// Lets the change-detection path be written once for both kinds.
pub trait GraphEntity: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Kind tag
    const KIND: EntityKind;

    /// Identity key
    fn id(&self) -> &str;

    /// Uncategorised top-level fields
    fn extra_mut(&mut self) -> &mut Map<String, Value>;

    /// Wrap as [`Entity`]
    fn into_entity(self) -> Entity;

    /// Drop the named top-level fields, returning how many were present
    fn strip_fields(&mut self, fields: &[String]) -> usize {
        let extra = self.extra_mut();
        fields
            .iter()
            .filter(|field| extra.remove(field.as_str()).is_some())
            .count()
    }
}

impl GraphEntity for Vertex {
    const KIND: EntityKind = EntityKind::Vertex;

    fn id(&self) -> &str {
        &self.id
    }

    fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extra
    }

    fn into_entity(self) -> Entity {
        Entity::Vertex(self)
    }
}

impl GraphEntity for Edge {
    const KIND: EntityKind = EntityKind::Edge;

    fn id(&self) -> &str {
        &self.id
    }

    fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extra
    }

    fn into_entity(self) -> Entity {
        Entity::Edge(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn vertex_keeps_unknown_fields() {
        let raw = json!({
            "id": "v1",
            "sandboxStatus": "PUBLIC",
            "properties": [],
            "score": 0.7,
            "conceptType": "person"
        });
        let vertex: Vertex = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(vertex.sandbox_status, SandboxStatus::Public);
        assert_eq!(vertex.extra.get("conceptType"), Some(&json!("person")));
        assert_eq!(serde_json::to_value(&vertex).unwrap(), raw);
    }

    #[test]
    fn sandbox_status_carries_unknown_values() {
        let status: SandboxStatus = serde_json::from_value(json!("ARCHIVED")).unwrap();
        assert_eq!(status, SandboxStatus::Other("ARCHIVED".to_string()));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("ARCHIVED"));
    }

    #[test]
    fn edge_requires_edge_tag() {
        let ok = json!({"id": "e1", "type": "edge", "label": "knows", "source": "v1", "target": "v2"});
        assert!(serde_json::from_value::<Edge>(ok).is_ok());

        let wrong = json!({"id": "e1", "type": "vertex", "label": "knows", "source": "v1", "target": "v2"});
        assert!(serde_json::from_value::<Edge>(wrong).is_err());
    }

    #[test]
    fn metadata_equality_ignores_key_order() {
        let a = PropertyValue::new("name", "x")
            .with_metadata("a", 1)
            .with_metadata("b", 2);
        let b = PropertyValue::new("name", "x")
            .with_metadata("b", 2)
            .with_metadata("a", 1);
        assert_eq!(a, b);
    }

    #[test]
    fn property_payload_is_kept_verbatim() {
        let raw = json!({
            "id": "v2",
            "sandboxStatus": "PUBLIC",
            "properties": [
                {"key": "k", "name": "title"},
                {"key": "k2", "value": 1},
                "not even an object"
            ]
        });
        let vertex: Vertex = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(vertex.properties[0].name(), Some("title"));
        assert!(vertex.properties[0].value().is_none());
        assert!(vertex.properties[1].name().is_none());
        assert_eq!(vertex.properties[1].key(), Some("k2"));
        assert!(vertex.properties[2].metadata("anything").is_none());
        assert_eq!(serde_json::to_value(&vertex).unwrap(), raw);
    }

    #[test]
    fn with_metadata_creates_the_map_once() {
        let property = PropertyValue::new("n", "x")
            .with_metadata("a", 1)
            .with_metadata("b", 2);
        assert_eq!(
            property.as_value(),
            &json!({"name": "n", "value": "x", "metadata": {"a": 1, "b": 2}})
        );
    }

    #[test]
    fn property_order_is_significant() {
        let p1 = PropertyValue::new("a", 1);
        let p2 = PropertyValue::new("b", 2);
        let left = Vertex::new("v1", SandboxStatus::Public)
            .with_property(p1.clone())
            .with_property(p2.clone());
        let right = Vertex::new("v1", SandboxStatus::Public)
            .with_property(p2)
            .with_property(p1);
        assert_ne!(left, right);
    }

    #[test]
    fn strip_fields_counts_removed() {
        let mut vertex = Vertex::new("v1", SandboxStatus::Private).with_field("score", 1.5);
        let removed = vertex.strip_fields(&["score".to_string(), "missing".to_string()]);
        assert_eq!(removed, 1);
        assert!(vertex.extra.is_empty());
    }
}
