//! Identifier types shared by the store and the worker
//!
//! - [`WorkspaceId`] partitions every cache
//! - [`UserId`] identifies the signed-in user
//! - [`EntityKind`] selects between the vertex and edge caches

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Opaque workspace identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(String);

impl WorkspaceId {
    /// Wrap a raw workspace id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkspaceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for WorkspaceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for WorkspaceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Opaque user identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a raw user id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Kind of graph entity held by a workspace cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Graph vertex
    Vertex,
    /// Graph edge
    Edge,
}

impl EntityKind {
    /// Wire name of the kind
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Edge => "edge",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vertex" => Ok(Self::Vertex),
            "edge" => Ok(Self::Edge),
            other => Err(StoreError::InvalidKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_kind_parses_wire_names() {
        assert_eq!("vertex".parse::<EntityKind>().unwrap(), EntityKind::Vertex);
        assert_eq!("edge".parse::<EntityKind>().unwrap(), EntityKind::Edge);
    }

    #[test]
    fn entity_kind_rejects_other_names() {
        for name in ["vertices", "Vertex", "", "edges", "property"] {
            let err = name.parse::<EntityKind>().unwrap_err();
            assert!(matches!(err, StoreError::InvalidKind(ref k) if k == name));
        }
    }

    #[test]
    fn workspace_id_is_transparent_on_the_wire() {
        let id = WorkspaceId::new("WORKSPACE_1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"WORKSPACE_1\"");
        assert_eq!(id.to_string(), "WORKSPACE_1");
    }
}
