//! UI-side reconciliation of `storeObjectsUpdated`
//!
//! Views hold a copy of the entity they display and swap it out when an
//! update carries the same id. Comment threads are rebuilt from the
//! refreshed property list.

use lumify_store::{Entity, MainMessage, ObjectsUpdated, PropertyValue};
use serde_json::Value;
use std::cmp::Ordering;

/// Property name of comment entries
pub const COMMENT_PROPERTY: &str = "http://lumify.io/comment#entry";
/// Metadata key of the creation timestamp
pub const CREATE_DATE: &str = "http://lumify.io#createDate";
/// Metadata key of the last modification timestamp
pub const MODIFIED_DATE: &str = "http://lumify.io#modifiedDate";
/// Metadata key of the last author
pub const MODIFIED_BY: &str = "http://lumify.io#modifiedBy";
/// Metadata key of the visibility descriptor
pub const VISIBILITY_JSON: &str = "http://lumify.io#visibilityJson";

/// Entity currently shown by a view
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedObject {
    entity: Entity,
}

impl TrackedObject {
    /// Track an entity
    #[must_use]
    pub fn new(entity: impl Into<Entity>) -> Self {
        Self {
            entity: entity.into(),
        }
    }

    /// Displayed entity
    #[inline]
    #[must_use]
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Replace the entity with its copy in `update`, if present
    ///
    /// Only entities of the same kind are considered. Returns whether the
    /// displayed value changed.
    pub fn apply(&mut self, update: &ObjectsUpdated) -> bool {
        let replacement = match &self.entity {
            Entity::Vertex(current) => update
                .vertices
                .iter()
                .flatten()
                .find(|v| v.id == current.id)
                .map(|v| Entity::Vertex(v.clone())),
            Entity::Edge(current) => update
                .edges
                .iter()
                .flatten()
                .find(|e| e.id == current.id)
                .map(|e| Entity::Edge(e.clone())),
        };

        match replacement {
            Some(entity) if entity != self.entity => {
                tracing::trace!(id = entity.id(), "view refreshed");
                self.entity = entity;
                true
            }
            _ => false,
        }
    }

    /// Apply a worker message, ignoring anything but `storeObjectsUpdated`
    pub fn apply_message(&mut self, message: &MainMessage) -> bool {
        match message {
            MainMessage::StoreObjectsUpdated(update) => self.apply(update),
            _ => false,
        }
    }

    /// Comments on the displayed entity
    #[must_use]
    pub fn comments(&self) -> CommentThread {
        match &self.entity {
            Entity::Vertex(vertex) => CommentThread::from_properties(&vertex.properties),
            Entity::Edge(edge) => edge
                .extra
                .get("properties")
                .and_then(|raw| serde_json::from_value::<Vec<PropertyValue>>(raw.clone()).ok())
                .map(|properties| CommentThread::from_properties(&properties))
                .unwrap_or_default(),
        }
    }
}

/// One comment entry
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Comment text
    pub text: String,
    /// Property key distinguishing comments on one entity
    pub key: Option<String>,
    /// Last author
    pub author: Option<String>,
    /// Creation time, epoch millis
    pub created: Option<i64>,
    /// Last modification time, epoch millis
    pub modified: Option<i64>,
    /// Visibility descriptor
    pub visibility: Option<Value>,
}

impl Comment {
    fn from_property(property: &PropertyValue) -> Self {
        let text = match property.value() {
            Some(Value::String(s)) => s.clone(),
            None | Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
        };
        Self {
            text,
            key: property.key().map(str::to_string),
            author: property
                .metadata(MODIFIED_BY)
                .and_then(Value::as_str)
                .map(str::to_string),
            created: property.metadata(CREATE_DATE).and_then(Value::as_i64),
            modified: property.metadata(MODIFIED_DATE).and_then(Value::as_i64),
            visibility: property.metadata(VISIBILITY_JSON).cloned(),
        }
    }

    /// Whether the comment changed after creation
    #[must_use]
    pub fn edited(&self) -> bool {
        self.created != self.modified
    }
}

/// Comments of one entity, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentThread {
    comments: Vec<Comment>,
}

impl CommentThread {
    /// Collect comment entries from a property list
    ///
    /// Entries without a creation date sort last, in property order.
    #[must_use]
    pub fn from_properties(properties: &[PropertyValue]) -> Self {
        let mut comments: Vec<Comment> = properties
            .iter()
            .filter(|p| p.name() == Some(COMMENT_PROPERTY))
            .map(Comment::from_property)
            .collect();
        comments.sort_by(|a, b| match (a.created, b.created) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        Self { comments }
    }

    /// Comments, oldest first
    #[inline]
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Number of comments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    /// Check if there are no comments
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Iterate comments, oldest first
    pub fn iter(&self) -> std::slice::Iter<'_, Comment> {
        self.comments.iter()
    }
}

impl<'a> IntoIterator for &'a CommentThread {
    type Item = &'a Comment;
    type IntoIter = std::slice::Iter<'a, Comment>;

    fn into_iter(self) -> Self::IntoIter {
        self.comments.iter()
    }
}
