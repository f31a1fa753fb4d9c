//! Capability interface over the editor's object graph.
//!
//! The scanner never talks to an editor directly. Everything it needs (listing
//! canvas nodes, listing collections and their items, writing properties back)
//! goes through [`Host`], which keeps the core logic testable against an
//! in-memory fake and keeps "this editor has no collections" at the adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Property bag of a node, or field data of a collection item.
pub type FieldMap = BTreeMap<String, Value>;

/// A canvas node and its readable properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
    /// Host identifier used for property updates.
    pub id: String,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Readable properties, including the image slots.
    #[serde(default)]
    pub properties: FieldMap,
}

/// A structured-content collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    /// Host identifier used to list and patch items.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// One record inside a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionItem {
    /// Host identifier of the item.
    pub id: String,
    /// Every field value carried by the item.
    #[serde(rename = "fieldData", default)]
    pub field_data: FieldMap,
}

/// Failures raised by host mutations.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The host does not expose the requested capability.
    #[error("host does not support {0}")]
    Unsupported(&'static str),
    /// No node with the given id exists.
    #[error("node {0} not found")]
    NodeNotFound(String),
    /// No item with the given id exists in the collection.
    #[error("item {item} not found in collection {collection}")]
    ItemNotFound {
        /// Collection that was searched.
        collection: String,
        /// Item id that was requested.
        item: String,
    },
    /// The host refused the mutation.
    #[error("host rejected update: {0}")]
    Rejected(String),
    /// Reading or writing a project document failed.
    #[error("project io error: {0}")]
    Io(#[from] std::io::Error),
    /// A project document could not be encoded or decoded.
    #[error("project json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Editor capabilities consumed by the collector and the replacer.
///
/// Enumerations are infallible: an editor that lacks a capability keeps the
/// default and reports an empty sequence. Mutations default to
/// [`HostError::Unsupported`].
#[async_trait]
pub trait Host: Send + Sync {
    /// Lists every canvas node.
    async fn nodes(&self) -> Vec<CanvasNode> {
        Vec::new()
    }

    /// Writes `properties` onto the node, leaving other properties untouched.
    async fn update_node(&self, node_id: &str, properties: FieldMap) -> Result<(), HostError> {
        let _ = (node_id, properties);
        Err(HostError::Unsupported("node updates"))
    }

    /// Lists every collection.
    async fn collections(&self) -> Vec<CollectionRef> {
        Vec::new()
    }

    /// Lists the items of one collection.
    async fn items(&self, collection_id: &str) -> Vec<CollectionItem> {
        let _ = collection_id;
        Vec::new()
    }

    /// Replaces the complete field set of an item.
    async fn set_item_fields(
        &self,
        collection_id: &str,
        item_id: &str,
        fields: FieldMap,
    ) -> Result<(), HostError> {
        let _ = (collection_id, item_id, fields);
        Err(HostError::Unsupported("item updates"))
    }
}
