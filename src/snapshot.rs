//! JSON project documents exposed through the [`Host`] interface.

use crate::host::{CanvasNode, CollectionItem, CollectionRef, FieldMap, Host, HostError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Serialized form of a project: canvas nodes plus collections with items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Canvas nodes; absent in documents exported without a canvas.
    #[serde(default)]
    pub nodes: Vec<CanvasNode>,
    /// Collections; absent in documents exported without structured content.
    #[serde(default)]
    pub collections: Vec<StoredCollection>,
}

/// A collection together with its items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCollection {
    /// Collection identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Items in host order.
    #[serde(default)]
    pub items: Vec<CollectionItem>,
}

/// In-memory host backed by a [`ProjectDocument`].
#[derive(Debug, Default)]
pub struct ProjectSnapshot {
    document: Mutex<ProjectDocument>,
}

impl ProjectSnapshot {
    /// Wraps an existing document.
    pub fn new(document: ProjectDocument) -> Self {
        Self {
            document: Mutex::new(document),
        }
    }

    /// Parses a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, HostError> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    /// Reads a document from disk.
    pub fn load(path: &Path) -> Result<Self, HostError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Pretty-printed JSON of the current document.
    pub fn to_json(&self) -> Result<String, HostError> {
        Ok(serde_json::to_string_pretty(&*self.lock())?)
    }

    /// Writes the current document to disk.
    pub fn save(&self, path: &Path) -> Result<(), HostError> {
        let mut text = self.to_json()?;
        text.push('\n');
        fs::write(path, text)?;
        Ok(())
    }

    /// Clone of the current document.
    pub fn document(&self) -> ProjectDocument {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ProjectDocument> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Host for ProjectSnapshot {
    async fn nodes(&self) -> Vec<CanvasNode> {
        self.lock().nodes.clone()
    }

    async fn update_node(&self, node_id: &str, properties: FieldMap) -> Result<(), HostError> {
        let mut document = self.lock();
        let node = document
            .nodes
            .iter_mut()
            .find(|node| node.id == node_id)
            .ok_or_else(|| HostError::NodeNotFound(node_id.to_string()))?;
        node.properties.extend(properties);
        Ok(())
    }

    async fn collections(&self) -> Vec<CollectionRef> {
        self.lock()
            .collections
            .iter()
            .map(|collection| CollectionRef {
                id: collection.id.clone(),
                name: collection.name.clone(),
            })
            .collect()
    }

    async fn items(&self, collection_id: &str) -> Vec<CollectionItem> {
        self.lock()
            .collections
            .iter()
            .find(|collection| collection.id == collection_id)
            .map(|collection| collection.items.clone())
            .unwrap_or_default()
    }

    async fn set_item_fields(
        &self,
        collection_id: &str,
        item_id: &str,
        fields: FieldMap,
    ) -> Result<(), HostError> {
        let mut document = self.lock();
        let item = document
            .collections
            .iter_mut()
            .find(|collection| collection.id == collection_id)
            .and_then(|collection| collection.items.iter_mut().find(|item| item.id == item_id))
            .ok_or_else(|| HostError::ItemNotFound {
                collection: collection_id.to_string(),
                item: item_id.to_string(),
            })?;
        item.field_data = fields;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const DOC: &str = r#"{
        "nodes": [
            { "id": "n1", "properties": { "image": "https://framerusercontent.com/a.png", "opacity": 1 } }
        ],
        "collections": [
            { "id": "posts", "name": "Posts", "items": [
                { "id": "p1", "fieldData": { "title": "Hello", "cover": "https://framerusercontent.com/a.png" } }
            ] }
        ]
    }"#;

    #[test]
    fn missing_sections_load_as_empty() {
        let snapshot = ProjectSnapshot::from_json("{}").expect("empty document");
        assert_eq!(snapshot.document(), ProjectDocument::default());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn node_update_merges_properties() {
        let snapshot = ProjectSnapshot::from_json(DOC).expect("document");
        let mut patch = FieldMap::new();
        patch.insert("src".into(), json!("https://framerusercontent.com/b.png"));
        snapshot.update_node("n1", patch).await.expect("update");

        let node = &snapshot.nodes().await[0];
        assert_eq!(node.properties["opacity"], json!(1));
        assert_eq!(
            node.properties["src"],
            json!("https://framerusercontent.com/b.png")
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn item_update_replaces_field_set() {
        let snapshot = ProjectSnapshot::from_json(DOC).expect("document");
        let mut fields = FieldMap::new();
        fields.insert("title".into(), json!("Renamed"));
        snapshot
            .set_item_fields("posts", "p1", fields.clone())
            .await
            .expect("update");
        assert_eq!(snapshot.items("posts").await[0].field_data, fields);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn unknown_targets_are_reported() {
        let snapshot = ProjectSnapshot::from_json(DOC).expect("document");
        assert!(matches!(
            snapshot.update_node("ghost", FieldMap::new()).await,
            Err(HostError::NodeNotFound(id)) if id == "ghost"
        ));
        assert!(matches!(
            snapshot.set_item_fields("posts", "ghost", FieldMap::new()).await,
            Err(HostError::ItemNotFound { .. })
        ));
        assert!(snapshot.items("missing").await.is_empty());
    }

    #[test]
    fn save_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("project.json");
        let snapshot = ProjectSnapshot::from_json(DOC).expect("document");
        snapshot.save(&path).expect("save");

        let reloaded = ProjectSnapshot::load(&path).expect("load");
        assert_eq!(reloaded.document(), snapshot.document());
    }
}
