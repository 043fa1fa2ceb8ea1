//! In-memory backend used in tests and offline development.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::DocumentBackend;
use crate::document::Document;
use crate::error::{Error, Result};

/// A [`DocumentBackend`] backed by process memory.
///
/// Behaves like the hosted store: inserts assign fresh identifiers, patches
/// merge top-level fields and return the merged document, removals of unknown
/// identifiers fail. The `set_offline` switch makes every call fail with
/// [`Error::NotReachable`], which is how failure paths are exercised.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    offline: RwLock<bool>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent calls fail as if the store were unreachable.
    pub async fn set_offline(&self, offline: bool) {
        *self.offline.write().await = offline;
    }

    /// Seed a collection with pre-built documents.
    pub async fn seed(&self, collection: &str, documents: Vec<Document>) {
        self.collections
            .write()
            .await
            .insert(collection.to_string(), documents);
    }

    async fn check_online(&self) -> Result<()> {
        if *self.offline.read().await {
            Err(Error::not_reachable("memory://", "backend is offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        self.check_online().await?;
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn insert(&self, collection: &str, fields: Value) -> Result<Document> {
        self.check_online().await?;
        let document = Document::new(Uuid::new_v4().to_string(), fields);
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document.clone());
        Ok(document)
    }

    async fn patch(&self, collection: &str, id: &str, fields: Value) -> Result<Document> {
        self.check_online().await?;
        let mut collections = self.collections.write().await;
        let documents = collections
            .get_mut(collection)
            .ok_or_else(|| Error::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        let document = documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| Error::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        if let (Value::Object(existing), Value::Object(patch)) =
            (&mut document.fields, fields)
        {
            for (key, value) in patch {
                existing.insert(key, value);
            }
        }

        Ok(document.clone())
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<()> {
        self.check_online().await?;
        let mut collections = self.collections.write().await;
        let documents = collections
            .get_mut(collection)
            .ok_or_else(|| Error::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        let before = documents.len();
        documents.retain(|d| d.id != id);
        if documents.len() == before {
            return Err(Error::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_assigns_unique_ids() {
        let backend = MemoryBackend::new();
        let a = backend.insert("vehicles", json!({"name": "Zoe"})).await.unwrap();
        let b = backend.insert("vehicles", json!({"name": "208"})).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(backend.list("vehicles").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn patch_merges_top_level_fields() {
        let backend = MemoryBackend::new();
        let doc = backend
            .insert("vehicles", json!({"name": "Zoe", "year": 2021}))
            .await
            .unwrap();

        let merged = backend
            .patch("vehicles", &doc.id, json!({"year": 2022}))
            .await
            .unwrap();

        assert_eq!(merged.fields["name"], "Zoe");
        assert_eq!(merged.fields["year"], 2022);
    }

    #[tokio::test]
    async fn patch_unknown_id_is_not_found() {
        let backend = MemoryBackend::new();
        backend.insert("vehicles", json!({"name": "Zoe"})).await.unwrap();
        let err = backend
            .patch("vehicles", "missing", json!({"year": 2022}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DocumentNotFound { .. }));
    }

    #[tokio::test]
    async fn remove_deletes_exactly_one_document() {
        let backend = MemoryBackend::new();
        let doc = backend.insert("stores", json!({"name": "Leclerc"})).await.unwrap();
        backend.insert("stores", json!({"name": "Auchan"})).await.unwrap();

        backend.remove("stores", &doc.id).await.unwrap();
        assert_eq!(backend.list("stores").await.unwrap().len(), 1);

        let err = backend.remove("stores", &doc.id).await.unwrap_err();
        assert!(matches!(err, Error::DocumentNotFound { .. }));
    }

    #[tokio::test]
    async fn offline_backend_rejects_every_call() {
        let backend = MemoryBackend::new();
        backend.set_offline(true).await;
        let err = backend.list("vehicles").await.unwrap_err();
        assert!(matches!(err, Error::NotReachable { .. }));
    }
}
