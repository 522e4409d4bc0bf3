use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::domain::{ports::VectorStore, DocumentChunk, DomainError, Embedding, SearchResult};

/// Process-local vector index: one linear-scan list per collection. The
/// default backend, so the service runs without any external store.
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Vec<(DocumentChunk, Embedding)>>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(
        &self,
        collection: &str,
        chunk: &DocumentChunk,
        embedding: &Embedding,
    ) -> Result<(), DomainError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let store = collections.entry(collection.to_string()).or_default();
        store.retain(|(c, _)| c.id != chunk.id);
        store.push((chunk.clone(), embedding.clone()));
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let collections = self
            .collections
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let Some(store) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut results: Vec<SearchResult> = store
            .iter()
            .map(|(chunk, embedding)| SearchResult {
                chunk: chunk.clone(),
                score: query.cosine_similarity(embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        results.truncate(top_k);
        Ok(results)
    }

    async fn delete_by_document(
        &self,
        collection: &str,
        document_id: Uuid,
    ) -> Result<(), DomainError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        if let Some(store) = collections.get_mut(collection) {
            store.retain(|(chunk, _)| chunk.document_id != document_id);
        }
        Ok(())
    }

    async fn delete_collection(&self, collection: &str) -> Result<(), DomainError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        collections.remove(collection);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_and_search() {
        let store = InMemoryVectorStore::new();
        let doc_id = Uuid::new_v4();

        let chunk = DocumentChunk::new(doc_id, "test content", 0);
        let embedding = Embedding::new(vec![1.0, 0.0, 0.0]);

        store.upsert("org_a", &chunk, &embedding).await.unwrap();

        let query = Embedding::new(vec![1.0, 0.0, 0.0]);
        let results = store.search("org_a", &query, 1).await.unwrap();

        assert_eq!(results.len(), 1);
        assert!((results[0].score - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = InMemoryVectorStore::new();
        let chunk = DocumentChunk::new(Uuid::new_v4(), "secret", 0);
        let embedding = Embedding::new(vec![1.0, 0.0, 0.0]);

        store.upsert("org_a", &chunk, &embedding).await.unwrap();

        let query = Embedding::new(vec![1.0, 0.0, 0.0]);
        let other = store.search("org_b", &query, 10).await.unwrap();
        assert!(other.is_empty());

        let own = store.search("org_a", &query, 10).await.unwrap();
        assert_eq!(own.len(), 1);
    }

    #[tokio::test]
    async fn test_search_unknown_collection_is_empty() {
        let store = InMemoryVectorStore::new();
        let query = Embedding::new(vec![1.0]);
        let results = store.search("nope", &query, 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_chunk() {
        let store = InMemoryVectorStore::new();
        let doc_id = Uuid::new_v4();
        let chunk = DocumentChunk::new(doc_id, "v1", 0);

        store
            .upsert("org_a", &chunk, &Embedding::new(vec![1.0, 0.0]))
            .await
            .unwrap();
        let mut updated = chunk.clone();
        updated.content = "v2".to_string();
        store
            .upsert("org_a", &updated, &Embedding::new(vec![0.0, 1.0]))
            .await
            .unwrap();

        let results = store
            .search("org_a", &Embedding::new(vec![0.0, 1.0]), 10)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.content, "v2");
    }

    #[tokio::test]
    async fn test_delete_by_document() {
        let store = InMemoryVectorStore::new();
        let doc_id = Uuid::new_v4();

        let chunk = DocumentChunk::new(doc_id, "test", 0);
        let embedding = Embedding::new(vec![1.0, 0.0, 0.0]);

        store.upsert("org_a", &chunk, &embedding).await.unwrap();
        store.delete_by_document("org_a", doc_id).await.unwrap();

        let query = Embedding::new(vec![1.0, 0.0, 0.0]);
        let results = store.search("org_a", &query, 10).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_delete_collection() {
        let store = InMemoryVectorStore::new();
        let chunk = DocumentChunk::new(Uuid::new_v4(), "gone", 0);
        store
            .upsert("org_a", &chunk, &Embedding::new(vec![1.0]))
            .await
            .unwrap();

        store.delete_collection("org_a").await.unwrap();

        let results = store
            .search("org_a", &Embedding::new(vec![1.0]), 10)
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
