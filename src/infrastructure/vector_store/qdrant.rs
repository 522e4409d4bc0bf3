use async_trait::async_trait;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter, PointStruct,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use std::collections::HashSet;
use std::sync::RwLock;
use uuid::Uuid;

use crate::domain::{ports::VectorStore, DocumentChunk, DomainError, Embedding, SearchResult};

/// Qdrant-backed vector index. Collections are created lazily, one per
/// organization, all with the same dimension and cosine distance.
pub struct QdrantVectorStore {
    client: Qdrant,
    dimension: usize,
    known_collections: RwLock<HashSet<String>>,
}

impl QdrantVectorStore {
    pub async fn new(url: &str, dimension: usize) -> Result<Self, DomainError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| DomainError::external(e.to_string()))?;

        let store = Self {
            client,
            dimension,
            known_collections: RwLock::new(HashSet::new()),
        };

        // Fail fast on an unreachable Qdrant rather than on the first upload.
        store.refresh_known().await?;

        Ok(store)
    }

    async fn refresh_known(&self) -> Result<(), DomainError> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        let mut known = self
            .known_collections
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        for c in collections.collections {
            known.insert(c.name);
        }
        Ok(())
    }

    fn is_known(&self, collection: &str) -> Result<bool, DomainError> {
        Ok(self
            .known_collections
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?
            .contains(collection))
    }

    fn mark_known(&self, collection: &str) -> Result<(), DomainError> {
        self.known_collections
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?
            .insert(collection.to_string());
        Ok(())
    }

    async fn ensure_collection(&self, collection: &str) -> Result<(), DomainError> {
        if self.is_known(collection)? {
            return Ok(());
        }

        let exists = self
            .client
            .collection_exists(collection)
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        if !exists {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(collection).vectors_config(
                        VectorParamsBuilder::new(self.dimension as u64, Distance::Cosine),
                    ),
                )
                .await
                .map_err(|e| DomainError::external(e.to_string()))?;
        }

        self.mark_known(collection)
    }

    fn uuid_to_point_id(id: Uuid) -> u64 {
        let bytes = id.as_bytes();
        u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ])
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn upsert(
        &self,
        collection: &str,
        chunk: &DocumentChunk,
        embedding: &Embedding,
    ) -> Result<(), DomainError> {
        self.ensure_collection(collection).await?;

        let payload: Payload = serde_json::json!({
            "chunk_id": chunk.id.to_string(),
            "document_id": chunk.document_id.to_string(),
            "content": chunk.content,
            "chunk_index": chunk.chunk_index,
            "page": chunk.metadata.page,
        })
        .try_into()
        .map_err(|_| DomainError::internal("Failed to create payload"))?;

        let point = PointStruct::new(
            Self::uuid_to_point_id(chunk.id),
            embedding.as_slice().to_vec(),
            payload,
        );

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, vec![point]))
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        if !self.is_known(collection)? {
            let exists = self
                .client
                .collection_exists(collection)
                .await
                .map_err(|e| DomainError::external(e.to_string()))?;
            if !exists {
                return Ok(Vec::new());
            }
            self.mark_known(collection)?;
        }

        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, query.as_slice().to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        let search_results: Vec<SearchResult> = results
            .result
            .into_iter()
            .filter_map(|point| {
                let payload = point.payload;

                let chunk_id: Uuid = payload.get("chunk_id")?.as_str()?.parse().ok()?;
                let document_id: Uuid = payload.get("document_id")?.as_str()?.parse().ok()?;
                let content = payload.get("content")?.as_str()?.to_string();
                let chunk_index = payload.get("chunk_index")?.as_integer()? as usize;
                let page = payload
                    .get("page")
                    .and_then(|v| v.as_integer())
                    .map(|p| p as usize);

                let mut chunk = DocumentChunk {
                    id: chunk_id,
                    document_id,
                    content,
                    chunk_index,
                    metadata: Default::default(),
                };
                chunk.metadata.page = page;

                Some(SearchResult {
                    chunk,
                    score: point.score,
                })
            })
            .collect();

        Ok(search_results)
    }

    async fn delete_by_document(
        &self,
        collection: &str,
        document_id: Uuid,
    ) -> Result<(), DomainError> {
        if !self.is_known(collection)? {
            return Ok(());
        }

        let filter = Filter::must([Condition::matches(
            "document_id",
            document_id.to_string(),
        )]);

        self.client
            .delete_points(DeletePointsBuilder::new(collection).points(filter))
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        Ok(())
    }

    async fn delete_collection(&self, collection: &str) -> Result<(), DomainError> {
        self.client
            .delete_collection(collection)
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        self.known_collections
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?
            .remove(collection);
        Ok(())
    }
}
