use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::{EmbeddingService, VectorStore},
    DocumentChunk, DomainError, SearchResult,
};

/// Upserts per indexing batch that may be in flight at once.
const UPSERT_CONCURRENCY: usize = 8;

/// Retrieval plumbing: embeds queries and chunks, talks to the vector store.
/// Every operation is scoped to a collection (one per organization).
pub struct RagService {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
    default_top_k: usize,
}

impl RagService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        vector_store: Arc<dyn VectorStore>,
        default_top_k: usize,
    ) -> Self {
        Self {
            embedding,
            vector_store,
            default_top_k,
        }
    }

    #[instrument(skip(self, query))]
    pub async fn retrieve(
        &self,
        collection: &str,
        query: &str,
    ) -> Result<Vec<SearchResult>, DomainError> {
        self.retrieve_top_k(collection, query, self.default_top_k)
            .await
    }

    #[instrument(skip(self, query))]
    pub async fn retrieve_top_k(
        &self,
        collection: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let embedding = self.embedding.embed(query).await?;
        self.vector_store.search(collection, &embedding, top_k).await
    }

    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    pub async fn index_chunks(
        &self,
        collection: &str,
        chunks: &[DocumentChunk],
    ) -> Result<(), DomainError> {
        if chunks.is_empty() {
            return Ok(());
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let embeddings = self.embedding.embed_batch(&texts).await?;

        let upserts: Vec<_> = chunks
            .iter()
            .zip(embeddings.iter())
            .map(|(chunk, embedding)| self.vector_store.upsert(collection, chunk, embedding))
            .collect();
        stream::iter(upserts)
            .buffer_unordered(UPSERT_CONCURRENCY)
            .try_collect::<Vec<()>>()
            .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_document(
        &self,
        collection: &str,
        document_id: uuid::Uuid,
    ) -> Result<(), DomainError> {
        self.vector_store
            .delete_by_document(collection, document_id)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_collection(&self, collection: &str) -> Result<(), DomainError> {
        self.vector_store.delete_collection(collection).await
    }
}
