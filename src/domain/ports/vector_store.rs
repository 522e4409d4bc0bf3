use crate::domain::{errors::DomainError, DocumentChunk, Embedding, SearchResult};
use async_trait::async_trait;
use uuid::Uuid;

/// Vector index scoped by collection. Each organization gets its own
/// collection, named after its id; that naming convention is the whole of
/// the tenant-isolation scheme.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn upsert(
        &self,
        collection: &str,
        chunk: &DocumentChunk,
        embedding: &Embedding,
    ) -> Result<(), DomainError>;

    /// Searching a collection that was never written to returns an empty
    /// result set, not an error.
    async fn search(
        &self,
        collection: &str,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError>;

    async fn delete_by_document(
        &self,
        collection: &str,
        document_id: Uuid,
    ) -> Result<(), DomainError>;

    async fn delete_collection(&self, collection: &str) -> Result<(), DomainError>;
}
