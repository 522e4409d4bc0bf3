use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::application::RagService;
use crate::domain::{
    ports::DocumentStore, split_text, Document, DocumentChunk, DomainError,
};

/// Turns extracted document text into indexed chunks for one organization.
/// Callers are responsible for getting text out of the uploaded file first
/// (see `infrastructure::pdf`).
pub struct IngestService {
    rag: Arc<RagService>,
    documents: Arc<dyn DocumentStore>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl IngestService {
    pub fn new(
        rag: Arc<RagService>,
        documents: Arc<dyn DocumentStore>,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Self {
        Self {
            rag,
            documents,
            chunk_size,
            chunk_overlap,
        }
    }

    #[instrument(skip(self, content))]
    pub async fn ingest(
        &self,
        organization_id: &str,
        name: &str,
        content: &str,
    ) -> Result<Document, DomainError> {
        let doc = Document::new(organization_id, name);

        let splits = split_text(content, self.chunk_size, self.chunk_overlap);
        if splits.is_empty() {
            return Err(DomainError::validation("Document produced no chunks"));
        }

        let chunks: Vec<DocumentChunk> = splits
            .into_iter()
            .enumerate()
            .map(|(i, content)| DocumentChunk::new(doc.id, content, i))
            .collect();

        self.rag.index_chunks(organization_id, &chunks).await?;

        let doc = doc.with_chunk_count(chunks.len());
        self.documents.save_document(&doc).await?;

        tracing::info!(
            organization_id,
            document_id = %doc.id,
            chunks = doc.chunk_count,
            "document indexed"
        );
        Ok(doc)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, organization_id: &str) -> Result<Vec<Document>, DomainError> {
        self.documents.list_documents(organization_id).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, organization_id: &str, id: Uuid) -> Result<(), DomainError> {
        self.documents.delete_document(organization_id, id).await?;
        self.rag.delete_document(organization_id, id).await
    }
}
