use crate::domain::{errors::DomainError, Document};
use async_trait::async_trait;
use uuid::Uuid;

/// Registry of uploaded-document metadata, keyed by organization.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn save_document(&self, doc: &Document) -> Result<(), DomainError>;
    async fn list_documents(&self, organization_id: &str) -> Result<Vec<Document>, DomainError>;
    async fn get_document(
        &self,
        organization_id: &str,
        id: Uuid,
    ) -> Result<Option<Document>, DomainError>;
    async fn delete_document(&self, organization_id: &str, id: Uuid) -> Result<(), DomainError>;
}
