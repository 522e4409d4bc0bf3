use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::domain::{ports::DocumentStore, Document, DomainError};

/// Process-local registry of document metadata, grouped by organization.
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, Vec<Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn save_document(&self, doc: &Document) -> Result<(), DomainError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let docs = documents.entry(doc.organization_id.clone()).or_default();
        docs.retain(|d| d.id != doc.id);
        docs.push(doc.clone());
        Ok(())
    }

    async fn list_documents(&self, organization_id: &str) -> Result<Vec<Document>, DomainError> {
        let documents = self
            .documents
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        Ok(documents.get(organization_id).cloned().unwrap_or_default())
    }

    async fn get_document(
        &self,
        organization_id: &str,
        id: Uuid,
    ) -> Result<Option<Document>, DomainError> {
        let documents = self
            .documents
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        Ok(documents
            .get(organization_id)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned()))
    }

    async fn delete_document(&self, organization_id: &str, id: Uuid) -> Result<(), DomainError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let Some(docs) = documents.get_mut(organization_id) else {
            return Err(DomainError::not_found(format!("document {id}")));
        };

        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            return Err(DomainError::not_found(format!("document {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_list_scoped_by_org() {
        let store = InMemoryDocumentStore::new();
        let doc = Document::new("org_a", "manual.pdf");
        store.save_document(&doc).await.unwrap();

        assert_eq!(store.list_documents("org_a").await.unwrap().len(), 1);
        assert!(store.list_documents("org_b").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let store = InMemoryDocumentStore::new();
        let err = store
            .delete_document("org_a", Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let store = InMemoryDocumentStore::new();
        let doc = Document::new("org_a", "manual.pdf");
        store.save_document(&doc).await.unwrap();

        let fetched = store.get_document("org_a", doc.id).await.unwrap();
        assert!(fetched.is_some());

        store.delete_document("org_a", doc.id).await.unwrap();
        assert!(store.get_document("org_a", doc.id).await.unwrap().is_none());
    }
}
