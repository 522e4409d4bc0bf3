use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::routes::into_response_error;
use crate::api::state::AppState;
use crate::domain::{Document, DomainError};
use crate::infrastructure::extract_pdf_text;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub document_id: Uuid,
    pub name: String,
    pub chunks_added: usize,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub name: String,
    pub content_type: String,
    pub chunk_count: usize,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            content_type: doc.content_type,
            chunk_count: doc.chunk_count,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub organization_id: String,
    pub query: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResultResponse {
    pub chunk_id: Uuid,
    pub document_id: Uuid,
    pub content: String,
    pub score: f32,
}

/// Accepts a PDF as the multipart `file` field, extracts its text and
/// indexes it into the organization's collection.
pub async fn upload_document(
    State(state): State<AppState>,
    Path(org_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let mut file_data = None;
    let mut filename = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Malformed upload: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                filename = field.file_name().unwrap_or("document.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| (StatusCode::BAD_REQUEST, format!("Malformed upload: {e}")))?;
                file_data = Some(data);
            }
            _ => continue,
        }
    }

    let file_data = file_data.ok_or((
        StatusCode::BAD_REQUEST,
        "Missing multipart field 'file'".to_string(),
    ))?;

    if !filename.to_ascii_lowercase().ends_with(".pdf") {
        return Err(into_response_error(DomainError::validation(
            "Only PDF uploads are supported",
        )));
    }

    let text = extract_pdf_text(file_data.to_vec())
        .await
        .map_err(into_response_error)?;

    let doc = state
        .ingest
        .ingest(&org_id, &filename, &text)
        .await
        .map_err(into_response_error)?;

    Ok(Json(UploadResponse {
        document_id: doc.id,
        name: doc.name,
        chunks_added: doc.chunk_count,
        message: "Document processed successfully".to_string(),
    }))
}

pub async fn list_documents(
    State(state): State<AppState>,
    Path(org_id): Path<String>,
) -> Result<Json<Vec<DocumentResponse>>, (StatusCode, String)> {
    let docs = state
        .ingest
        .list(&org_id)
        .await
        .map_err(into_response_error)?;

    Ok(Json(docs.into_iter().map(DocumentResponse::from).collect()))
}

/// Removes the document's metadata and its vectors.
pub async fn delete_document(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(String, Uuid)>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .ingest
        .delete(&org_id, id)
        .await
        .map_err(into_response_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Retrieval without generation: ranked chunks for a query.
pub async fn search_documents(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<SearchResultResponse>>, (StatusCode, String)> {
    let top_k = request.limit.unwrap_or(state.config.config.rag.top_k);
    let results = state
        .rag
        .retrieve_top_k(&request.organization_id, &request.query, top_k)
        .await
        .map_err(into_response_error)?;

    Ok(Json(
        results
            .into_iter()
            .map(|r| SearchResultResponse {
                chunk_id: r.chunk.id,
                document_id: r.chunk.document_id,
                content: r.chunk.content,
                score: r.score,
            })
            .collect(),
    ))
}
