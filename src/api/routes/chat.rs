use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::routes::into_response_error;
use crate::api::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub organization_id: String,
    pub session_id: String,
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub sources: Vec<SourceResponse>,
}

#[derive(Debug, Serialize)]
pub struct SourceResponse {
    pub chunk_id: Uuid,
    pub document_id: Uuid,
    pub content: String,
    pub score: f32,
}

/// One conversational turn against an organization's documents.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    let outcome = state
        .chat
        .chat(
            &request.organization_id,
            &request.session_id,
            &request.question,
        )
        .await
        .map_err(into_response_error)?;

    Ok(Json(ChatResponse {
        answer: outcome.answer,
        sources: outcome
            .sources
            .into_iter()
            .map(|r| SourceResponse {
                chunk_id: r.chunk.id,
                document_id: r.chunk.document_id,
                content: r.chunk.content,
                score: r.score,
            })
            .collect(),
    }))
}
