use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::application::RagService;
use crate::domain::{
    ports::{LlmService, SessionStore},
    DomainError, Message, SearchResult,
};
use crate::infrastructure::PromptsConfig;

#[derive(Debug)]
pub struct ChatOutcome {
    pub answer: String,
    pub sources: Vec<SearchResult>,
}

/// One chat turn: session history + retrieved context + question go into
/// the prompt; the exchange is appended to the session afterwards. History
/// is only updated when generation succeeds, so a failed turn can simply be
/// retried.
pub struct ChatService {
    rag: Arc<RagService>,
    llm: Arc<dyn LlmService>,
    sessions: Arc<dyn SessionStore>,
    prompts: PromptsConfig,
    top_k: usize,
    timeout: Duration,
}

impl ChatService {
    pub fn new(
        rag: Arc<RagService>,
        llm: Arc<dyn LlmService>,
        sessions: Arc<dyn SessionStore>,
        prompts: PromptsConfig,
        top_k: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            rag,
            llm,
            sessions,
            prompts,
            top_k,
            timeout,
        }
    }

    #[instrument(skip(self, question))]
    pub async fn chat(
        &self,
        organization_id: &str,
        session_id: &str,
        question: &str,
    ) -> Result<ChatOutcome, DomainError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DomainError::validation("Question is required"));
        }
        if session_id.trim().is_empty() {
            return Err(DomainError::validation("Session id is required"));
        }

        let history = self.sessions.history(session_id).await?;
        let sources = self
            .rag
            .retrieve_top_k(organization_id, question, self.top_k)
            .await?;

        let prompt = self.prompts.render_chat(
            &history.render_transcript(),
            &render_context(&sources),
            question,
        );

        let answer = tokio::time::timeout(
            self.timeout,
            self.llm.complete_with_system(&self.prompts.system, &prompt),
        )
        .await
        .map_err(|_| DomainError::timeout("LLM generation timed out"))??;

        self.sessions
            .append(
                session_id,
                Message::user(question),
                Message::assistant(&answer),
            )
            .await?;

        Ok(ChatOutcome { answer, sources })
    }
}

/// Numbered context block fed into the prompt, one entry per retrieved chunk.
fn render_context(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "(no matching document content)".to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("[{}] {}", i + 1, r.chunk.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
