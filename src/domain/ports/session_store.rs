use crate::domain::{errors::DomainError, Conversation, Message};
use async_trait::async_trait;

/// Per-session conversation memory. Histories grow without bound and only
/// live as long as the backing store does.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the transcript for `session_id`, or an empty conversation if
    /// the session has never been seen.
    async fn history(&self, session_id: &str) -> Result<Conversation, DomainError>;

    /// Appends one question/answer exchange, creating the session if needed.
    async fn append(
        &self,
        session_id: &str,
        user: Message,
        assistant: Message,
    ) -> Result<(), DomainError>;
}
