use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::{ports::SessionStore, Conversation, DomainError, Message};

/// Process-local conversation memory. Unbounded, no expiry, lost on
/// restart. The lock serializes concurrent appends to the same session.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Conversation>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn history(&self, session_id: &str) -> Result<Conversation, DomainError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        Ok(sessions
            .get(session_id)
            .cloned()
            .unwrap_or_else(|| Conversation::new(session_id)))
    }

    async fn append(
        &self,
        session_id: &str,
        user: Message,
        assistant: Message,
    ) -> Result<(), DomainError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let conversation = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Conversation::new(session_id));

        conversation.add_message(user.role, user.content);
        conversation.add_message(assistant.role, assistant.content);
        Ok(())
    }
}
