use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat session transcript. Sessions are keyed by a caller-supplied id and
/// grow without bound for the life of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_message(&mut self, role: MessageRole, content: impl Into<String>) {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
        self.updated_at = Utc::now();
    }

    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| matches!(m.role, MessageRole::User))
            .map(|m| m.content.as_str())
    }

    /// Renders the transcript in the `Human:` / `AI:` form fed back to the
    /// model as conversational context. Empty for a fresh session.
    pub fn render_transcript(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role.transcript_label(), m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    fn transcript_label(&self) -> &'static str {
        match self {
            Self::System => "System",
            Self::User => "Human",
            Self::Assistant => "AI",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_transcript_empty() {
        let conv = Conversation::new("s1");
        assert_eq!(conv.render_transcript(), "");
    }

    #[test]
    fn test_render_transcript_labels() {
        let mut conv = Conversation::new("s1");
        conv.add_message(MessageRole::User, "hi");
        conv.add_message(MessageRole::Assistant, "hello");

        assert_eq!(conv.render_transcript(), "Human: hi\nAI: hello");
    }

    #[test]
    fn test_last_user_message() {
        let mut conv = Conversation::new("s1");
        conv.add_message(MessageRole::User, "first");
        conv.add_message(MessageRole::Assistant, "answer");
        conv.add_message(MessageRole::User, "second");

        assert_eq!(conv.last_user_message(), Some("second"));
    }
}
