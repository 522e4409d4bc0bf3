use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ports::LlmService, DomainError};
use crate::infrastructure::config::OllamaConfig;

/// Chat-completion client for Ollama's `/api/chat` endpoint, non-streaming.
pub struct OllamaChat {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaChat {
    pub fn new(client: reqwest::Client, config: &OllamaConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            model: config.chat_model.clone(),
        }
    }

    async fn chat_call(&self, messages: Vec<WireMessage<'_>>) -> Result<String, DomainError> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::external(format!("Ollama chat request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::external(format!(
                "Ollama chat API returned {status}: {body}"
            )));
        }

        let body: ChatResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::external(format!("Invalid Ollama chat response: {e}")))?;

        Ok(body.message.content)
    }
}

#[async_trait]
impl LlmService for OllamaChat {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        self.chat_call(vec![WireMessage {
            role: "user",
            content: prompt,
        }])
        .await
    }

    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, DomainError> {
        self.chat_call(vec![
            WireMessage {
                role: "system",
                content: system,
            },
            WireMessage {
                role: "user",
                content: prompt,
            },
        ])
        .await
    }
}
