use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};
use crate::infrastructure::config::OllamaConfig;

/// Maximum characters to send per text to the embedding API. mxbai-embed-large
/// has a 512-token window and Ollama's `truncate` flag is known to still
/// return 400 for grossly oversized inputs, so inputs are capped client-side.
const MAX_EMBED_CHARS: usize = 3_000;

/// Ollama batches happily, but very large batches inflate request latency;
/// 32 inputs per call keeps requests small.
const BATCH_SIZE: usize = 32;

/// Embedding client for Ollama's `/api/embed` endpoint.
pub struct OllamaEmbedding {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimension: usize,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
    /// Ask Ollama to silently truncate inputs that exceed the model's
    /// context length instead of returning a 400 error.
    truncate: bool,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbedding {
    pub fn new(client: reqwest::Client, config: &OllamaConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            model: config.embedding_model.clone(),
            dimension: config.embedding_dimension,
        }
    }

    async fn embed_call(&self, inputs: Vec<&str>) -> Result<Vec<Embedding>, DomainError> {
        let url = format!("{}/api/embed", self.base_url);
        let request = EmbedRequest {
            model: &self.model,
            input: inputs,
            truncate: true,
        };

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::external(format!("Ollama embed request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::external(format!(
                "Ollama embed API returned {status}: {body}"
            )));
        }

        let body: EmbedResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::external(format!("Invalid Ollama embed response: {e}")))?;

        Ok(body.embeddings.into_iter().map(Embedding::new).collect())
    }
}

/// Truncate `text` to at most `MAX_EMBED_CHARS` bytes on a UTF-8 boundary.
fn truncate_for_embedding(text: &str) -> &str {
    if text.len() <= MAX_EMBED_CHARS {
        return text;
    }
    let mut end = MAX_EMBED_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[async_trait]
impl EmbeddingService for OllamaEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        self.embed_batch(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::external("Ollama returned no embedding"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let truncated: Vec<&str> = texts.iter().map(|t| truncate_for_embedding(t)).collect();

        let mut all = Vec::with_capacity(truncated.len());
        for batch in truncated.chunks(BATCH_SIZE) {
            let embeddings = self.embed_call(batch.to_vec()).await?;
            if embeddings.len() != batch.len() {
                return Err(DomainError::external(format!(
                    "Ollama returned {} embeddings for {} inputs",
                    embeddings.len(),
                    batch.len()
                )));
            }
            all.extend(embeddings);
        }

        Ok(all)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
