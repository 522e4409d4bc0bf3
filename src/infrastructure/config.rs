use serde::Deserialize;
use std::str::FromStr;

/// Runtime configuration, read from the environment (`.env` is honored by
/// the binaries via `dotenvy`). Every field has a default that matches a
/// local Ollama install, so a bare `cargo run` works.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub ollama: OllamaConfig,
    pub vector: VectorConfig,
    pub rag: RagConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct VectorConfig {
    pub backend: VectorBackend,
    pub qdrant_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorBackend {
    Memory,
    Qdrant,
}

impl FromStr for VectorBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(Self::Memory),
            "qdrant" => Ok(Self::Qdrant),
            other => Err(format!("Unknown vector backend: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RagConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env_or("SERVER_HOST", "0.0.0.0"),
                port: env_parse("SERVER_PORT", 8000)?,
            },
            ollama: OllamaConfig {
                base_url: env_or("OLLAMA_URL", "http://localhost:11434"),
                chat_model: env_or("CHAT_MODEL", "llama3.2"),
                embedding_model: env_or("EMBEDDING_MODEL", "mxbai-embed-large"),
                embedding_dimension: env_parse("EMBEDDING_DIMENSION", 1024)?,
                timeout_seconds: env_parse("LLM_TIMEOUT_SECONDS", 300)?,
            },
            vector: VectorConfig {
                backend: env_parse_with("VECTOR_BACKEND", VectorBackend::Memory)?,
                qdrant_url: env_or("QDRANT_URL", "http://localhost:6334"),
            },
            rag: RagConfig {
                chunk_size: env_parse("CHUNK_SIZE", 1000)?,
                chunk_overlap: env_parse("CHUNK_OVERLAP", 200)?,
                top_k: env_parse("TOP_K", 4)?,
            },
            cors: CorsConfig {
                allowed_origins: env_or("CORS_ALLOWED_ORIGINS", "http://localhost:5173")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
        })
    }
}

/// Prompt texts used by the chat pipeline. Overridable from a YAML file via
/// `PROMPTS_PATH`; the built-in defaults mirror the assistant template the
/// service was designed around.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptsConfig {
    #[serde(default = "default_system_prompt")]
    pub system: String,
    #[serde(default = "default_chat_template")]
    pub chat_template: String,
}

impl PromptsConfig {
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("PROMPTS_PATH") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)?;
                let prompts = serde_yaml::from_str(&raw)?;
                Ok(prompts)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    /// Fills the chat template. `{chat_history}`, `{context}` and
    /// `{question}` are the only recognized placeholders.
    pub fn render_chat(&self, chat_history: &str, context: &str, question: &str) -> String {
        self.chat_template
            .replace("{chat_history}", chat_history)
            .replace("{context}", context)
            .replace("{question}", question)
    }
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            system: default_system_prompt(),
            chat_template: default_chat_template(),
        }
    }
}

fn default_system_prompt() -> String {
    "You are a helpful assistant for this organization. Answer using the \
     conversation history and the document context; say so when the context \
     does not contain the answer."
        .to_string()
}

fn default_chat_template() -> String {
    "History:\n{chat_history}\n\nContext from documents:\n{context}\n\nQuestion: {question}"
        .to_string()
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub config: Config,
    pub prompts: PromptsConfig,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            config: Config::from_env()?,
            prompts: PromptsConfig::load()?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key}: {e}")),
        Err(_) => Ok(default),
    }
}

fn env_parse_with<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr<Err = String>,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|e| anyhow::anyhow!("{key}: {e}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_chat_fills_placeholders() {
        let prompts = PromptsConfig::default();
        let rendered = prompts.render_chat("Human: hi\nAI: hello", "[1] context", "next?");

        assert!(rendered.contains("Human: hi\nAI: hello"));
        assert!(rendered.contains("[1] context"));
        assert!(rendered.contains("Question: next?"));
    }

    #[test]
    fn test_vector_backend_parse() {
        assert_eq!("memory".parse::<VectorBackend>().unwrap(), VectorBackend::Memory);
        assert_eq!("Qdrant".parse::<VectorBackend>().unwrap(), VectorBackend::Qdrant);
        assert!("chroma".parse::<VectorBackend>().is_err());
    }

    #[test]
    fn test_prompts_yaml_roundtrip() {
        let yaml = "system: custom\nchat_template: \"Q: {question}\"\n";
        let prompts: PromptsConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(prompts.system, "custom");
        assert_eq!(prompts.render_chat("", "", "hi"), "Q: hi");
    }
}
