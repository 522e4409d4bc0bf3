pub mod config;
pub mod document_store;
pub mod embedding;
pub mod llm;
pub mod pdf;
pub mod session;
pub mod vector_store;

pub use config::{AppConfig, Config, PromptsConfig, VectorBackend};
pub use document_store::InMemoryDocumentStore;
pub use embedding::OllamaEmbedding;
pub use llm::OllamaChat;
pub use pdf::extract_pdf_text;
pub use session::InMemorySessionStore;
pub use vector_store::{InMemoryVectorStore, QdrantVectorStore};
