mod conversation;
mod document;
mod embedding;
mod organization;

pub use conversation::{Conversation, Message, MessageRole};
pub use document::{split_text, ChunkMetadata, Document, DocumentChunk, SearchResult};
pub use embedding::Embedding;
pub use organization::Organization;
