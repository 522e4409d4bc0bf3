mod chat;
mod ingest;
mod organization;
mod rag;

pub use chat::{ChatOutcome, ChatService};
pub use ingest::IngestService;
pub use organization::OrganizationService;
pub use rag::RagService;
