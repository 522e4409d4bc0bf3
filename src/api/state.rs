use std::sync::Arc;

use crate::application::{ChatService, IngestService, OrganizationService, RagService};
use crate::infrastructure::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub organizations: Arc<OrganizationService>,
    pub ingest: Arc<IngestService>,
    pub rag: Arc<RagService>,
    pub chat: Arc<ChatService>,
    pub config: Arc<AppConfig>,
    /// Shared HTTP client, also used by the readiness probe.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(
        organizations: Arc<OrganizationService>,
        ingest: Arc<IngestService>,
        rag: Arc<RagService>,
        chat: Arc<ChatService>,
        config: Arc<AppConfig>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            organizations,
            ingest,
            rag,
            chat,
            config,
            http,
        }
    }
}
