use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doc_chat::api::{create_router, AppState};
use doc_chat::application::{ChatService, IngestService, OrganizationService, RagService};
use doc_chat::domain::ports::VectorStore;
use doc_chat::infrastructure::{
    AppConfig, InMemoryDocumentStore, InMemorySessionStore, InMemoryVectorStore, OllamaChat,
    OllamaEmbedding, QdrantVectorStore, VectorBackend,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,doc_chat=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Arc::new(AppConfig::load()?);
    let ollama = &config.config.ollama;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(ollama.timeout_seconds))
        .build()?;

    let embedding = Arc::new(OllamaEmbedding::new(http.clone(), ollama));
    let llm = Arc::new(OllamaChat::new(http.clone(), ollama));

    let vector_store: Arc<dyn VectorStore> = match config.config.vector.backend {
        VectorBackend::Memory => {
            info!("using in-memory vector store");
            Arc::new(InMemoryVectorStore::new())
        }
        VectorBackend::Qdrant => {
            let url = &config.config.vector.qdrant_url;
            let store = QdrantVectorStore::new(url, ollama.embedding_dimension).await?;
            info!(url, "Qdrant connected");
            Arc::new(store)
        }
    };

    let rag = Arc::new(RagService::new(
        embedding,
        vector_store,
        config.config.rag.top_k,
    ));
    let ingest = Arc::new(IngestService::new(
        rag.clone(),
        Arc::new(InMemoryDocumentStore::new()),
        config.config.rag.chunk_size,
        config.config.rag.chunk_overlap,
    ));
    let chat = Arc::new(ChatService::new(
        rag.clone(),
        llm,
        Arc::new(InMemorySessionStore::new()),
        config.prompts.clone(),
        config.config.rag.top_k,
        Duration::from_secs(ollama.timeout_seconds),
    ));

    let state = AppState::new(
        Arc::new(OrganizationService::new()),
        ingest,
        rag,
        chat,
        config.clone(),
        http,
    );
    let app = create_router(state);

    let addr = SocketAddr::new(
        config.config.server.host.parse()?,
        config.config.server.port,
    );

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
