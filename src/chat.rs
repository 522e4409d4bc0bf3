//! Standalone single-tenant chat: index one PDF, then answer questions in a
//! loop. Same retrieval pipeline as the HTTP service, no server involved.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doc_chat::application::{ChatService, IngestService, RagService};
use doc_chat::infrastructure::{
    extract_pdf_text, AppConfig, InMemoryDocumentStore, InMemorySessionStore, InMemoryVectorStore,
    OllamaChat, OllamaEmbedding,
};

const COLLECTION: &str = "standalone";
const SESSION: &str = "local";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat=info,doc_chat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let pdf_path = std::env::args().nth(1).unwrap_or_else(|| "sample.pdf".into());
    let config = AppConfig::load()?;
    let ollama = &config.config.ollama;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(ollama.timeout_seconds))
        .build()?;

    let embedding = Arc::new(OllamaEmbedding::new(http.clone(), ollama));
    let llm = Arc::new(OllamaChat::new(http, ollama));
    let rag = Arc::new(RagService::new(
        embedding,
        Arc::new(InMemoryVectorStore::new()),
        config.config.rag.top_k,
    ));

    println!("Reading '{pdf_path}'...");
    let bytes = tokio::fs::read(&pdf_path).await?;
    let text = extract_pdf_text(bytes).await?;

    println!("Splitting and embedding...");
    let ingest = IngestService::new(
        rag.clone(),
        Arc::new(InMemoryDocumentStore::new()),
        config.config.rag.chunk_size,
        config.config.rag.chunk_overlap,
    );
    let doc = ingest.ingest(COLLECTION, &pdf_path, &text).await?;
    println!("Indexed {} chunks.", doc.chunk_count);

    let chat = ChatService::new(
        rag,
        llm,
        Arc::new(InMemorySessionStore::new()),
        config.prompts.clone(),
        config.config.rag.top_k,
        Duration::from_secs(ollama.timeout_seconds),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"\nAsk a question (or type 'exit'): ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") {
            break;
        }

        println!("Thinking...");
        match chat.chat(COLLECTION, SESSION, question).await {
            Ok(outcome) => println!("Answer: {}", outcome.answer),
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    Ok(())
}
