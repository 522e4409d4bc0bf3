//! Scripted test client for the HTTP service: registers an organization,
//! uploads a PDF, then drops into an interactive chat loop.

use serde::Deserialize;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Deserialize)]
struct CreateOrganizationResponse {
    organization_id: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    chunks_added: usize,
}

#[derive(Deserialize)]
struct ChatResponse {
    answer: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let base_url =
        std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let pdf_path = std::env::args().nth(1).unwrap_or_else(|| "sample.pdf".into());

    let client = reqwest::Client::new();

    println!("Registering new organization...");
    let resp = client
        .post(format!("{base_url}/api/v1/organizations"))
        .json(&json!({ "name": "Tech Corp" }))
        .send()
        .await?;
    if !resp.status().is_success() {
        anyhow::bail!("Failed to create organization: {}", resp.text().await?);
    }
    let org: CreateOrganizationResponse = resp.json().await?;
    println!("Organization created: {}", org.organization_id);

    println!("Uploading '{pdf_path}'...");
    let bytes = tokio::fs::read(&pdf_path).await?;
    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name(pdf_path.clone())
        .mime_str("application/pdf")?;
    let form = reqwest::multipart::Form::new().part("file", part);

    let resp = client
        .post(format!(
            "{base_url}/api/v1/organizations/{}/documents",
            org.organization_id
        ))
        .multipart(form)
        .send()
        .await?;
    if !resp.status().is_success() {
        anyhow::bail!("Upload failed: {}", resp.text().await?);
    }
    let upload: UploadResponse = resp.json().await?;
    println!("Upload succeeded: {} chunks indexed.", upload.chunks_added);

    println!("Starting chat session (type 'exit' to quit)...");
    let session_id = "user_session_1";
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"\nYou: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        let resp = client
            .post(format!("{base_url}/api/v1/chat"))
            .json(&json!({
                "organization_id": org.organization_id,
                "session_id": session_id,
                "question": question,
            }))
            .send()
            .await;

        match resp {
            Ok(resp) if resp.status().is_success() => {
                let chat: ChatResponse = resp.json().await?;
                println!("AI: {}", chat.answer);
            }
            Ok(resp) => eprintln!("Error: {}", resp.text().await?),
            Err(e) => {
                eprintln!("Error: could not reach the server ({e}). Is the api running?");
                break;
            }
        }
    }

    Ok(())
}
