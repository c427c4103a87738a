//! Q&A server binary
//!
//! Run with: cargo run -p polyglot-rag --bin polyglot-rag-server

use polyglot_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "polyglot_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                    Polyglot RAG Server                    ║
║        Multilingual Q&A over your PDF documents           ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let config = RagConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Model: {} ({})", config.llm.model, config.llm.base_url);
    tracing::info!("  - Context budget: {} chars", config.context.budget_chars);
    tracing::info!("  - Max upload size: {} bytes", config.server.max_upload_size);
    tracing::info!("  - Upload dir: {}", config.ingestion.upload_dir.display());

    if !config.llm.is_configured() {
        tracing::warn!("GROQ_API_KEY is not set; every answer will use the fallback path");
        tracing::warn!("Set GROQ_API_KEY in the environment or the config file to enable the model");
    }

    let server = RagServer::new(config).await?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST   /documents      - Upload a PDF");
    println!("  GET    /documents      - List documents");
    println!("  GET    /documents/:id  - Get document details");
    println!("  DELETE /documents/:id  - Delete a document");
    println!("  POST   /questions      - Ask a question");
    println!("  GET    /languages      - Supported languages");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
