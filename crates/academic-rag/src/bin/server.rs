//! RAG Server binary
//!
//! Run with: cargo run -p academic-rag --bin academic-rag-server

use academic_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up GEMINI_API_KEY and friends from a local .env
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "academic_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = RagConfig::from_env()?;
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Index service: {}", config.retrieval.base_url);
    tracing::info!("  - LLM model: {}", config.generation.model);
    tracing::info!(
        "  - Chunk size: {} words ({} overlap)",
        config.chunking.chunk_size,
        config.chunking.overlap
    );
    if let Some(dir) = &config.server.upload_dir {
        tracing::info!("  - Retaining uploads in {}", dir.display());
    }

    let server = RagServer::new(config)?;

    let state = server.state();
    if state.vector_store().health_check().await {
        tracing::info!("Index service is running");
    } else {
        tracing::warn!(
            "Index service not available at {}; uploads will fail and answers will be ungrounded",
            state.config().retrieval.base_url
        );
    }
    if !state.llm().health_check().await {
        tracing::warn!("GEMINI_API_KEY is not set; chat requests will return the fallback answer");
    }

    tracing::info!("  API: http://{}/api", server.address());
    tracing::info!("  Health: http://{}/api/health", server.address());

    server.start().await?;

    Ok(())
}
