//! Ingest a plain-text document into the knowledge graph.
//!
//! Usage: `ingest <file> [episode-name-prefix]`
//!
//! The file is chunked into sentence-pair episodes and submitted to the graph
//! service; extraction and embedding happen service-side.

use std::path::Path;

use chrono::Utc;
use tracing::{error, info};

use graphrag_agent::config::AgentConfig;
use graphrag_agent::graph::service::GraphServiceClient;
use graphrag_agent::pipeline::ingest_text;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Tracing ───────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("graphrag_agent=info".parse()?),
        )
        .init();

    // ── Args ──────────────────────────────────────────────────────────────────
    let mut args = std::env::args().skip(1);
    let Some(file) = args.next() else {
        anyhow::bail!("usage: ingest <file> [episode-name-prefix]");
    };
    let prefix = match args.next() {
        Some(p) => p,
        None => Path::new(&file)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document")
            .to_string(),
    };

    // ── Config ────────────────────────────────────────────────────────────────
    let config = AgentConfig::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        e
    })?;

    let store = GraphServiceClient::new(&config.graph_service_url, config.group_id.clone())?;

    // ── Ingest ────────────────────────────────────────────────────────────────
    let text = tokio::fs::read_to_string(&file).await?;
    info!(file = %file, bytes = text.len(), "document loaded");

    let count = ingest_text(
        &store,
        &prefix,
        &text,
        "text document, sentence-pair chunks",
        Utc::now(),
    )
    .await?;

    info!(episodes = count, "ingestion complete");
    println!("Submitted {count} episodes from {file}.");
    Ok(())
}
