//! Interactive question-answering REPL over the knowledge graph.

use std::io::{self, BufRead, Write};

use tracing::{error, info};

use graphrag_agent::agent::AgentExecutor;
use graphrag_agent::config::AgentConfig;
use graphrag_agent::graph::service::GraphServiceClient;
use graphrag_agent::llm::openai::{CacheConfig, OpenAiClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Tracing ───────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("graphrag_agent=info".parse()?),
        )
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let config = AgentConfig::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        e
    })?;

    info!(
        graph_service = %config.graph_service_url,
        model = %config.model_name,
        max_iterations = config.max_iterations,
        "configuration loaded"
    );

    // ── Backends ──────────────────────────────────────────────────────────────
    // Stop at "Observation:" so the model never writes tool output itself.
    let llm = OpenAiClient::new(
        &config.openai_api_key,
        &config.model_name,
        CacheConfig::default(),
    )
    .with_stop(["Observation:"]);

    let store = GraphServiceClient::new(&config.graph_service_url, config.group_id.clone())?;

    let executor = AgentExecutor::new(&llm, &store, config.max_iterations);

    // ── REPL ──────────────────────────────────────────────────────────────────
    println!("Graph QA agent ready. Ask a question, or type 'exit' to quit.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("\n> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let question = line.trim();

        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        match executor.run(question).await {
            Ok(outcome) => {
                for (i, entry) in outcome.trace.entries().iter().enumerate() {
                    if let Some(action) = &entry.action {
                        println!("  [{}] {} {}", i + 1, action.tool, action.input);
                    }
                }
                println!("\n{}", outcome.answer);
            }
            Err(e) => {
                error!("agent run failed: {}", e);
                println!("Something went wrong: {e}");
            }
        }
    }

    info!("chat session ended");
    Ok(())
}
