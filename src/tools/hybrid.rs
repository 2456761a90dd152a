//! `hybrid_search` — fused semantic + keyword retrieval.
//!
//! The fusion/reranking itself (embeddings + BM25 + RRF) is owned by the
//! graph service; this capability consumes the pre-ranked sequence and
//! renders it. No temporal filtering is applied.

use crate::errors::Result;
use crate::graph::{GraphStore, SearchResult};

use super::{ArgSpec, ArgType, ToolArgs, ToolSpec};

pub const NAME: &str = "hybrid_search";

/// Returned when the store has nothing at all for the query.
pub const NO_RESULTS: &str = "No relevant information was found for the query.";

const DEFAULT_LIMIT: usize = 10;

pub const SPEC: ToolSpec = ToolSpec {
    name: NAME,
    description:
        "Hybrid search combining semantic similarity and keyword matching, reranked with \
         Reciprocal Rank Fusion. The most general search; use it for most questions.",
    args: &[
        ArgSpec {
            name: "query",
            ty: ArgType::String,
            required: true,
            description: "The search query",
        },
        ArgSpec {
            name: "limit",
            ty: ArgType::Integer,
            required: false,
            description: "Maximum number of results (default 10)",
        },
    ],
};

pub async fn run<G: GraphStore>(store: &G, args: &ToolArgs<'_>) -> Result<String> {
    let query = args
        .str_arg("query")
        .expect("required argument validated before dispatch");
    let limit = args.usize_arg_or("limit", DEFAULT_LIMIT);

    let results = store.search(query, limit).await?;

    if results.is_empty() {
        return Ok(NO_RESULTS.to_string());
    }

    let mut lines = vec!["=== HYBRID SEARCH (semantic + keyword) ===".to_string()];
    for item in &results {
        match item {
            SearchResult::Node(node) => lines.push(format!(
                "[ENTITY] {}: {}",
                node.name,
                node.summary.as_deref().unwrap_or("No description")
            )),
            SearchResult::Fact(fact) => lines.push(format!("[RELATION] {}", fact.fact)),
        }
    }

    Ok(lines.join("\n"))
}
