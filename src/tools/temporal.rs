//! `temporal_aware_search` — point-in-time retrieval.
//!
//! Runs the same fused search as `hybrid_search`, then applies the
//! bi-temporal validity filter for a reference instant. Temporal filtering is
//! a post-hoc reduction rather than a store-level predicate, so the store is
//! over-fetched by 2x to leave headroom for filter attrition.

use chrono::{DateTime, Utc};

use crate::errors::Result;
use crate::graph::{GraphStore, SearchResult};
use crate::temporal::{filter_point_in_time, parse_reference_time};

use super::{ArgSpec, ArgType, ToolArgs, ToolSpec};

pub const NAME: &str = "temporal_aware_search";

/// Returned when the reference_time argument cannot be parsed. A
/// capability-level failure surfaced as text so the loop can retry with a
/// corrected value.
pub const INVALID_TIMESTAMP: &str =
    "Error: invalid timestamp. Use ISO format: YYYY-MM-DDTHH:MM:SSZ";

const DEFAULT_LIMIT: usize = 10;

/// Over-fetch multiplier; a heuristic, not a sufficiency guarantee.
const OVERFETCH_FACTOR: usize = 2;

pub const SPEC: ToolSpec = ToolSpec {
    name: NAME,
    description:
        "Point-in-time search that respects the validity intervals of facts. Use it for \
         questions anchored to a date (e.g. \"in 2023\") or about historical state.",
    args: &[
        ArgSpec {
            name: "query",
            ty: ArgType::String,
            required: true,
            description: "The search query",
        },
        ArgSpec {
            name: "reference_time",
            ty: ArgType::Timestamp,
            required: false,
            description: "Reference instant (e.g. \"2024-01-15T10:00:00Z\"); defaults to now",
        },
        ArgSpec {
            name: "limit",
            ty: ArgType::Integer,
            required: false,
            description: "Maximum number of results (default 10)",
        },
    ],
};

/// Sentinel for a query the store knows nothing about.
pub fn no_results_sentinel(query: &str, at: DateTime<Utc>) -> String {
    format!(
        "No information was found for '{}' at {}.",
        query,
        format_instant(at)
    )
}

/// Sentinel for results that all failed the point-in-time filter. Distinct
/// wording from [`no_results_sentinel`] so the model can tell "nothing
/// indexed" from "nothing valid at that instant".
pub fn nothing_valid_sentinel(query: &str, at: DateTime<Utc>) -> String {
    format!(
        "No valid information was found for '{}' at {}.",
        query,
        format_instant(at)
    )
}

fn format_instant(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub async fn run<G: GraphStore>(store: &G, args: &ToolArgs<'_>) -> Result<String> {
    let query = args
        .str_arg("query")
        .expect("required argument validated before dispatch");
    let limit = args.usize_arg_or("limit", DEFAULT_LIMIT);

    let reference = match args.str_arg("reference_time") {
        Some(raw) => match parse_reference_time(raw) {
            Some(at) => at,
            None => return Ok(INVALID_TIMESTAMP.to_string()),
        },
        None => Utc::now(),
    };

    // Saturating: any validated limit is usable, even a preposterous one.
    let results = store.search(query, limit.saturating_mul(OVERFETCH_FACTOR)).await?;

    if results.is_empty() {
        return Ok(no_results_sentinel(query, reference));
    }

    let mut filtered = filter_point_in_time(results, reference);
    filtered.truncate(limit);

    if filtered.is_empty() {
        return Ok(nothing_valid_sentinel(query, reference));
    }

    let mut lines = vec![format!(
        "=== POINT-IN-TIME SEARCH: {} ===",
        format_instant(reference)
    )];
    for item in &filtered {
        match item {
            SearchResult::Fact(fact) => {
                let valid_info = fact
                    .valid_at
                    .map(|v| format!(" (valid from: {})", v.format("%Y-%m-%d %H:%M:%S UTC")))
                    .unwrap_or_default();
                lines.push(format!("[FACT] {}{}", fact.fact, valid_info));
            }
            SearchResult::Node(node) => lines.push(format!(
                "[NODE] {}: {}",
                node.name,
                node.summary.as_deref().unwrap_or("No description")
            )),
        }
    }

    Ok(lines.join("\n"))
}
