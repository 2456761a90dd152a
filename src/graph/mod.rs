//! Graph store boundary.
//!
//! The knowledge graph lives behind an external Graphiti-style service that
//! owns storage, indexing, embeddings and fused (RRF semantic + keyword)
//! ranking. This module defines the narrow interface the agent consumes:
//! a [`GraphStore`] trait, the [`SearchResult`] tagged union, and the
//! [`Episode`] ingestion record.
//!
//! Result classification happens exactly once, at deserialization inside the
//! service client. Downstream code matches on the enum and never probes for
//! field presence.

pub mod service;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::Result;

/// An entity node returned by graph search. Nodes carry no validity interval
/// and are considered present at every reference instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
    pub uuid: Uuid,
    pub name: String,
    /// LLM-generated entity summary; may be absent for freshly created nodes.
    pub summary: Option<String>,
}

/// A factual edge returned by graph search, with real-world validity bounds.
///
/// - `valid_at`: instant from which the fact holds
/// - `invalid_at`: instant at which the fact stopped holding
///
/// A fact with neither bound is treated as valid at every instant (see
/// [`crate::temporal::is_valid_at`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactResult {
    pub uuid: Uuid,
    pub fact: String,
    pub valid_at: Option<DateTime<Utc>>,
    pub invalid_at: Option<DateTime<Utc>>,
}

/// A single ranked retrieval result: either an entity node or a fact edge.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    Node(NodeResult),
    Fact(FactResult),
}

impl SearchResult {
    /// Returns the fact variant, if this result is one.
    pub fn as_fact(&self) -> Option<&FactResult> {
        match self {
            SearchResult::Fact(f) => Some(f),
            SearchResult::Node(_) => None,
        }
    }
}

/// Source type tag for an ingested episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpisodeSource {
    Message,
    Json,
    Text,
}

/// An ingestion unit submitted to the graph service to extend the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub name: String,
    pub content: String,
    pub source: EpisodeSource,
    pub source_description: String,
    /// Real-world instant the episode content refers to.
    pub reference_time: DateTime<Utc>,
}

/// Read/ingest interface over the external graph service.
///
/// `search` returns results ranked by the service's fused relevance score,
/// best first. The handle is constructed once per process and shared by
/// reference; implementations must be safe for concurrent `search` calls.
#[allow(async_fn_in_trait)]
pub trait GraphStore: Send + Sync {
    /// Run a fused semantic + keyword search, returning at most
    /// `num_results` items in relevance order.
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchResult>>;

    /// Submit one episode for ingestion.
    async fn add_episode(&self, episode: &Episode) -> Result<()>;
}
