//! HTTP client for the Graphiti-style graph service.
//!
//! The service owns the graph database and the fused relevance ranking; this
//! client is a thin JSON adapter. One [`GraphServiceClient`] is constructed
//! per process and passed by reference into the toolbox and agent loop.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::{AgentError, Result};

use super::{Episode, FactResult, GraphStore, NodeResult, SearchResult};

/// Client for the graph service's JSON API.
///
/// Endpoints:
/// - `POST /search` — fused semantic + keyword search
/// - `POST /episodes` — episode ingestion
pub struct GraphServiceClient {
    http: reqwest::Client,
    base_url: String,
    group_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    num_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    group_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<RawResult>,
}

/// Wire shape of one search result. The service distinguishes nodes from
/// facts only by which fields are populated; [`RawResult::classify`] is the
/// single place that duck-typing is resolved into [`SearchResult`].
#[derive(Debug, Deserialize)]
struct RawResult {
    uuid: Uuid,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    fact: Option<String>,
    #[serde(default)]
    valid_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    invalid_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl RawResult {
    /// Classify a wire item into the tagged union.
    ///
    /// An item carrying `fact` is an edge; otherwise it must carry `name` to
    /// be a node. Anything else is a malformed backend response, which is an
    /// infrastructure failure rather than a recoverable protocol error.
    fn classify(self) -> Result<SearchResult> {
        if let Some(fact) = self.fact {
            return Ok(SearchResult::Fact(FactResult {
                uuid: self.uuid,
                fact,
                valid_at: self.valid_at,
                invalid_at: self.invalid_at,
            }));
        }

        if let Some(name) = self.name {
            return Ok(SearchResult::Node(NodeResult {
                uuid: self.uuid,
                name,
                summary: self.summary,
            }));
        }

        Err(AgentError::GraphService(format!(
            "search result {} has neither 'fact' nor 'name'",
            self.uuid
        )))
    }
}

impl GraphServiceClient {
    /// Create a client for the service at `base_url` (no trailing slash).
    ///
    /// The underlying connection pool is created eagerly; an invalid base URL
    /// or TLS backend failure is fatal at construction time.
    pub fn new(base_url: impl Into<String>, group_id: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AgentError::GraphService(format!("HTTP client init failed: {e}")))?;

        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            http,
            base_url,
            group_id,
        })
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AgentError::GraphService(format!(
            "HTTP {status}: {body}"
        )))
    }
}

impl GraphStore for GraphServiceClient {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchResult>> {
        let request = SearchRequest {
            query,
            num_results,
            group_id: self.group_id.as_deref(),
        };

        debug!(query, num_results, "graph search");

        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::GraphService(e.to_string()))?;

        let response = Self::check_status(response).await?;

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| AgentError::GraphService(format!("malformed search response: {e}")))?;

        parsed
            .results
            .into_iter()
            .map(RawResult::classify)
            .collect()
    }

    async fn add_episode(&self, episode: &Episode) -> Result<()> {
        debug!(name = %episode.name, "submitting episode");

        let response = self
            .http
            .post(format!("{}/episodes", self.base_url))
            .json(episode)
            .send()
            .await
            .map_err(|e| AgentError::GraphService(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }
}
