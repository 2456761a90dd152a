//! Error types for graphrag-agent.
//!
//! Only unrecoverable infrastructure failures live here. Malformed model
//! output, unknown tool names and bad tool arguments are recoverable protocol
//! errors handled inside the agent loop (see [`crate::agent::protocol`]) and
//! never surface as [`AgentError`].

/// Alias for Results returning [`AgentError`].
pub type Result<T> = std::result::Result<T, AgentError>;

/// Top-level error type for graphrag-agent.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Graph service error: {0}")]
    GraphService(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// LLM-specific errors.
///
/// The OpenAI wire error carries no HTTP status, so classification happens
/// on the error body's `code` and `type` fields. `RateLimit` and `Transient`
/// are retried with backoff; everything else is permanent.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Rate limited")]
    RateLimit,

    #[error("Empty response from LLM")]
    EmptyResponse,

    #[error("Authentication failed")]
    Authentication,

    /// Upstream server-side failure worth retrying.
    #[error("Transient API error: {0}")]
    Transient(String),

    #[error("API error: {0}")]
    Api(String),
}
