//! # graphrag-agent
//!
//! A ReAct question-answering agent over a temporally-aware knowledge graph.
//!
//! The agent alternates between LLM reasoning steps and retrieval tool calls
//! until it produces a final answer. Retrieval runs against an external
//! Graphiti-style graph service that owns indexing, embeddings and fused
//! (semantic + keyword) ranking; this crate consumes it through the narrow
//! [`graph::GraphStore`] interface.
//!
//! ## Architecture
//!
//! - **ReAct loop**: [`agent::AgentExecutor`] — Thought / Action / Observation
//!   turns with a hard iteration cap
//! - **Capabilities**: [`tools::Toolbox`] — `hybrid_search` and
//!   `temporal_aware_search`, each a thin adapter from validated arguments to
//!   a formatted text observation
//! - **Bi-temporal filter**: [`temporal`] — point-in-time validity over
//!   `valid_at` / `invalid_at` fact intervals
//! - **Ingestion**: [`pipeline`] — sentence-pair episode chunking submitted to
//!   the graph service

pub mod agent;
pub mod config;
pub mod errors;
pub mod graph;
pub mod llm;
pub mod pipeline;
pub mod temporal;
pub mod tools;
pub mod utils;

pub use errors::{AgentError, LlmError, Result};
