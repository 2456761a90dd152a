//! Shared text utilities.
//!
//! - Whitespace normalization (episode chunking)
//! - JSON extraction from markdown-wrapped LLM output (action parsing)
//! - Ellipsis truncation (trace logging)

pub mod text;

pub use text::{extract_json_from_response, normalize_whitespace, truncate_with_ellipsis};
