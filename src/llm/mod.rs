//! LLM client abstraction.
//!
//! The agent loop only ever needs plain-text completions: the ReAct protocol
//! is a line-oriented text grammar, parsed by [`crate::agent::protocol`].
//!
//! # Implementations
//! - [`openai::OpenAiClient`] — OpenAI chat models via `async-openai`.

pub mod openai;

use crate::errors::Result;
use serde::Serialize;

/// A chat message for the LLM conversation.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Speaker role in a chat conversation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Trait for chat-completion clients.
#[allow(async_fn_in_trait)]
pub trait LlmClient: Send + Sync {
    /// Send a conversation and return the assistant's text response.
    ///
    /// Generation halts at any configured stop sequence; the stop sequence
    /// itself is not included in the returned text.
    async fn generate(&self, messages: &[Message]) -> Result<String>;
}
