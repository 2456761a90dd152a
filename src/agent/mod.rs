//! The ReAct agent loop.
//!
//! One question is answered by alternating LLM reasoning turns with tool
//! invocations until the model signals a final answer or the iteration
//! budget runs out:
//!
//! ```text
//! question → Thought / Action / Action Input → dispatch → Observation → …
//!          → Thought / Final Answer
//! ```
//!
//! - [`protocol`] — the explicit grammar for the model's reasoning step
//! - [`scratchpad`] — the ordered per-question trace
//! - [`prompt`] — the system prompt with the tool catalog interpolated
//! - [`executor`] — the loop itself

pub mod executor;
pub mod prompt;
pub mod protocol;
pub mod scratchpad;

pub use executor::{AgentExecutor, AgentOutcome, MAX_ITERATIONS_ANSWER};
pub use scratchpad::{ActionRecord, Scratchpad, ScratchpadEntry};
