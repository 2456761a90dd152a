//! The ReAct reasoning-step grammar.
//!
//! The model replies with one of two fixed-order forms:
//!
//! ```text
//! Thought: <free text>
//! Action: <tool name>
//! Action Input: <flat JSON object>
//! ```
//!
//! ```text
//! Thought: <free text>
//! Final Answer: <free text>
//! ```
//!
//! Parsing is an explicit grammar over these markers, decoupled from the
//! prompt text. Every way a step can be malformed is a [`ProtocolError`]
//! variant; the executor renders it as a corrective observation and the loop
//! continues. Anything the model emits after a hallucinated `Observation:`
//! marker is discarded (the LLM client's stop sequence normally prevents it
//! from appearing at all).

use serde_json::{Map, Value};

use crate::utils::extract_json_from_response;

const THOUGHT: &str = "Thought:";
const ACTION: &str = "Action:";
const ACTION_INPUT: &str = "Action Input:";
const FINAL_ANSWER: &str = "Final Answer:";
const OBSERVATION: &str = "Observation:";

/// One parsed reasoning step.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentStep {
    /// The model chose a tool.
    Act {
        thought: String,
        tool: String,
        input: Map<String, Value>,
    },
    /// The model signalled it is done.
    Finish { thought: String, answer: String },
}

/// Why a reasoning step failed to parse. All variants are recoverable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProtocolError {
    #[error("the step contains neither '{ACTION}' nor '{FINAL_ANSWER}'")]
    MissingAction,

    #[error("the step contains both '{ACTION}' and '{FINAL_ANSWER}'; emit exactly one")]
    AmbiguousStep,

    #[error("'{ACTION}' names no tool")]
    EmptyAction,

    #[error("'{ACTION_INPUT}' is missing")]
    MissingActionInput,

    #[error("'{ACTION_INPUT}' is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("'{ACTION_INPUT}' must be a single JSON object with double-quoted keys")]
    NotAnObject,
}

/// Parse one model reply into an [`AgentStep`].
pub fn parse(response: &str) -> Result<AgentStep, ProtocolError> {
    // Discard hallucinated observations and anything after them.
    let step = match find_line_marker(response, OBSERVATION) {
        Some(idx) => &response[..idx],
        None => response,
    };

    let thought = slice_after_marker(step, THOUGHT, &[ACTION, FINAL_ANSWER])
        .unwrap_or_default()
        .trim()
        .to_string();

    let action_at = find_line_marker(step, ACTION);
    let final_at = find_line_marker(step, FINAL_ANSWER);

    let action_at = match (action_at, final_at) {
        (Some(_), Some(_)) => return Err(ProtocolError::AmbiguousStep),
        (None, None) => return Err(ProtocolError::MissingAction),
        (None, Some(at)) => {
            let answer = step[at + FINAL_ANSWER.len()..].trim().to_string();
            return Ok(AgentStep::Finish { thought, answer });
        }
        (Some(at), None) => at,
    };

    let after_action = &step[action_at + ACTION.len()..];

    let tool = match find_line_marker(after_action, ACTION_INPUT) {
        Some(idx) => &after_action[..idx],
        None => after_action,
    }
    .trim()
    .trim_matches(|c| matches!(c, '[' | ']' | '`' | '"' | '\''))
    .to_string();
    if tool.is_empty() {
        return Err(ProtocolError::EmptyAction);
    }

    let input_text = find_line_marker(after_action, ACTION_INPUT)
        .map(|idx| after_action[idx + ACTION_INPUT.len()..].trim())
        .filter(|s| !s.is_empty())
        .ok_or(ProtocolError::MissingActionInput)?;

    let json_text =
        extract_json_from_response(input_text).ok_or(ProtocolError::MissingActionInput)?;

    let value: Value = serde_json::from_str(json_text)
        .map_err(|e| ProtocolError::InvalidJson(e.to_string()))?;

    match value {
        Value::Object(map) => Ok(AgentStep::Act {
            thought,
            tool,
            input: map,
        }),
        _ => Err(ProtocolError::NotAnObject),
    }
}

/// Byte offset of the first occurrence of `marker` at the start of a line
/// (leading whitespace allowed). Mid-line occurrences are free text, not
/// protocol markers: a final answer may legitimately mention "Action:".
fn find_line_marker(text: &str, marker: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with(marker) {
            return Some(offset + (line.len() - trimmed.len()));
        }
        offset += line.len();
    }
    None
}

/// The text between `start` (at a line start) and the earliest following
/// line-start marker in `ends` (or the end of input).
fn slice_after_marker<'a>(text: &'a str, start: &str, ends: &[&str]) -> Option<&'a str> {
    let begin = find_line_marker(text, start)? + start.len();
    let rest = &text[begin..];
    let stop = ends.iter().filter_map(|e| find_line_marker(rest, e)).min();
    Some(match stop {
        Some(idx) => &rest[..idx],
        None => rest,
    })
}
