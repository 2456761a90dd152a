//! The per-question reasoning trace.
//!
//! An append-only, chronological sequence of (Thought, Action, Observation)
//! entries. It is rendered back into the prompt on every reasoning turn and
//! returned to the caller as the run's trace. Nothing persists across
//! questions.

use serde_json::{Map, Value};

/// The action half of one entry: which tool was chosen, with what input.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRecord {
    pub tool: String,
    /// The argument object as compact JSON, exactly as dispatched.
    pub input: String,
}

impl ActionRecord {
    pub fn new(tool: impl Into<String>, input: &Map<String, Value>) -> Self {
        Self {
            tool: tool.into(),
            input: Value::Object(input.clone()).to_string(),
        }
    }
}

/// One loop iteration: what the model thought, what it did, what came back.
///
/// `action` is `None` when the step failed to parse and the observation is a
/// corrective message rather than a tool result.
#[derive(Debug, Clone, PartialEq)]
pub struct ScratchpadEntry {
    pub thought: String,
    pub action: Option<ActionRecord>,
    pub observation: String,
}

/// Ordered history of entries for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scratchpad {
    entries: Vec<ScratchpadEntry>,
}

impl Scratchpad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ScratchpadEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ScratchpadEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the trace as ReAct transcript text for the next reasoning turn.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str("Thought: ");
            out.push_str(&entry.thought);
            out.push('\n');
            if let Some(action) = &entry.action {
                out.push_str("Action: ");
                out.push_str(&action.tool);
                out.push_str("\nAction Input: ");
                out.push_str(&action.input);
                out.push('\n');
            }
            out.push_str("Observation: ");
            out.push_str(&entry.observation);
            out.push('\n');
        }
        out
    }
}
