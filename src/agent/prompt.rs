//! Prompt assembly for the ReAct loop.
//!
//! Prompts are Rust string literals (not external files) for compile-time
//! inclusion. The tool catalog and tool names are interpolated at run time
//! from the registered [`crate::tools::ToolSpec`]s, so the instructions can
//! never drift from the dispatcher.

/// System instructions. `{tools}` and `{tool_names}` are interpolated.
const SYSTEM_TEMPLATE: &str = "\
You are a helpful assistant. Answer questions using the following tools:

{tools}

Use one or many of: [{tool_names}]

Use this format:
Question: the input question to answer
Thought: why you choose the tool
Action: one of [{tool_names}]
Action Input: JSON with double-quoted keys and scalar values, no nesting
Observation: tool result
Thought: I have enough information
Final Answer: answer based on Observations

Rules:
- Use `hybrid_search` for most questions.
- Use `temporal_aware_search` for questions anchored to a date (e.g., \"in 2023\").
- No inventing; use only Observations.
- Action Input: JSON like {\"key\": \"value\"}.";

/// Build the system message from the rendered tool catalog.
pub fn system_prompt(catalog: &str, tool_names: &str) -> String {
    SYSTEM_TEMPLATE
        .replace("{tools}", catalog)
        .replace("{tool_names}", tool_names)
}

/// Build the user message: the question plus the transcript so far.
pub fn user_prompt(question: &str, scratchpad: &str) -> String {
    if scratchpad.is_empty() {
        format!("Question: {question}\nThought:")
    } else {
        format!("Question: {question}\n{scratchpad}Thought:")
    }
}
