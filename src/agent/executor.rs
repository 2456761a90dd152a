//! The ReAct loop executor.
//!
//! Strictly sequential per question: each reasoning turn suspends on the LLM,
//! each tool call suspends on the graph service. Recoverable protocol errors
//! become scratchpad entries and consume an iteration; infrastructure errors
//! abort the run and propagate to the caller.

use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::graph::GraphStore;
use crate::llm::{LlmClient, Message};
use crate::tools::{DispatchOutcome, Toolbox};
use crate::utils::truncate_with_ellipsis;

use super::protocol::{self, AgentStep};
use super::prompt;
use super::scratchpad::{ActionRecord, Scratchpad, ScratchpadEntry};

/// Returned as the answer when the iteration budget is exhausted before a
/// final-answer signal. A defined terminal outcome, not an error.
pub const MAX_ITERATIONS_ANSWER: &str =
    "I could not find a complete answer within the allowed number of reasoning steps.";

/// Default iteration budget.
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;

/// Result of one `run`: the final answer plus the full reasoning trace.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentOutcome {
    pub answer: String,
    pub trace: Scratchpad,
}

/// The ReAct loop over one LLM backend and one graph store handle.
///
/// Holds borrowed handles: both collaborators are constructed once per
/// process and shared across questions (and, if desired, across concurrent
/// executors — all capabilities are read-only).
pub struct AgentExecutor<'a, L: LlmClient, G: GraphStore> {
    llm: &'a L,
    toolbox: Toolbox<'a, G>,
    max_iterations: u32,
    system_prompt: String,
}

impl<'a, L: LlmClient, G: GraphStore> AgentExecutor<'a, L, G> {
    pub fn new(llm: &'a L, store: &'a G, max_iterations: u32) -> Self {
        Self {
            llm,
            toolbox: Toolbox::new(store),
            max_iterations,
            system_prompt: prompt::system_prompt(
                &Toolbox::<G>::catalog(),
                &Toolbox::<G>::tool_names(),
            ),
        }
    }

    /// Answer one question.
    ///
    /// Always returns an answer string — the model's final answer, or
    /// [`MAX_ITERATIONS_ANSWER`] if the budget ran out — together with the
    /// ordered trace. Only infrastructure failures return `Err`.
    pub async fn run(&self, question: &str) -> Result<AgentOutcome> {
        let mut scratchpad = Scratchpad::new();

        for iteration in 1..=self.max_iterations {
            let messages = [
                Message::system(self.system_prompt.clone()),
                Message::user(prompt::user_prompt(question, &scratchpad.render())),
            ];

            let response = self.llm.generate(&messages).await?;
            debug!(iteration, response = %truncate_with_ellipsis(&response, 200), "reasoning turn");

            match protocol::parse(&response) {
                Ok(AgentStep::Finish { thought, answer }) => {
                    info!(iteration, "final answer produced");
                    debug!(%thought, "closing thought");
                    return Ok(AgentOutcome {
                        answer,
                        trace: scratchpad,
                    });
                }

                Ok(AgentStep::Act {
                    thought,
                    tool,
                    input,
                }) => {
                    let observation = match self.toolbox.dispatch(&tool, &input).await? {
                        DispatchOutcome::Observation(text) => text,
                        DispatchOutcome::Invalid(reason) => {
                            warn!(iteration, tool, %reason, "action rejected");
                            format!("Invalid action: {reason}")
                        }
                    };

                    debug!(
                        iteration,
                        tool,
                        observation = %truncate_with_ellipsis(&observation, 200),
                        "tool call complete"
                    );

                    scratchpad.push(ScratchpadEntry {
                        thought,
                        action: Some(ActionRecord::new(tool, &input)),
                        observation,
                    });
                }

                Err(protocol_err) => {
                    warn!(iteration, %protocol_err, "malformed reasoning step");
                    scratchpad.push(ScratchpadEntry {
                        thought: String::new(),
                        action: None,
                        observation: format!(
                            "Invalid action format: {protocol_err}. Reply with either \
                             'Action:' and 'Action Input:' lines, or a 'Final Answer:' line."
                        ),
                    });
                }
            }
        }

        info!(
            max_iterations = self.max_iterations,
            "iteration budget exhausted"
        );
        Ok(AgentOutcome {
            answer: MAX_ITERATIONS_ANSWER.to_string(),
            trace: scratchpad,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AgentError, LlmError};
    use crate::graph::{Episode, FactResult, SearchResult};
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Replays a scripted sequence of model replies.
    struct ScriptedLlm {
        replies: Mutex<Vec<String>>,
        calls: Mutex<u32>,
    }

    impl ScriptedLlm {
        fn new(replies: &[&str]) -> Self {
            let mut replies: Vec<String> = replies.iter().map(|s| s.to_string()).collect();
            replies.reverse(); // pop() from the back
            Self {
                replies: Mutex::new(replies),
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    impl LlmClient for ScriptedLlm {
        async fn generate(&self, _messages: &[Message]) -> Result<String> {
            *self.calls.lock().unwrap() += 1;
            self.replies
                .lock()
                .unwrap()
                .pop()
                .ok_or(AgentError::Llm(LlmError::EmptyResponse))
        }
    }

    struct FactStore {
        facts: Vec<&'static str>,
        searches: Mutex<u32>,
    }

    impl FactStore {
        fn new(facts: &[&'static str]) -> Self {
            Self {
                facts: facts.to_vec(),
                searches: Mutex::new(0),
            }
        }

        fn search_count(&self) -> u32 {
            *self.searches.lock().unwrap()
        }
    }

    impl GraphStore for FactStore {
        async fn search(&self, _query: &str, num_results: usize) -> Result<Vec<SearchResult>> {
            *self.searches.lock().unwrap() += 1;
            Ok(self
                .facts
                .iter()
                .take(num_results)
                .map(|f| {
                    SearchResult::Fact(FactResult {
                        uuid: Uuid::new_v4(),
                        fact: f.to_string(),
                        valid_at: None,
                        invalid_at: None,
                    })
                })
                .collect())
        }

        async fn add_episode(&self, _episode: &Episode) -> Result<()> {
            Ok(())
        }
    }

    const ACT: &str =
        "Thought: search first\nAction: hybrid_search\nAction Input: {\"query\": \"ceo\"}";
    const FINISH: &str = "Thought: done\nFinal Answer: Alice is the CEO.";

    #[tokio::test]
    async fn test_single_tool_call_then_answer() {
        let llm = ScriptedLlm::new(&[ACT, FINISH]);
        let store = FactStore::new(&["Alice is CEO"]);
        let executor = AgentExecutor::new(&llm, &store, DEFAULT_MAX_ITERATIONS);

        let outcome = executor.run("Who is the CEO?").await.unwrap();

        assert_eq!(outcome.answer, "Alice is the CEO.");
        assert_eq!(outcome.trace.entries().len(), 1);
        let entry = &outcome.trace.entries()[0];
        assert_eq!(entry.thought, "search first");
        assert_eq!(entry.action.as_ref().unwrap().tool, "hybrid_search");
        assert!(entry.observation.contains("[RELATION] Alice is CEO"));
    }

    #[tokio::test]
    async fn test_iteration_cap_stops_after_budget() {
        // Six consecutive tool calls scripted; the loop must stop at five.
        let llm = ScriptedLlm::new(&[ACT, ACT, ACT, ACT, ACT, ACT]);
        let store = FactStore::new(&["Alice is CEO"]);
        let executor = AgentExecutor::new(&llm, &store, 5);

        let outcome = executor.run("Who is the CEO?").await.unwrap();

        assert_eq!(outcome.answer, MAX_ITERATIONS_ANSWER);
        assert_eq!(outcome.trace.entries().len(), 5);
        assert_eq!(llm.call_count(), 5, "no sixth reasoning turn");
        assert_eq!(store.search_count(), 5, "no sixth tool call");
    }

    #[tokio::test]
    async fn test_malformed_step_recovers_and_continues() {
        let llm = ScriptedLlm::new(&["I will just ramble without an action.", FINISH]);
        let store = FactStore::new(&[]);
        let executor = AgentExecutor::new(&llm, &store, DEFAULT_MAX_ITERATIONS);

        let outcome = executor.run("q").await.unwrap();

        assert_eq!(outcome.answer, "Alice is the CEO.");
        assert_eq!(outcome.trace.entries().len(), 1);
        let entry = &outcome.trace.entries()[0];
        assert!(entry.action.is_none());
        assert!(entry.observation.starts_with("Invalid action format:"));
    }

    #[tokio::test]
    async fn test_unknown_tool_recovers_and_continues() {
        let bad = "Thought: t\nAction: grep_everything\nAction Input: {\"query\": \"x\"}";
        let llm = ScriptedLlm::new(&[bad, FINISH]);
        let store = FactStore::new(&[]);
        let executor = AgentExecutor::new(&llm, &store, DEFAULT_MAX_ITERATIONS);

        let outcome = executor.run("q").await.unwrap();

        assert_eq!(outcome.answer, "Alice is the CEO.");
        let entry = &outcome.trace.entries()[0];
        assert!(entry.observation.contains("Unknown tool 'grep_everything'"));
        assert_eq!(store.search_count(), 0);
    }

    #[tokio::test]
    async fn test_nested_arguments_recover_and_continue() {
        let nested =
            "Thought: t\nAction: hybrid_search\nAction Input: {\"query\": \"x\", \"nested\": {\"a\": 1}}";
        let llm = ScriptedLlm::new(&[nested, FINISH]);
        let store = FactStore::new(&[]);
        let executor = AgentExecutor::new(&llm, &store, DEFAULT_MAX_ITERATIONS);

        let outcome = executor.run("q").await.unwrap();

        assert_eq!(outcome.answer, "Alice is the CEO.");
        let entry = &outcome.trace.entries()[0];
        assert!(entry.observation.starts_with("Invalid action:"));
        assert!(entry.observation.contains("nested"));
    }

    #[tokio::test]
    async fn test_llm_failure_is_fatal() {
        struct FailingLlm;
        impl LlmClient for FailingLlm {
            async fn generate(&self, _m: &[Message]) -> Result<String> {
                Err(AgentError::Llm(LlmError::Authentication))
            }
        }

        let store = FactStore::new(&[]);
        let executor = AgentExecutor::new(&FailingLlm, &store, DEFAULT_MAX_ITERATIONS);

        let err = executor.run("q").await.expect_err("must propagate");
        assert!(matches!(err, AgentError::Llm(LlmError::Authentication)));
    }

    #[tokio::test]
    async fn test_store_failure_is_fatal() {
        struct BrokenStore;
        impl GraphStore for BrokenStore {
            async fn search(&self, _q: &str, _n: usize) -> Result<Vec<SearchResult>> {
                Err(AgentError::GraphService("connection reset".to_string()))
            }
            async fn add_episode(&self, _e: &Episode) -> Result<()> {
                Ok(())
            }
        }

        let llm = ScriptedLlm::new(&[ACT]);
        let executor = AgentExecutor::new(&llm, &BrokenStore, DEFAULT_MAX_ITERATIONS);

        let err = executor.run("q").await.expect_err("must propagate");
        assert!(matches!(err, AgentError::GraphService(_)));
    }
}
