//! Retrieval capabilities and their registry/dispatcher.
//!
//! Each capability is a thin adapter from validated arguments to a formatted
//! text observation; the agent loop only ever sees text. The [`Toolbox`]
//! holds the declared input schemas, validates arguments ahead of dispatch,
//! and routes violations back to the loop as corrective observations instead
//! of errors.

pub mod hybrid;
pub mod temporal;

use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::Result;
use crate::graph::GraphStore;

/// Semantic type of a tool argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArgType {
    String,
    Integer,
    /// ISO-8601 timestamp carried as a JSON string; content is validated by
    /// the capability itself so a bad value can be reported as a
    /// capability-level observation.
    Timestamp,
}

impl ArgType {
    fn label(self) -> &'static str {
        match self {
            ArgType::String => "string",
            ArgType::Integer => "integer",
            ArgType::Timestamp => "ISO-8601 timestamp string",
        }
    }
}

/// Declared schema for one tool argument.
#[derive(Debug, Clone, Copy)]
pub struct ArgSpec {
    pub name: &'static str,
    pub ty: ArgType,
    pub required: bool,
    pub description: &'static str,
}

/// Declared schema for one tool.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub args: &'static [ArgSpec],
}

impl ToolSpec {
    /// One catalog line for the prompt: name, description, argument list.
    fn render(&self) -> String {
        let args = self
            .args
            .iter()
            .map(|a| {
                format!(
                    "{} ({}, {})",
                    a.name,
                    a.ty.label(),
                    if a.required { "required" } else { "optional" }
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("- {}: {} Arguments: {}.", self.name, self.description, args)
    }
}

/// Why an action's arguments were rejected before dispatch.
///
/// These are recoverable: the rendered message is appended to the scratchpad
/// as a corrective observation and the loop continues.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ArgumentError {
    #[error("Unknown tool '{0}'. Available tools: {1}")]
    UnknownTool(String, String),

    #[error("Missing required argument '{0}'")]
    MissingRequired(&'static str),

    #[error("Argument '{0}' must be a flat scalar value (string or integer); nested objects and arrays are not accepted")]
    NotScalar(String),

    #[error("Argument '{0}' must be of type {1}")]
    WrongType(&'static str, &'static str),

    #[error("Argument '{0}' must not be negative")]
    Negative(&'static str),
}

/// Outcome of dispatching one action.
#[derive(Debug, PartialEq)]
pub enum DispatchOutcome {
    /// The capability ran and produced an observation (including its own
    /// sentinel and capability-level error texts).
    Observation(String),
    /// The action failed validation; the message is a corrective observation.
    Invalid(String),
}

/// Validated, flat scalar-only arguments handed to a capability.
#[derive(Debug)]
pub struct ToolArgs<'a>(&'a Map<String, Value>);

impl<'a> ToolArgs<'a> {
    /// String argument; validation guarantees presence/type for required args.
    pub fn str_arg(&self, name: &str) -> Option<&'a str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Non-negative integer argument with a default.
    pub fn usize_arg_or(&self, name: &str, default: usize) -> usize {
        self.0
            .get(name)
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or(default)
    }
}

/// Capability registry and dispatcher, bound to one graph store handle.
pub struct Toolbox<'a, G: GraphStore> {
    store: &'a G,
}

impl<'a, G: GraphStore> Toolbox<'a, G> {
    pub fn new(store: &'a G) -> Self {
        Self { store }
    }

    /// The registered capability schemas.
    pub fn specs() -> &'static [ToolSpec] {
        &[hybrid::SPEC, temporal::SPEC]
    }

    /// Registered tool names, comma-separated (for prompts and errors).
    pub fn tool_names() -> String {
        Self::specs()
            .iter()
            .map(|s| s.name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The rendered tool catalog interpolated into the system prompt.
    pub fn catalog() -> String {
        Self::specs()
            .iter()
            .map(ToolSpec::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Validate `args` against `spec`: flat scalars only, required fields
    /// present, integers non-negative.
    fn validate(spec: &ToolSpec, args: &Map<String, Value>) -> std::result::Result<(), ArgumentError> {
        // Scalar-only applies to every provided value, declared or not.
        for (key, value) in args {
            match value {
                Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {}
                Value::Object(_) | Value::Array(_) => {
                    return Err(ArgumentError::NotScalar(key.clone()));
                }
            }
        }

        for arg in spec.args {
            match args.get(arg.name) {
                None | Some(Value::Null) => {
                    if arg.required {
                        return Err(ArgumentError::MissingRequired(arg.name));
                    }
                }
                Some(value) => match arg.ty {
                    ArgType::String | ArgType::Timestamp => {
                        if !value.is_string() {
                            return Err(ArgumentError::WrongType(arg.name, arg.ty.label()));
                        }
                    }
                    ArgType::Integer => {
                        if !value.is_i64() && !value.is_u64() {
                            return Err(ArgumentError::WrongType(arg.name, arg.ty.label()));
                        }
                        if value.as_i64().is_some_and(|n| n < 0) {
                            return Err(ArgumentError::Negative(arg.name));
                        }
                    }
                },
            }
        }

        Ok(())
    }

    /// Resolve `tool` by name, validate `args`, and invoke the capability.
    ///
    /// Validation failures come back as [`DispatchOutcome::Invalid`]; only
    /// infrastructure failures from the graph store propagate as `Err`.
    pub async fn dispatch(
        &self,
        tool: &str,
        args: &Map<String, Value>,
    ) -> Result<DispatchOutcome> {
        let Some(spec) = Self::specs().iter().find(|s| s.name == tool) else {
            let err = ArgumentError::UnknownTool(tool.to_string(), Self::tool_names());
            return Ok(DispatchOutcome::Invalid(err.to_string()));
        };

        if let Err(err) = Self::validate(spec, args) {
            debug!(tool, %err, "action rejected by argument validation");
            return Ok(DispatchOutcome::Invalid(err.to_string()));
        }

        let args = ToolArgs(args);
        let observation = match spec.name {
            hybrid::NAME => hybrid::run(self.store, &args).await?,
            temporal::NAME => temporal::run(self.store, &args).await?,
            _ => unreachable!("spec table and dispatch table are defined together"),
        };

        Ok(DispatchOutcome::Observation(observation))
    }
}
