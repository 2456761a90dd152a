//! Central configuration loaded from environment variables.

use serde::{Deserialize, Serialize};
use validator::Validate;

fn validate_max_iterations(n: u32) -> Result<(), validator::ValidationError> {
    if n == 0 {
        return Err(validator::ValidationError::new("max_iterations must be > 0"));
    }
    Ok(())
}

/// Runtime configuration for the agent and its backends.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AgentConfig {
    /// Base URL of the graph service (e.g. `http://localhost:8000`).
    #[validate(length(min = 1))]
    pub graph_service_url: String,

    /// OpenAI API key.
    #[validate(length(min = 1))]
    pub openai_api_key: String,

    /// Chat model used for reasoning steps.
    pub model_name: String,

    /// Hard cap on reasoning iterations per question (must be > 0).
    #[validate(custom(function = "validate_max_iterations"))]
    pub max_iterations: u32,

    /// Optional group ID for partitioning graph data.
    pub group_id: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            graph_service_url: "http://localhost:8000".to_string(),
            openai_api_key: String::new(),
            model_name: "gpt-4o".to_string(),
            max_iterations: 5,
            group_id: None,
        }
    }
}

impl AgentConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` first (non-fatal if `.env` is absent),
    /// then reads each variable from the process environment. `OPENAI_API_KEY`
    /// is required; everything else has a default.
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let graph_service_url = std::env::var("GRAPH_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());

        let openai_api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            crate::AgentError::Validation("OPENAI_API_KEY is required".to_string())
        })?;

        let model_name = std::env::var("MODEL_NAME").unwrap_or_else(|_| "gpt-4o".to_string());

        let max_iterations = match std::env::var("MAX_ITERATIONS") {
            Ok(val) => val.parse::<u32>().map_err(|_| {
                crate::AgentError::Validation(
                    "MAX_ITERATIONS must be a positive integer".to_string(),
                )
            })?,
            Err(_) => 5,
        };

        let group_id = std::env::var("GROUP_ID").ok();

        let config = Self {
            graph_service_url,
            openai_api_key,
            model_name,
            max_iterations,
            group_id,
        };

        config
            .validate()
            .map_err(|e| crate::AgentError::Validation(e.to_string()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    /// The process environment is global; tests that mutate it must not
    /// interleave under the parallel test runner.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Temporarily sets env vars for a test, restoring originals afterward.
    /// Holds [`ENV_LOCK`] for the duration of the closure.
    fn with_env<F, R>(vars: &[(&str, &str)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let originals: Vec<(&str, Option<String>)> =
            vars.iter().map(|(k, _)| (*k, env::var(k).ok())).collect();

        for (k, v) in vars {
            env::set_var(k, v);
        }

        let result = f();

        for (k, original) in &originals {
            match original {
                Some(v) => env::set_var(k, v),
                None => env::remove_var(k),
            }
        }

        result
    }

    #[test]
    fn test_config_defaults() {
        with_env(&[("OPENAI_API_KEY", "sk-test")], || {
            env::remove_var("GRAPH_SERVICE_URL");
            env::remove_var("MODEL_NAME");
            env::remove_var("MAX_ITERATIONS");
            env::remove_var("GROUP_ID");

            let config = AgentConfig::from_env().expect("config should load");
            assert_eq!(config.graph_service_url, "http://localhost:8000");
            assert_eq!(config.model_name, "gpt-4o");
            assert_eq!(config.max_iterations, 5);
            assert!(config.group_id.is_none());
        });
    }

    #[test]
    fn test_config_custom_values() {
        with_env(
            &[
                ("GRAPH_SERVICE_URL", "http://graph.example.com:8800"),
                ("OPENAI_API_KEY", "sk-real-key"),
                ("MODEL_NAME", "gpt-4o-mini"),
                ("MAX_ITERATIONS", "8"),
                ("GROUP_ID", "team-alpha"),
            ],
            || {
                let config = AgentConfig::from_env().expect("config should load");
                assert_eq!(config.graph_service_url, "http://graph.example.com:8800");
                assert_eq!(config.openai_api_key, "sk-real-key");
                assert_eq!(config.model_name, "gpt-4o-mini");
                assert_eq!(config.max_iterations, 8);
                assert_eq!(config.group_id, Some("team-alpha".to_string()));
            },
        );
    }

    #[test]
    fn test_config_missing_api_key() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let saved = env::var("OPENAI_API_KEY").ok();
        env::remove_var("OPENAI_API_KEY");

        let result = AgentConfig::from_env();

        if let Some(v) = saved {
            env::set_var("OPENAI_API_KEY", v);
        }

        assert!(result.is_err());
        match result.unwrap_err() {
            crate::AgentError::Validation(msg) => assert!(msg.contains("OPENAI_API_KEY")),
            e => panic!("expected Validation error, got {:?}", e),
        }
    }

    #[test]
    fn test_config_rejects_non_numeric_max_iterations() {
        with_env(
            &[
                ("OPENAI_API_KEY", "sk-test"),
                ("MAX_ITERATIONS", "lots"),
            ],
            || {
                let result = AgentConfig::from_env();
                assert!(result.is_err());
            },
        );
    }

    #[test]
    fn test_config_rejects_zero_max_iterations() {
        with_env(
            &[
                ("OPENAI_API_KEY", "sk-test"),
                ("MAX_ITERATIONS", "0"),
            ],
            || {
                let result = AgentConfig::from_env();
                assert!(result.is_err());
            },
        );
    }
}
