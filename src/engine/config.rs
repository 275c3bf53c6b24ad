//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters used by [`Engine::run_configured`](crate::engine::Engine::run_configured).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Wall-clock budget for a run in milliseconds. `None` runs until the
    /// machine halts.
    #[serde(default)]
    pub time_budget_ms: Option<u64>,

    /// Re-arm a halted engine at its initial state before running.
    #[serde(default = "default_reset_on_run")]
    pub reset_on_run: bool,

    /// Keep a [`TransitionHistory`](crate::engine::TransitionHistory).
    #[serde(default = "default_record_history")]
    pub record_history: bool,

    /// Most records the history keeps; the oldest are dropped first.
    /// `None` keeps every record.
    #[serde(default = "default_history_limit")]
    pub history_limit: Option<usize>,
}

fn default_reset_on_run() -> bool {
    true
}

fn default_record_history() -> bool {
    true
}

fn default_history_limit() -> Option<usize> {
    Some(1024)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: None,
            reset_on_run: default_reset_on_run(),
            record_history: default_record_history(),
            history_limit: default_history_limit(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget_ms = Some(u64::try_from(budget.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }
}
