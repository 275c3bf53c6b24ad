//! Engine error types.

use crate::core::{BoxError, HookPhase, StateId};
use crate::layout::LayoutViolation;
use thiserror::Error;

/// Errors surfaced by the engine.
///
/// Hook and action failures are never recovered from: they abort the tick
/// and reach the caller of `run()`/`track()` unchanged.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Layout is not valid ({} violation(s))", .0.len())]
    InvalidLayout(Vec<LayoutViolation>),

    #[error("No state with id {0} in layout")]
    UnknownState(StateId),

    #[error("The {phase} hook of state '{state}' failed: {source}")]
    Hook {
        state: String,
        phase: HookPhase,
        source: BoxError,
    },

    #[error("Transiting action leaving state '{state}' failed: {source}")]
    Action { state: String, source: BoxError },
}

/// Errors raised while loading an [`EngineConfig`](crate::engine::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid engine configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
