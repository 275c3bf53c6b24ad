//! Lifecycle stage of the engine itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational state of an [`Engine`](crate::engine::Engine), distinct
/// from the applicative state being modeled.
///
/// ```text
/// UNINITIALIZED --run()--> IDLE --track()--> RUNNING --halt--> TERMINAL_REACHED
///       ^                   ^                                      |
///       |                   +---------------reset()----------------+
///       +--------------------------stop()--------------------------+
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationalState {
    /// No applicative state bound.
    #[default]
    Uninitialized,
    /// Initial state bound and entered, not ticking yet.
    Idle,
    /// The run loop is ticking.
    Running,
    /// Halted; only `stop()` or `reset()` leave this state.
    TerminalReached,
}

impl OperationalState {
    pub fn is_halted(self) -> bool {
        matches!(self, OperationalState::TerminalReached)
    }
}

impl fmt::Display for OperationalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationalState::Uninitialized => write!(f, "UNINITIALIZED"),
            OperationalState::Idle => write!(f, "IDLE"),
            OperationalState::Running => write!(f, "RUNNING"),
            OperationalState::TerminalReached => write!(f, "TERMINAL_REACHED"),
        }
    }
}
