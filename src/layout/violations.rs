//! Layout errors and structural violations.

use crate::core::{StateError, StateId};
use thiserror::Error;

/// A structural defect found while validating a layout.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LayoutViolation {
    #[error("No initial state designated")]
    MissingInitialState,

    #[error("Initial state {0} is not part of the layout")]
    InitialStateNotInLayout(StateId),

    #[error("State '{state}' has a transition to unknown state {target}")]
    DanglingTarget { state: String, target: StateId },

    #[error("Stage {0} is not part of the layout")]
    DanglingStage(StateId),
}

/// Errors raised while populating a layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("State '{name}' is not valid and was rejected")]
    InvalidState { name: String },

    #[error("No state with id {0} in layout")]
    UnknownState(StateId),

    #[error(transparent)]
    State(#[from] StateError),
}
