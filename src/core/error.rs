//! State construction errors.

use thiserror::Error;

/// Errors raised while wiring a state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Invalid argument for state '{state}': {reason}")]
    InvalidArgument { state: String, reason: String },
}
