//! Building blocks of the state graph.
//!
//! This module contains everything a layout is made of:
//! - `State` nodes with their configuration and behavior hooks
//! - `Transition` edges carrying a `Guard` and an optional transiting action
//! - `Monitor` instrumentation for monitored states
//!
//! Nothing here drives execution; the engine does that.

mod error;
mod guard;
mod monitor;
mod state;
mod transition;

pub use error::StateError;
pub use guard::Guard;
pub use monitor::Monitor;
pub use state::{
    Behavior, BoxError, HookPhase, HookResult, Hooks, State, StateId, StateParameters,
};
pub use transition::{Transition, TransitionAction};
