//! Execution of a layout.
//!
//! The [`Engine`] owns a [`Layout`](crate::layout::Layout) and a client
//! context, tracks the active applicative state and its own
//! [`OperationalState`], and exposes the run/track/stop/reset/transit
//! operations.
//!
//! # Run loop
//!
//! Execution is single-threaded and cooperative. `run()` calls `track()`
//! until it reports that the machine halted or the optional time budget
//! elapsed. Each tick evaluates the active state's transitions in
//! declaration order:
//!
//! - a firing transition on a terminal state runs its exiting hook and halts
//! - a firing transition on any other state is crossed
//! - otherwise the in-state hook runs
//!
//! Diagnostics go through `tracing`: one `trace` event per tick and `debug`
//! events for transitions and lifecycle changes.

mod config;
mod error;
mod history;
mod machine;
mod operational;

pub use config::EngineConfig;
pub use error::{ConfigError, EngineError};
pub use history::{TransitionHistory, TransitionKind, TransitionRecord};
pub use machine::Engine;
pub use operational::OperationalState;
