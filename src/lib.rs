//! Statecraft: an embeddable finite state machine engine
//!
//! Client code describes a graph of states connected by guarded
//! transitions; the engine drives a single active state through its
//! entering, in-state and exiting hooks until a terminal state is reached or
//! a time budget expires.
//!
//! # Core Concepts
//!
//! - **State**: a node with fixed parameters, outgoing transitions and a
//!   `Behavior` supplying the hooks
//! - **Transition**: an edge carrying a `Guard` and an optional transiting action
//! - **Monitor**: entry count and entry/exit timestamps of a monitored state
//! - **Layout**: owner of every state, with the initial state and the stage order
//! - **Engine**: the driver, with its own operational lifecycle
//!
//! # Example
//!
//! ```rust
//! use statecraft::{Engine, Hooks, Layout, OperationalState, State, StateParameters, Transition};
//!
//! #[derive(Default)]
//! struct Door {
//!     pushes: u32,
//!     log: Vec<&'static str>,
//! }
//!
//! let mut layout: Layout<Door> = Layout::new();
//! let closed = layout
//!     .add_initial_state(State::new(
//!         "closed",
//!         StateParameters::new().with_exiting_action(),
//!         Hooks::new()
//!             .in_state(|d: &mut Door| {
//!                 d.pushes += 1;
//!                 Ok(())
//!             })
//!             .exiting(|d: &mut Door| {
//!                 d.log.push("unlatched");
//!                 Ok(())
//!             }),
//!     ))
//!     .unwrap();
//! let open = layout
//!     .add_state(State::monitored(
//!         "open",
//!         StateParameters::new().terminal(),
//!         Hooks::new(),
//!     ))
//!     .unwrap();
//! layout
//!     .add_transition(closed, Transition::to(open).when(|d: &Door| d.pushes >= 2))
//!     .unwrap();
//! layout
//!     .add_transition(open, Transition::leave().always())
//!     .unwrap();
//!
//! let mut engine = Engine::new(layout, Door::default()).unwrap();
//! engine.run(false, None).unwrap();
//!
//! assert_eq!(engine.current_operational_state(), OperationalState::TerminalReached);
//! assert_eq!(engine.context().log, vec!["unlatched"]);
//! assert_eq!(engine.state(open).and_then(|s| s.monitor()).map(|m| m.entry_count()), Some(1));
//! ```

pub mod core;
pub mod engine;
pub mod layout;

// Re-export commonly used types
pub use self::core::{Behavior, Guard, Hooks, Monitor, State, StateId, StateParameters, Transition};
pub use engine::{Engine, EngineConfig, EngineError, OperationalState};
pub use layout::{Layout, LayoutError, LayoutViolation};
