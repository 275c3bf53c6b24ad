//! States, their configuration and their behavior hooks.
//!
//! A [`State`] is a node of the layout graph. It owns its outgoing
//! transitions and a [`Behavior`] supplying the entering, in-state and
//! exiting hooks. Which hooks actually run is decided by the state's
//! [`StateParameters`]; a monitored state additionally records every entry
//! and exit in a [`Monitor`].

use super::error::StateError;
use super::monitor::Monitor;
use super::transition::Transition;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error type returned by client-supplied hooks and actions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a client-supplied hook.
pub type HookResult = Result<(), BoxError>;

/// Non-owning handle to a state in a [`Layout`](crate::layout::Layout).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(usize);

impl StateId {
    pub const fn new(index: usize) -> Self {
        StateId(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fixed configuration of a state.
///
/// Every flag defaults to `false`: a state is non-terminal and runs neither
/// its entering nor its exiting hook unless asked to.
///
/// # Example
///
/// ```rust
/// use statecraft::core::StateParameters;
///
/// let params = StateParameters::new()
///     .with_entering_action()
///     .terminal();
///
/// assert!(params.terminal);
/// assert!(params.run_entering_action_on_entry);
/// assert!(!params.run_exiting_action_on_exit);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateParameters {
    #[serde(default)]
    pub terminal: bool,
    #[serde(default)]
    pub run_entering_action_on_entry: bool,
    #[serde(default)]
    pub run_exiting_action_on_exit: bool,
}

impl StateParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    pub fn with_entering_action(mut self) -> Self {
        self.run_entering_action_on_entry = true;
        self
    }

    pub fn with_exiting_action(mut self) -> Self {
        self.run_exiting_action_on_exit = true;
        self
    }

    /// Both the entering and the exiting hooks run.
    pub fn with_actions(self) -> Self {
        self.with_entering_action().with_exiting_action()
    }
}

/// Which hook of a state is executing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookPhase {
    Entering,
    InState,
    Exiting,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::Entering => write!(f, "entering"),
            HookPhase::InState => write!(f, "in-state"),
            HookPhase::Exiting => write!(f, "exiting"),
        }
    }
}

/// Business behavior plugged into a state.
///
/// Every hook defaults to doing nothing. Errors are not caught by the
/// engine: they abort the current tick and surface to the caller of
/// `run()`/`track()`.
pub trait Behavior<C>: Send {
    /// Runs when the state becomes active, if the state is configured to.
    fn on_enter(&mut self, _context: &mut C) -> HookResult {
        Ok(())
    }

    /// Runs on every tick the state is active and no transition fires.
    fn on_in_state(&mut self, _context: &mut C) -> HookResult {
        Ok(())
    }

    /// Runs when the state stops being active, if the state is configured to.
    fn on_exit(&mut self, _context: &mut C) -> HookResult {
        Ok(())
    }
}

type Hook<C> = Box<dyn FnMut(&mut C) -> HookResult + Send>;

/// [`Behavior`] assembled from closures.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{Behavior, Hooks};
///
/// let mut hooks = Hooks::new().in_state(|polls: &mut u32| {
///     *polls += 1;
///     Ok(())
/// });
///
/// let mut polls = 0;
/// hooks.on_in_state(&mut polls).unwrap();
/// hooks.on_enter(&mut polls).unwrap();
/// assert_eq!(polls, 1);
/// ```
pub struct Hooks<C> {
    enter: Option<Hook<C>>,
    in_state: Option<Hook<C>>,
    exit: Option<Hook<C>>,
}

impl<C> Hooks<C> {
    pub fn new() -> Self {
        Self {
            enter: None,
            in_state: None,
            exit: None,
        }
    }

    pub fn entering<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut C) -> HookResult + Send + 'static,
    {
        self.enter = Some(Box::new(hook));
        self
    }

    pub fn in_state<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut C) -> HookResult + Send + 'static,
    {
        self.in_state = Some(Box::new(hook));
        self
    }

    pub fn exiting<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut C) -> HookResult + Send + 'static,
    {
        self.exit = Some(Box::new(hook));
        self
    }
}

impl<C> Default for Hooks<C> {
    fn default() -> Self {
        Self::new()
    }
}

fn call<C>(hook: &mut Option<Hook<C>>, context: &mut C) -> HookResult {
    match hook.as_mut() {
        Some(hook) => hook(context),
        None => Ok(()),
    }
}

impl<C> Behavior<C> for Hooks<C> {
    fn on_enter(&mut self, context: &mut C) -> HookResult {
        call(&mut self.enter, context)
    }

    fn on_in_state(&mut self, context: &mut C) -> HookResult {
        call(&mut self.in_state, context)
    }

    fn on_exit(&mut self, context: &mut C) -> HookResult {
        call(&mut self.exit, context)
    }
}

/// A node of the layout graph.
///
/// A plain state only runs its behavior. A monitored state (built with
/// [`State::monitored`]) also keeps a [`Monitor`] that is updated on every
/// entry and exit, whether or not the gated business hook runs.
pub struct State<C> {
    name: String,
    parameters: StateParameters,
    transitions: Vec<Transition<C>>,
    behavior: Box<dyn Behavior<C>>,
    monitor: Option<Monitor>,
}

impl<C> State<C> {
    /// Create a plain state.
    pub fn new<B>(name: impl Into<String>, parameters: StateParameters, behavior: B) -> Self
    where
        B: Behavior<C> + 'static,
    {
        Self {
            name: name.into(),
            parameters,
            transitions: Vec::new(),
            behavior: Box::new(behavior),
            monitor: None,
        }
    }

    /// Create a state that records entries and exits.
    pub fn monitored<B>(name: impl Into<String>, parameters: StateParameters, behavior: B) -> Self
    where
        B: Behavior<C> + 'static,
    {
        Self {
            monitor: Some(Monitor::new()),
            ..Self::new(name, parameters, behavior)
        }
    }

    /// Append an outgoing transition.
    ///
    /// Transitions without a guard are rejected.
    pub fn add_transition(&mut self, transition: Transition<C>) -> Result<(), StateError> {
        if !transition.is_valid() {
            return Err(StateError::InvalidArgument {
                state: self.name.clone(),
                reason: "transition has no guard".to_string(),
            });
        }
        self.transitions.push(transition);
        Ok(())
    }

    /// Builder-style [`State::add_transition`].
    pub fn with_transition(mut self, transition: Transition<C>) -> Result<Self, StateError> {
        self.add_transition(transition)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &StateParameters {
        &self.parameters
    }

    pub fn transitions(&self) -> &[Transition<C>] {
        &self.transitions
    }

    /// Valid iff every outgoing transition is valid. A state without
    /// transitions is valid.
    pub fn is_valid(&self) -> bool {
        self.transitions.iter().all(Transition::is_valid)
    }

    pub fn is_terminal(&self) -> bool {
        self.parameters.terminal
    }

    pub fn is_monitored(&self) -> bool {
        self.monitor.is_some()
    }

    /// Index of the first transition, in declaration order, whose guard
    /// fires for `context`.
    pub fn firing_transition(&self, context: &C) -> Option<usize> {
        self.transitions.iter().position(|t| t.firing(context))
    }

    pub fn monitor(&self) -> Option<&Monitor> {
        self.monitor.as_ref()
    }

    pub fn monitor_mut(&mut self) -> Option<&mut Monitor> {
        self.monitor.as_mut()
    }

    pub(crate) fn transition_mut(&mut self, index: usize) -> Option<&mut Transition<C>> {
        self.transitions.get_mut(index)
    }

    pub(crate) fn exec_entering(&mut self, context: &mut C) -> HookResult {
        if let Some(monitor) = self.monitor.as_mut() {
            monitor.record_entry(Utc::now());
        }
        if self.parameters.run_entering_action_on_entry {
            self.behavior.on_enter(context)?;
        }
        Ok(())
    }

    pub(crate) fn exec_in_state(&mut self, context: &mut C) -> HookResult {
        self.behavior.on_in_state(context)
    }

    pub(crate) fn exec_exiting(&mut self, context: &mut C) -> HookResult {
        if let Some(monitor) = self.monitor.as_mut() {
            monitor.record_exit(Utc::now());
        }
        if self.parameters.run_exiting_action_on_exit {
            self.behavior.on_exit(context)?;
        }
        Ok(())
    }
}

impl<C> fmt::Debug for State<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("transitions", &self.transitions)
            .field("monitor", &self.monitor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log {
        events: Vec<&'static str>,
        go: bool,
    }

    fn recording_hooks() -> Hooks<Log> {
        Hooks::new()
            .entering(|log: &mut Log| {
                log.events.push("enter");
                Ok(())
            })
            .in_state(|log: &mut Log| {
                log.events.push("in");
                Ok(())
            })
            .exiting(|log: &mut Log| {
                log.events.push("exit");
                Ok(())
            })
    }

    #[test]
    fn parameters_default_to_all_false() {
        let params = StateParameters::default();

        assert!(!params.terminal);
        assert!(!params.run_entering_action_on_entry);
        assert!(!params.run_exiting_action_on_exit);
    }

    #[test]
    fn parameters_deserialize_with_missing_fields() {
        let params: StateParameters = serde_json::from_str(r#"{"terminal": true}"#).unwrap();

        assert_eq!(params, StateParameters::new().terminal());
    }

    #[test]
    fn add_transition_rejects_unguarded() {
        let mut state = State::new("idle", StateParameters::new(), Hooks::<Log>::new());

        let result = state.add_transition(Transition::to(StateId::new(1)));

        assert!(matches!(result, Err(StateError::InvalidArgument { .. })));
        assert!(state.transitions().is_empty());
    }

    #[test]
    fn empty_state_is_vacuously_valid() {
        let state = State::new("idle", StateParameters::new(), Hooks::<Log>::new());

        assert!(state.is_valid());
        assert!(!state.is_terminal());
    }

    #[test]
    fn firing_transition_prefers_declaration_order() {
        let state = State::new("fork", StateParameters::new(), Hooks::<Log>::new())
            .with_transition(Transition::to(StateId::new(1)).when(|l: &Log| l.go))
            .unwrap()
            .with_transition(Transition::to(StateId::new(2)).always())
            .unwrap()
            .with_transition(Transition::to(StateId::new(3)).always())
            .unwrap();

        assert_eq!(state.firing_transition(&Log::default()), Some(1));
        let ready = Log {
            go: true,
            ..Log::default()
        };
        assert_eq!(state.firing_transition(&ready), Some(0));
    }

    #[test]
    fn firing_transition_is_none_when_nothing_fires() {
        let state = State::new("wait", StateParameters::new(), Hooks::<Log>::new())
            .with_transition(Transition::leave().when(|l: &Log| l.go))
            .unwrap();

        assert_eq!(state.firing_transition(&Log::default()), None);
    }

    #[test]
    fn entering_and_exiting_hooks_are_gated() {
        let mut log = Log::default();
        let mut gated = State::new("gated", StateParameters::new(), recording_hooks());

        gated.exec_entering(&mut log).unwrap();
        gated.exec_in_state(&mut log).unwrap();
        gated.exec_exiting(&mut log).unwrap();

        assert_eq!(log.events, vec!["in"]);
    }

    #[test]
    fn enabled_hooks_run() {
        let mut log = Log::default();
        let mut state = State::new("open", StateParameters::new().with_actions(), recording_hooks());

        state.exec_entering(&mut log).unwrap();
        state.exec_in_state(&mut log).unwrap();
        state.exec_exiting(&mut log).unwrap();

        assert_eq!(log.events, vec!["enter", "in", "exit"]);
    }

    #[test]
    fn monitor_records_even_when_hooks_are_gated() {
        let mut log = Log::default();
        let mut state = State::monitored("watched", StateParameters::new(), recording_hooks());

        state.exec_entering(&mut log).unwrap();
        state.exec_exiting(&mut log).unwrap();
        state.exec_entering(&mut log).unwrap();

        let monitor = state.monitor().unwrap();
        assert_eq!(monitor.entry_count(), 2);
        assert!(monitor.last_entry_time().is_some());
        assert!(monitor.last_exit_time().is_some());
        assert!(log.events.is_empty());
    }

    #[test]
    fn plain_state_has_no_monitor() {
        let state = State::new("plain", StateParameters::new(), Hooks::<Log>::new());

        assert!(!state.is_monitored());
        assert!(state.monitor().is_none());
    }

    #[test]
    fn hook_errors_propagate() {
        let mut state = State::new(
            "broken",
            StateParameters::new().with_entering_action(),
            Hooks::new().entering(|_: &mut Log| Err("sensor offline".into())),
        );

        let err = state.exec_entering(&mut Log::default()).unwrap_err();
        assert_eq!(err.to_string(), "sensor offline");
    }
}
