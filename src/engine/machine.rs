//! The engine that drives a layout.

use super::config::EngineConfig;
use super::error::EngineError;
use super::history::{TransitionHistory, TransitionKind, TransitionRecord};
use super::operational::OperationalState;
use crate::core::{HookPhase, State, StateId};
use crate::layout::{Layout, LayoutViolation};
use chrono::Utc;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use stillwater::validation::Validation;
use tracing::{debug, trace};

/// Single-active-state machine driving a [`Layout`].
///
/// The engine owns the layout and the client context `C`. Guards read the
/// context, hooks and transiting actions mutate it.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{Hooks, State, StateParameters, Transition};
/// use statecraft::engine::{Engine, OperationalState};
/// use statecraft::layout::Layout;
///
/// let mut layout: Layout<u32> = Layout::new();
/// let counting = layout
///     .add_initial_state(State::new(
///         "counting",
///         StateParameters::new(),
///         Hooks::new().in_state(|n: &mut u32| {
///             *n += 1;
///             Ok(())
///         }),
///     ))
///     .unwrap();
/// let done = layout
///     .add_state(State::new("done", StateParameters::new().terminal(), Hooks::new()))
///     .unwrap();
/// layout
///     .add_transition(counting, Transition::to(done).when(|n: &u32| *n >= 3))
///     .unwrap();
/// layout
///     .add_transition(done, Transition::leave().always())
///     .unwrap();
///
/// let mut engine = Engine::new(layout, 0).unwrap();
/// engine.run(false, None).unwrap();
///
/// assert_eq!(*engine.context(), 3);
/// assert_eq!(engine.current_applicative_state(), Some(done));
/// assert_eq!(engine.current_operational_state(), OperationalState::TerminalReached);
/// ```
pub struct Engine<C> {
    layout: Layout<C>,
    context: C,
    config: EngineConfig,
    current: Option<StateId>,
    operational: OperationalState,
    stage_queue: VecDeque<StateId>,
    history: TransitionHistory,
    ticks: u64,
}

impl<C> Engine<C> {
    /// Create an engine with the default configuration.
    ///
    /// Fails with [`EngineError::InvalidLayout`] listing every violation if
    /// the layout is not valid.
    pub fn new(layout: Layout<C>, context: C) -> Result<Self, EngineError> {
        Self::with_config(layout, context, EngineConfig::default())
    }

    pub fn with_config(
        layout: Layout<C>,
        context: C,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        if let Validation::Failure(violations) = layout.validate() {
            return Err(EngineError::InvalidLayout(
                violations.iter().cloned().collect(),
            ));
        }

        let history = TransitionHistory::with_limit(config.history_limit);
        Ok(Self {
            layout,
            context,
            config,
            current: None,
            operational: OperationalState::Uninitialized,
            stage_queue: VecDeque::new(),
            history,
            ticks: 0,
        })
    }

    /// Run until the machine halts or `time_budget` elapses.
    ///
    /// An uninitialized engine first binds and enters the initial state.
    /// With `reset`, a halted engine is re-armed before looping. The budget
    /// is only checked between ticks, so a slow hook can overrun it. On
    /// return the operational state is always `TerminalReached`.
    pub fn run(&mut self, reset: bool, time_budget: Option<Duration>) -> Result<(), EngineError> {
        if reset && self.operational.is_halted() {
            self.reset()?;
        }
        if self.operational == OperationalState::Uninitialized {
            self.bind_initial()?;
        }

        let started = Instant::now();
        let mut on_continue = true;
        while on_continue && time_budget.map_or(true, |budget| started.elapsed() < budget) {
            on_continue = self.track()?;
        }

        self.operational = OperationalState::TerminalReached;
        debug!(
            ticks = self.ticks,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "run finished"
        );
        Ok(())
    }

    /// [`Engine::run`] with the budget and reset policy of the configuration.
    pub fn run_configured(&mut self) -> Result<(), EngineError> {
        let reset = self.config.reset_on_run;
        let budget = self.config.time_budget();
        self.run(reset, budget)
    }

    /// Perform one tick. Returns whether the loop should continue.
    ///
    /// An uninitialized engine binds and enters its initial state before
    /// the tick. A halted engine returns `false` without touching anything.
    pub fn track(&mut self) -> Result<bool, EngineError> {
        if self.operational == OperationalState::Uninitialized {
            self.bind_initial()?;
        }
        if self.operational.is_halted() {
            return Ok(false);
        }
        self.operational = OperationalState::Running;
        self.ticks += 1;

        if self.current.is_none() {
            if let Some(stage) = self.stage_queue.pop_front() {
                self.advance_to_stage(stage)?;
            }
        }

        let Some(current) = self.current else {
            debug!(tick = self.ticks, "no applicative state left, halting");
            self.operational = OperationalState::TerminalReached;
            return Ok(false);
        };

        let state = self.state_ref(current)?;
        trace!(tick = self.ticks, state = state.name(), "tick");

        match state.firing_transition(&self.context) {
            Some(_) if state.is_terminal() => {
                debug!(state = state.name(), "terminal state reached");
                self.run_hook(current, HookPhase::Exiting)?;
                self.operational = OperationalState::TerminalReached;
                Ok(false)
            }
            Some(index) => {
                self.transit_by(current, index)?;
                Ok(true)
            }
            None => {
                self.run_hook(current, HookPhase::InState)?;
                Ok(true)
            }
        }
    }

    /// Force the operational state back to `Uninitialized`.
    ///
    /// No hook runs; the next `run()` binds and enters the initial state
    /// again.
    pub fn stop(&mut self) {
        debug!(from = %self.operational, "engine stopped");
        self.current = None;
        self.stage_queue.clear();
        self.operational = OperationalState::Uninitialized;
    }

    /// Re-arm the engine at the initial state, entering it, with the
    /// operational state `Idle`. History and tick count start over.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        debug!(from = %self.operational, "engine reset");
        self.bind_initial()
    }

    /// Move to `target` without going through a transition.
    ///
    /// The exiting hook of the current state and the entering hook of the
    /// target run with their usual gating; no transiting action runs.
    pub fn transit_to(&mut self, target: Option<StateId>) -> Result<(), EngineError> {
        if let Some(id) = target {
            self.state_ref(id)?;
        }
        let from = self.current;
        if let Some(current) = from {
            self.run_hook(current, HookPhase::Exiting)?;
        }
        self.current = target;
        self.record(from, target, TransitionKind::Forced);
        if let Some(id) = target {
            self.run_hook(id, HookPhase::Entering)?;
        }
        Ok(())
    }

    pub fn current_applicative_state(&self) -> Option<StateId> {
        self.current
    }

    /// The active state itself, if any.
    pub fn current_state(&self) -> Option<&State<C>> {
        self.current.and_then(|id| self.layout.state(id))
    }

    pub fn current_operational_state(&self) -> OperationalState {
        self.operational
    }

    pub fn layout(&self) -> &Layout<C> {
        &self.layout
    }

    pub fn state(&self, id: StateId) -> Option<&State<C>> {
        self.layout.state(id)
    }

    /// Mutable access to a state, e.g. to reset its monitor.
    pub fn state_mut(&mut self, id: StateId) -> Option<&mut State<C>> {
        self.layout.state_mut(id)
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    /// Ticks performed since the initial state was last bound.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Consume the engine and give back the context.
    pub fn into_context(self) -> C {
        self.context
    }

    fn bind_initial(&mut self) -> Result<(), EngineError> {
        let initial = self
            .layout
            .initial_state()
            .ok_or_else(|| EngineError::InvalidLayout(vec![LayoutViolation::MissingInitialState]))?;
        self.state_ref(initial)?;

        self.current = Some(initial);
        self.stage_queue = self.layout.stages().iter().copied().collect();
        self.history.clear();
        self.ticks = 0;
        self.run_hook(initial, HookPhase::Entering)?;
        self.operational = OperationalState::Idle;
        debug!(initial = %initial, "initial state bound");
        Ok(())
    }

    fn transit_by(&mut self, from: StateId, index: usize) -> Result<(), EngineError> {
        self.run_hook(from, HookPhase::Exiting)?;

        let state = self
            .layout
            .state_mut(from)
            .ok_or(EngineError::UnknownState(from))?;
        let name = state.name().to_string();
        let transition = state
            .transition_mut(index)
            .ok_or(EngineError::UnknownState(from))?;
        transition
            .execute_transiting_action(&mut self.context)
            .map_err(|source| EngineError::Action {
                state: name.clone(),
                source,
            })?;
        let next = transition.next_state();

        debug!(from = %name, to = ?next, "transition crossed");
        self.current = next;
        self.record(Some(from), next, TransitionKind::Guarded);
        if let Some(id) = next {
            self.run_hook(id, HookPhase::Entering)?;
        }
        Ok(())
    }

    fn advance_to_stage(&mut self, stage: StateId) -> Result<(), EngineError> {
        debug!(stage = %stage, "advancing to next stage");
        self.current = Some(stage);
        self.record(None, Some(stage), TransitionKind::Stage);
        self.run_hook(stage, HookPhase::Entering)
    }

    fn run_hook(&mut self, id: StateId, phase: HookPhase) -> Result<(), EngineError> {
        let state = self
            .layout
            .state_mut(id)
            .ok_or(EngineError::UnknownState(id))?;
        let outcome = match phase {
            HookPhase::Entering => state.exec_entering(&mut self.context),
            HookPhase::InState => state.exec_in_state(&mut self.context),
            HookPhase::Exiting => state.exec_exiting(&mut self.context),
        };
        outcome.map_err(|source| EngineError::Hook {
            state: state.name().to_string(),
            phase,
            source,
        })
    }

    fn record(&mut self, from: Option<StateId>, to: Option<StateId>, kind: TransitionKind) {
        if self.config.record_history {
            self.history.record(TransitionRecord {
                from,
                to,
                kind,
                timestamp: Utc::now(),
            });
        }
    }

    fn state_ref(&self, id: StateId) -> Result<&State<C>, EngineError> {
        self.layout.state(id).ok_or(EngineError::UnknownState(id))
    }
}
