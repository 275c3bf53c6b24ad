//! The state table of a machine.
//!
//! A [`Layout`] owns every state, designates the initial one and optionally
//! declares an ordered list of stages the engine falls back to when a
//! transition leaves the current state without a successor.
//!
//! Layouts are validated with Stillwater's `Validation`, so a malformed
//! layout reports every defect at once instead of the first one.
//!
//! # Example
//!
//! ```rust
//! use statecraft::core::{Hooks, State, StateParameters, Transition};
//! use statecraft::layout::Layout;
//!
//! let mut layout: Layout<()> = Layout::new();
//! let start = layout
//!     .add_initial_state(State::new("start", StateParameters::new(), Hooks::new()))
//!     .unwrap();
//! let done = layout
//!     .add_state(State::new("done", StateParameters::new().terminal(), Hooks::new()))
//!     .unwrap();
//! layout.add_transition(start, Transition::to(done).always()).unwrap();
//!
//! assert!(layout.is_valid());
//! assert_eq!(layout.initial_state(), Some(start));
//! ```

mod violations;

pub use violations::{LayoutError, LayoutViolation};

use crate::core::{State, StateId, Transition};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Owner of every state of a machine.
pub struct Layout<C> {
    states: Vec<State<C>>,
    initial: Option<StateId>,
    stages: Vec<StateId>,
}

impl<C> Layout<C> {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            initial: None,
            stages: Vec::new(),
        }
    }

    /// Add a state and return its handle.
    ///
    /// Invalid states are rejected with [`LayoutError::InvalidState`].
    pub fn add_state(&mut self, state: State<C>) -> Result<StateId, LayoutError> {
        if !state.is_valid() {
            return Err(LayoutError::InvalidState {
                name: state.name().to_string(),
            });
        }
        let id = StateId::new(self.states.len());
        self.states.push(state);
        Ok(id)
    }

    /// Add several states. Nothing is added if any of them is invalid.
    pub fn add_states<I>(&mut self, states: I) -> Result<Vec<StateId>, LayoutError>
    where
        I: IntoIterator<Item = State<C>>,
    {
        let states: Vec<State<C>> = states.into_iter().collect();
        if let Some(invalid) = states.iter().find(|s| !s.is_valid()) {
            return Err(LayoutError::InvalidState {
                name: invalid.name().to_string(),
            });
        }
        let first = self.states.len();
        self.states.extend(states);
        Ok((first..self.states.len()).map(StateId::new).collect())
    }

    /// Add a state and designate it as the initial state.
    pub fn add_initial_state(&mut self, state: State<C>) -> Result<StateId, LayoutError> {
        let id = self.add_state(state)?;
        self.initial = Some(id);
        Ok(id)
    }

    /// Attach a transition to the state `from`.
    pub fn add_transition(
        &mut self,
        from: StateId,
        transition: Transition<C>,
    ) -> Result<(), LayoutError> {
        let state = self
            .states
            .get_mut(from.index())
            .ok_or(LayoutError::UnknownState(from))?;
        state.add_transition(transition)?;
        Ok(())
    }

    pub fn initial_state(&self) -> Option<StateId> {
        self.initial
    }

    pub fn set_initial_state(&mut self, id: StateId) -> Result<(), LayoutError> {
        if !self.contains(id) {
            return Err(LayoutError::UnknownState(id));
        }
        self.initial = Some(id);
        Ok(())
    }

    /// Append a stage to the fallback order.
    pub fn add_stage(&mut self, id: StateId) -> Result<(), LayoutError> {
        if !self.contains(id) {
            return Err(LayoutError::UnknownState(id));
        }
        self.stages.push(id);
        Ok(())
    }

    /// Stages in the order the engine falls back to them.
    pub fn stages(&self) -> &[StateId] {
        &self.stages
    }

    pub fn state(&self, id: StateId) -> Option<&State<C>> {
        self.states.get(id.index())
    }

    pub fn state_mut(&mut self, id: StateId) -> Option<&mut State<C>> {
        self.states.get_mut(id.index())
    }

    /// Look a state up by name. Names are not required to be unique; the
    /// first match wins.
    pub fn find(&self, name: &str) -> Option<StateId> {
        self.states
            .iter()
            .position(|s| s.name() == name)
            .map(StateId::new)
    }

    pub fn contains(&self, id: StateId) -> bool {
        id.index() < self.states.len()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = (StateId, &State<C>)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(index, state)| (StateId::new(index), state))
    }

    /// Check the layout, accumulating every violation.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<LayoutViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<LayoutViolation>>> = Vec::new();

        match self.initial {
            None => checks.push(Validation::fail(LayoutViolation::MissingInitialState)),
            Some(id) if !self.contains(id) => {
                checks.push(Validation::fail(LayoutViolation::InitialStateNotInLayout(id)))
            }
            Some(_) => checks.push(Validation::success(())),
        }

        // States are valid by construction: `add_state` and
        // `State::add_transition` reject unguarded transitions.
        for state in &self.states {
            for target in state.transitions().iter().filter_map(Transition::next_state) {
                if !self.contains(target) {
                    checks.push(Validation::fail(LayoutViolation::DanglingTarget {
                        state: state.name().to_string(),
                        target,
                    }));
                }
            }
        }

        for &stage in &self.stages {
            if !self.contains(stage) {
                checks.push(Validation::fail(LayoutViolation::DanglingStage(stage)));
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_success()
    }

    /// Every violation as a plain list; empty when the layout is valid.
    pub fn violations(&self) -> Vec<LayoutViolation> {
        match self.validate() {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(violations) => violations.iter().cloned().collect(),
        }
    }
}

impl<C> Default for Layout<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Hooks, StateParameters};

    #[derive(Default)]
    struct Ctx {
        open: bool,
    }

    fn state(name: &str) -> State<Ctx> {
        State::new(name, StateParameters::new(), Hooks::new())
    }

    #[test]
    fn empty_layout_is_missing_initial_state() {
        let layout: Layout<Ctx> = Layout::new();

        assert!(layout.is_empty());
        assert!(!layout.is_valid());
        assert_eq!(layout.violations(), vec![LayoutViolation::MissingInitialState]);
    }

    #[test]
    fn add_state_returns_sequential_ids() {
        let mut layout = Layout::new();

        let a = layout.add_state(state("a")).unwrap();
        let b = layout.add_state(state("b")).unwrap();

        assert_eq!(a, StateId::new(0));
        assert_eq!(b, StateId::new(1));
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.state(b).map(State::name), Some("b"));
    }

    #[test]
    fn add_states_returns_ids_in_order() {
        let mut layout = Layout::new();
        layout.add_state(state("a")).unwrap();

        let ids = layout.add_states(vec![state("b"), state("c")]).unwrap();

        assert_eq!(ids, vec![StateId::new(1), StateId::new(2)]);
        assert_eq!(layout.len(), 3);
    }

    #[test]
    fn single_initial_state_is_valid() {
        let mut layout = Layout::new();
        let start = layout.add_initial_state(state("start")).unwrap();

        assert!(layout.is_valid());
        assert_eq!(layout.initial_state(), Some(start));
    }

    #[test]
    fn set_initial_state_rejects_unknown_ids() {
        let mut layout = Layout::new();
        layout.add_state(state("a")).unwrap();

        let result = layout.set_initial_state(StateId::new(4));

        assert!(matches!(result, Err(LayoutError::UnknownState(_))));
        assert!(layout.initial_state().is_none());
    }

    #[test]
    fn add_transition_to_unknown_state_fails() {
        let mut layout: Layout<Ctx> = Layout::new();

        let result = layout.add_transition(StateId::new(0), Transition::leave().always());

        assert!(matches!(result, Err(LayoutError::UnknownState(_))));
    }

    #[test]
    fn add_transition_rejects_unguarded_transition() {
        let mut layout: Layout<Ctx> = Layout::new();
        let a = layout.add_state(state("a")).unwrap();

        let result = layout.add_transition(a, Transition::leave());

        assert!(matches!(result, Err(LayoutError::State(_))));
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let mut layout = Layout::new();
        let a = layout.add_state(state("a")).unwrap();
        layout
            .add_transition(a, Transition::to(StateId::new(9)).when(|c: &Ctx| c.open))
            .unwrap();
        layout.stages.push(StateId::new(7));

        match layout.validate() {
            Validation::Failure(violations) => {
                assert_eq!(violations.len(), 3);
                assert!(violations
                    .iter()
                    .any(|v| matches!(v, LayoutViolation::MissingInitialState)));
                assert!(violations
                    .iter()
                    .any(|v| matches!(v, LayoutViolation::DanglingTarget { .. })));
                assert!(violations
                    .iter()
                    .any(|v| matches!(v, LayoutViolation::DanglingStage(_))));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn initial_state_outside_layout_is_reported() {
        let mut layout = Layout::new();
        layout.add_state(state("a")).unwrap();
        layout.initial = Some(StateId::new(3));

        assert_eq!(
            layout.violations(),
            vec![LayoutViolation::InitialStateNotInLayout(StateId::new(3))]
        );
    }

    #[test]
    fn stages_keep_declaration_order() {
        let mut layout = Layout::new();
        let ids = layout
            .add_states(vec![state("a"), state("b"), state("c")])
            .unwrap();

        layout.add_stage(ids[2]).unwrap();
        layout.add_stage(ids[0]).unwrap();

        assert_eq!(layout.stages(), &[ids[2], ids[0]]);
        assert!(matches!(
            layout.add_stage(StateId::new(10)),
            Err(LayoutError::UnknownState(_))
        ));
    }

    #[test]
    fn find_looks_states_up_by_name() {
        let mut layout = Layout::new();
        let ids = layout.add_states(vec![state("red"), state("green")]).unwrap();

        assert_eq!(layout.find("green"), Some(ids[1]));
        assert_eq!(layout.find("blue"), None);
    }
}
