//! Guarded transitions between states.

use super::guard::Guard;
use super::state::{BoxError, StateId};
use std::fmt;

/// Side effect executed once while a transition is crossed.
pub type TransitionAction<C> = Box<dyn FnMut(&mut C) -> Result<(), BoxError> + Send>;

/// A directed edge out of a state.
///
/// The target is a non-owning [`StateId`] into the layout's state table.
/// A target of `None` means "leave the current state with no designated
/// successor".
///
/// # Example
///
/// ```rust
/// use statecraft::core::{StateId, Transition};
///
/// struct Job {
///     done: bool,
///     reported: u32,
/// }
///
/// let finish: Transition<Job> = Transition::to(StateId::new(1))
///     .when(|job: &Job| job.done)
///     .with_action(|job: &mut Job| {
///         job.reported += 1;
///         Ok(())
///     });
///
/// assert!(finish.is_valid());
/// assert!(finish.firing(&Job { done: true, reported: 0 }));
/// assert!(!finish.firing(&Job { done: false, reported: 0 }));
/// ```
pub struct Transition<C> {
    guard: Option<Guard<C>>,
    next: Option<StateId>,
    action: Option<TransitionAction<C>>,
}

impl<C> Transition<C> {
    /// Transition towards `next`. A guard must still be attached.
    pub fn to(next: StateId) -> Self {
        Self {
            guard: None,
            next: Some(next),
            action: None,
        }
    }

    /// Transition that leaves the current state with no successor.
    pub fn leave() -> Self {
        Self {
            guard: None,
            next: None,
            action: None,
        }
    }

    /// Attach a guard built from a predicate.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Attach a prebuilt guard.
    pub fn guarded_by(mut self, guard: Guard<C>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Fire unconditionally.
    pub fn always(mut self) -> Self
    where
        C: 'static,
    {
        self.guard = Some(Guard::always());
        self
    }

    /// Attach the transiting action.
    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: FnMut(&mut C) -> Result<(), BoxError> + Send + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// A transition is valid once it has a guard to evaluate.
    pub fn is_valid(&self) -> bool {
        self.guard.is_some()
    }

    /// Evaluate the guard. An unguarded transition never fires.
    pub fn firing(&self, context: &C) -> bool {
        self.guard.as_ref().is_some_and(|g| g.check(context))
    }

    pub fn next_state(&self) -> Option<StateId> {
        self.next
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    /// Run the transiting action, if any.
    pub fn execute_transiting_action(&mut self, context: &mut C) -> Result<(), BoxError> {
        match self.action.as_mut() {
            Some(action) => action(context),
            None => Ok(()),
        }
    }
}

impl<C> fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("guarded", &self.guard.is_some())
            .field("next", &self.next)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}
