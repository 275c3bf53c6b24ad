//! Guard predicates for controlling transitions.
//!
//! A guard decides whether a transition currently fires. Guards only read
//! the engine context; side effects belong in the transiting action.

use std::fmt;

/// Pure predicate over the engine context that decides whether a
/// transition fires.
///
/// # Example
///
/// ```rust
/// use statecraft::core::Guard;
///
/// struct Sensor {
///     temperature: i32,
/// }
///
/// let overheating = Guard::new(|s: &Sensor| s.temperature > 90);
///
/// assert!(overheating.check(&Sensor { temperature: 95 }));
/// assert!(!overheating.check(&Sensor { temperature: 20 }));
/// ```
pub struct Guard<C> {
    predicate: Box<dyn Fn(&C) -> bool + Send + Sync>,
}

impl<C> Guard<C> {
    /// Create a guard from a predicate.
    ///
    /// The predicate must be deterministic for a given context and free of
    /// side effects: the engine may evaluate it any number of times.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Guard that fires on every evaluation.
    pub fn always() -> Self
    where
        C: 'static,
    {
        Guard::new(|_: &C| true)
    }

    /// Evaluate the guard against the context.
    pub fn check(&self, context: &C) -> bool {
        (self.predicate)(context)
    }
}

impl<C> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
