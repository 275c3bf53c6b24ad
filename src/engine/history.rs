//! Record of the transitions an engine performed.

use crate::core::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// How the engine came to change its applicative state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// A guard fired on the active state.
    Guarded,
    /// The client called `transit_to`.
    Forced,
    /// The applicative state was empty and the next stage was dequeued.
    Stage,
}

/// A single change of applicative state.
///
/// `from` is `None` for stage advances, `to` is `None` when a transition
/// left the machine without a successor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: Option<StateId>,
    pub to: Option<StateId>,
    pub kind: TransitionKind,
    pub timestamp: DateTime<Utc>,
}

/// Ordered log of transition records.
///
/// With a limit, the oldest record is dropped once the log is full.
///
/// # Example
///
/// ```rust
/// use statecraft::core::StateId;
/// use statecraft::engine::{TransitionHistory, TransitionKind, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = TransitionHistory::new();
/// history.record(TransitionRecord {
///     from: Some(StateId::new(0)),
///     to: Some(StateId::new(1)),
///     kind: TransitionKind::Guarded,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.path(), vec![StateId::new(0), StateId::new(1)]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransitionHistory {
    records: VecDeque<TransitionRecord>,
    #[serde(default)]
    limit: Option<usize>,
}

impl TransitionHistory {
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    /// A history keeping at most `limit` records; `None` keeps everything.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            records: VecDeque::new(),
            limit,
        }
    }

    pub fn record(&mut self, record: TransitionRecord) {
        match self.limit {
            Some(0) => return,
            Some(limit) if self.records.len() >= limit => {
                self.records.pop_front();
            }
            _ => {}
        }
        self.records.push_back(record);
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// States visited, in order: the source of the first record, then
    /// every non-empty destination.
    pub fn path(&self) -> Vec<StateId> {
        let mut path = Vec::new();
        if let Some(first) = self.records.front().and_then(|r| r.from) {
            path.push(first);
        }
        path.extend(self.records.iter().filter_map(|r| r.to));
        path
    }

    /// Time between the first and the last record, `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.front(), self.records.back()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    pub fn records(&self) -> &VecDeque<TransitionRecord> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}
