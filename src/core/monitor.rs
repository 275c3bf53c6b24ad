//! Entry/exit instrumentation for monitored states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counters and timestamps kept by a monitored state.
///
/// Only the engine's hook dispatch records entries and exits. Clients may
/// clear the fields with [`Monitor::reset_entry_count`] and
/// [`Monitor::reset_last_times`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    entry_count: u64,
    last_entry_time: Option<DateTime<Utc>>,
    last_exit_time: Option<DateTime<Utc>>,
}

impl Monitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the state has been entered.
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// When the state was last entered, `None` before the first entry.
    pub fn last_entry_time(&self) -> Option<DateTime<Utc>> {
        self.last_entry_time
    }

    /// When the state was last exited, `None` before the first exit.
    pub fn last_exit_time(&self) -> Option<DateTime<Utc>> {
        self.last_exit_time
    }

    pub fn reset_entry_count(&mut self) {
        self.entry_count = 0;
    }

    pub fn reset_last_times(&mut self) {
        self.last_entry_time = None;
        self.last_exit_time = None;
    }

    pub(crate) fn record_entry(&mut self, at: DateTime<Utc>) {
        self.entry_count += 1;
        self.last_entry_time = Some(at);
    }

    pub(crate) fn record_exit(&mut self, at: DateTime<Utc>) {
        self.last_exit_time = Some(at);
    }
}
