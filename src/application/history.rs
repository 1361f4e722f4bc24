//! Recent activity log shown in the sidebar.

use std::collections::VecDeque;

use chrono::{Local, NaiveTime};

/// Maximum number of entries kept.
pub const HISTORY_CAPACITY: usize = 10;

/// Bounded, newest-first list of `HH:MM:SS: action` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationHistory {
    entries: VecDeque<String>,
}

impl OperationHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an action at the current local time.
    pub fn record(&mut self, action: &str) {
        self.record_at(Local::now().time(), action);
    }

    pub fn record_at(&mut self, time: NaiveTime, action: &str) {
        self.entries
            .push_front(format!("{}: {}", time.format("%H:%M:%S"), action));
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
