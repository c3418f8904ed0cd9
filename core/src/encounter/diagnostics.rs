//! Per-encounter diagnostic log
//!
//! Live-tick faults never propagate as errors. They are recorded here, mirrored to
//! `tracing`, and the encounter keeps running.

use std::collections::VecDeque;

use chrono::NaiveDateTime;
use serde::Serialize;

/// A reported protocol divergence or invariant violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub at: NaiveDateTime,
    /// Component or subsystem that reported it
    pub source: String,
    /// Timeline state current when it was reported
    pub state: Option<String>,
    pub message: String,
}

/// Bounded diagnostic buffer; the oldest entries are dropped first.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    entries: VecDeque<Diagnostic>,
    capacity: usize,
    dropped: usize,
}

impl ErrorLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub fn report(
        &mut self,
        at: NaiveDateTime,
        source: &str,
        state: Option<&str>,
        message: impl Into<String>,
    ) {
        let message = message.into();
        tracing::warn!(source, state, %at, "{message}");

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.dropped += 1;
        }
        self.entries.push_back(Diagnostic {
            at,
            source: source.to_string(),
            state: state.map(str::to_string),
            message,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries discarded because the log was full
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn drain(&mut self) -> Vec<Diagnostic> {
        self.entries.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, init_tracing};

    #[test]
    fn keeps_newest_entries() {
        init_tracing();
        let mut log = ErrorLog::new(2);
        log.report(at(1.0), "a", None, "first");
        log.report(at(2.0), "b", Some("S1"), "second");
        log.report(at(3.0), "c", None, "third");

        assert_eq!(log.len(), 2);
        assert_eq!(log.dropped(), 1);

        let drained = log.drain();
        assert_eq!(drained[0].message, "second");
        assert_eq!(drained[0].state.as_deref(), Some("S1"));
        assert_eq!(drained[1].source, "c");
        assert!(log.is_empty());
    }
}
