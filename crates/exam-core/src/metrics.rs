//! Process-wide composition counters.
//!
//! Counters are bumped silently by the engine. Call [`Metrics::flush`] to
//! emit the current values as one `tracing::info!` event (e.g. before a CLI
//! command exits).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    exams_composed: AtomicU64,
    relaxations: AtomicU64,
    exhausted_topics: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            exams_composed: AtomicU64::new(0),
            relaxations: AtomicU64::new(0),
            exhausted_topics: AtomicU64::new(0),
        }
    }

    pub fn inc_exams_composed(&self) {
        self.exams_composed.fetch_add(1, Ordering::Relaxed);
    }

    /// A topic had to be retried at a lower strictness.
    pub fn inc_relaxations(&self) {
        self.relaxations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_exhausted_topics(&self) {
        self.exhausted_topics.fetch_add(1, Ordering::Relaxed);
    }

    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            exams_composed = self.exams_composed(),
            relaxations = self.relaxations(),
            exhausted_topics = self.exhausted_topics(),
        );
    }

    pub fn exams_composed(&self) -> u64 {
        self.exams_composed.load(Ordering::Relaxed)
    }

    pub fn relaxations(&self) -> u64 {
        self.relaxations.load(Ordering::Relaxed)
    }

    pub fn exhausted_topics(&self) -> u64 {
        self.exhausted_topics.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_counters_increment() {
        let metrics = Metrics::new();
        metrics.inc_exams_composed();
        metrics.inc_relaxations();
        metrics.inc_relaxations();
        assert_eq!(metrics.exams_composed(), 1);
        assert_eq!(metrics.relaxations(), 2);
        assert_eq!(metrics.exhausted_topics(), 0);
        metrics.flush();
    }
}
