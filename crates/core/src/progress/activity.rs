//! Shared worker-activity counters backing the completion predicate.
//!
//! "Every item has a terminal flag" is necessary but not sufficient for
//! pipeline completion: a collection worker may still be mid-handoff, or a
//! merged document may sit in the summarization queue. These counters track
//! exactly that in-flight work so the aggregator can tell the difference.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Cross-component in-flight work counters.
///
/// Cheap to share; every field is an atomic. The collection coordinator,
/// merger, and summarization worker update it; only the aggregator reads it
/// for decisions.
#[derive(Debug, Default)]
pub struct ActivityTracker {
    active_collectors: AtomicUsize,
    queued_jobs: AtomicUsize,
    summarizing: AtomicBool,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A collection worker claimed an item; spans claim to merger handoff.
    pub fn collector_started(&self) {
        self.active_collectors.fetch_add(1, Ordering::SeqCst);
    }

    pub fn collector_finished(&self) {
        self.active_collectors.fetch_sub(1, Ordering::SeqCst);
    }

    /// A merged document was enqueued for summarization.
    pub fn job_enqueued(&self) {
        self.queued_jobs.fetch_add(1, Ordering::SeqCst);
    }

    /// The summarization worker picked up a job.
    pub fn job_started(&self) {
        self.queued_jobs.fetch_sub(1, Ordering::SeqCst);
        self.summarizing.store(true, Ordering::SeqCst);
    }

    /// The current job reached a terminal outcome.
    pub fn job_finished(&self) {
        self.summarizing.store(false, Ordering::SeqCst);
    }

    /// An enqueued job was dropped without ever running (queue closed
    /// during shutdown).
    pub fn job_dropped(&self) {
        self.queued_jobs.fetch_sub(1, Ordering::SeqCst);
    }

    /// Number of collection workers currently holding an item.
    pub fn active_collectors(&self) -> usize {
        self.active_collectors.load(Ordering::SeqCst)
    }

    /// Jobs enqueued but not yet picked up.
    pub fn queued_jobs(&self) -> usize {
        self.queued_jobs.load(Ordering::SeqCst)
    }

    /// True while the summarization worker is mid-job.
    pub fn is_summarizing(&self) -> bool {
        self.summarizing.load(Ordering::SeqCst)
    }

    /// True when no collector is active, the queue is empty, and no job is
    /// mid-flight. Combined with `ItemStateStore::all_terminal` this is the
    /// full "is everything really done" predicate.
    pub fn is_quiet(&self) -> bool {
        self.active_collectors() == 0 && self.queued_jobs() == 0 && !self.is_summarizing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracker_is_quiet() {
        let tracker = ActivityTracker::new();
        assert!(tracker.is_quiet());
    }

    #[test]
    fn test_collector_span() {
        let tracker = ActivityTracker::new();
        tracker.collector_started();
        assert_eq!(tracker.active_collectors(), 1);
        assert!(!tracker.is_quiet());
        tracker.collector_finished();
        assert!(tracker.is_quiet());
    }

    #[test]
    fn test_queue_and_job_lifecycle() {
        let tracker = ActivityTracker::new();
        tracker.job_enqueued();
        assert_eq!(tracker.queued_jobs(), 1);
        assert!(!tracker.is_quiet());

        tracker.job_started();
        assert_eq!(tracker.queued_jobs(), 0);
        assert!(tracker.is_summarizing());
        assert!(!tracker.is_quiet());

        tracker.job_finished();
        assert!(tracker.is_quiet());
    }
}
