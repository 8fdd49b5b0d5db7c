//! Mock snapshot sink for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::progress::{ProgressSnapshot, SinkError, SnapshotSink};

/// Mock implementation of the SnapshotSink trait.
///
/// Records every published snapshot in order, and can fail the next N
/// publishes to exercise the aggregator's error handling.
#[derive(Debug, Default)]
pub struct MockSink {
    published: RwLock<Vec<ProgressSnapshot>>,
    fail_remaining: AtomicUsize,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` publish calls.
    pub fn fail_next(&self, count: usize) {
        self.fail_remaining.store(count, Ordering::SeqCst);
    }

    /// All successfully published snapshots, in publish order.
    pub fn published(&self) -> Vec<ProgressSnapshot> {
        self.published.read().unwrap().clone()
    }
}

#[async_trait]
impl SnapshotSink for MockSink {
    async fn publish(&self, snapshot: &ProgressSnapshot) -> Result<(), SinkError> {
        let remaining = self.fail_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(SinkError::Io(std::io::Error::other("injected sink failure")));
        }
        self.published.write().unwrap().push(snapshot.clone());
        Ok(())
    }
}
