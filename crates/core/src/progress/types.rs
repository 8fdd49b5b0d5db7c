//! Progress snapshot types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::StateCounts;

/// Point-in-time view of pipeline progress.
///
/// Snapshots are monotonic: terminal states are sticky in the store, so the
/// terminal count never decreases between two snapshots taken in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressSnapshot {
    pub taken_at: DateTime<Utc>,
    /// Registered items.
    pub total: usize,
    /// Per-state item counts.
    pub counts: StateCounts,
    /// Fraction of items in a terminal state, in `0.0..=1.0`.
    pub completion_rate: f32,
    /// True only when every item is terminal AND no work is in flight
    /// anywhere in the pipeline.
    pub fully_done: bool,
}

impl ProgressSnapshot {
    /// Build a snapshot from the current counts and in-flight activity.
    pub(crate) fn build(counts: StateCounts, quiet: bool) -> Self {
        let total = counts.total();
        let completion_rate = if total == 0 {
            1.0
        } else {
            counts.terminal() as f32 / total as f32
        };
        Self {
            taken_at: Utc::now(),
            total,
            counts,
            completion_rate,
            fully_done: counts.terminal() == total && quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_is_fully_done() {
        let snapshot = ProgressSnapshot::build(StateCounts::default(), true);
        assert_eq!(snapshot.total, 0);
        assert_eq!(snapshot.completion_rate, 1.0);
        assert!(snapshot.fully_done);
    }

    #[test]
    fn test_in_flight_work_blocks_fully_done() {
        let counts = StateCounts {
            completed: 2,
            ..Default::default()
        };
        let snapshot = ProgressSnapshot::build(counts, false);
        assert_eq!(snapshot.completion_rate, 1.0);
        assert!(!snapshot.fully_done);
    }

    #[test]
    fn test_completion_rate() {
        let counts = StateCounts {
            idle: 1,
            completed: 2,
            failed: 1,
            ..Default::default()
        };
        let snapshot = ProgressSnapshot::build(counts, true);
        assert_eq!(snapshot.total, 4);
        assert_eq!(snapshot.completion_rate, 0.75);
        assert!(!snapshot.fully_done);
    }
}
