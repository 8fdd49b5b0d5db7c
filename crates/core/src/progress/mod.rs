//! Progress tracking: in-flight activity counters, snapshot building, and
//! throttled publication.

mod activity;
mod aggregator;
mod config;
mod sink;
mod types;

pub use activity::ActivityTracker;
pub use aggregator::ProgressAggregator;
pub use config::ProgressConfig;
pub use sink::{FileSnapshotSink, SinkError, SnapshotSink, TracingSink};
pub use types::ProgressSnapshot;
