//! Progress aggregation and snapshot publication.
//!
//! Watches the store's change counter and publishes throttled snapshots to
//! the configured sink. Terminal-state changes bypass the throttle so a
//! burst of completions is never silently coalesced away.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::item::ItemStateStore;
use crate::metrics;

use super::activity::ActivityTracker;
use super::config::ProgressConfig;
use super::sink::SnapshotSink;
use super::types::ProgressSnapshot;

/// Builds and publishes progress snapshots, and answers the completion
/// predicate.
pub struct ProgressAggregator {
    config: ProgressConfig,
    store: Arc<ItemStateStore>,
    activity: Arc<ActivityTracker>,
    sink: Arc<dyn SnapshotSink>,
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
}

impl ProgressAggregator {
    pub fn new(
        config: ProgressConfig,
        store: Arc<ItemStateStore>,
        activity: Arc<ActivityTracker>,
        sink: Arc<dyn SnapshotSink>,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            config,
            store,
            activity,
            sink,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        }
    }

    /// Start the publisher loop (spawns one background task).
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Progress aggregator already running");
            return;
        }

        let running = Arc::clone(&self.running);
        let store = Arc::clone(&self.store);
        let activity = Arc::clone(&self.activity);
        let sink = Arc::clone(&self.sink);
        let min_interval = Duration::from_millis(self.config.min_publish_interval_ms);
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut version_rx = self.store.subscribe();

        tokio::spawn(async move {
            info!("Progress aggregator started");
            let mut last_publish: Option<tokio::time::Instant> = None;
            let mut last_terminal = 0usize;

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    changed = version_rx.changed() => {
                        if changed.is_err() {
                            debug!("Store change channel closed, aggregator exiting");
                            break;
                        }
                    }
                }

                let snapshot = ProgressSnapshot::build(store.counts(), activity.is_quiet());
                let terminal = snapshot.counts.terminal();

                let throttled = last_publish
                    .is_some_and(|at| at.elapsed() < min_interval);
                // Terminal progress and completion always go out.
                if throttled && terminal == last_terminal && !snapshot.fully_done {
                    continue;
                }

                Self::publish(&sink, &snapshot).await;
                last_publish = Some(tokio::time::Instant::now());
                last_terminal = terminal;
            }

            // One final snapshot so the sink sees the end state.
            let snapshot = ProgressSnapshot::build(store.counts(), activity.is_quiet());
            Self::publish(&sink, &snapshot).await;
            running.store(false, Ordering::SeqCst);
            info!("Progress aggregator stopped");
        });
    }

    /// Stop the publisher. A final snapshot is published on the way out.
    pub fn stop(&self) {
        if !self.running.load(Ordering::SeqCst) {
            return;
        }
        let _ = self.shutdown_tx.send(());
    }

    async fn publish(sink: &Arc<dyn SnapshotSink>, snapshot: &ProgressSnapshot) {
        match sink.publish(snapshot).await {
            Ok(()) => metrics::SNAPSHOTS_PUBLISHED.inc(),
            Err(e) => warn!(error = %e, "Failed to publish progress snapshot"),
        }
    }

    /// Build a snapshot on demand, bypassing the publisher and throttle.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::build(self.store.counts(), self.activity.is_quiet())
    }

    /// True only when every item is terminal and no work is in flight.
    pub fn is_fully_done(&self) -> bool {
        self.store.all_terminal() && self.activity.is_quiet()
    }

    /// Wait until the pipeline is fully done, or the timeout elapses.
    /// Returns true when completion was reached.
    pub async fn wait_for_completion(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.is_fully_done() {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }
}
