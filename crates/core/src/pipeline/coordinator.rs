//! Pipeline lifecycle coordination.
//!
//! Wires the store, collection pool, merger, summarization worker and
//! progress aggregator together and drives them through register, start,
//! wait and shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use crate::collector::CollectorRegistry;
use crate::config::Config;
use crate::coordinator::{CollectionCoordinator, CoordinatorStatus};
use crate::item::{Item, ItemStateStore};
use crate::merger::{DataMerger, MergePolicyTable};
use crate::progress::{ActivityTracker, ProgressAggregator, ProgressSnapshot, SnapshotSink};
use crate::summarizer::{SummarizationWorker, Summarizer};

use super::types::{PipelineError, PipelineStatistics};

/// Owns the whole pipeline and its lifecycle.
pub struct PipelineCoordinator {
    store: Arc<ItemStateStore>,
    collection: CollectionCoordinator,
    worker: Arc<SummarizationWorker>,
    aggregator: ProgressAggregator,
    started: AtomicBool,
}

impl PipelineCoordinator {
    /// Build a pipeline from configuration and collaborators. Nothing runs
    /// until `start`.
    pub fn new(
        config: Config,
        registry: CollectorRegistry,
        summarizer: Arc<dyn Summarizer>,
        sink: Arc<dyn SnapshotSink>,
    ) -> Self {
        let store = Arc::new(ItemStateStore::new());
        let activity = Arc::new(ActivityTracker::new());
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();

        let merger = Arc::new(DataMerger::new(
            store.clone(),
            MergePolicyTable::new(),
            queue_tx,
            activity.clone(),
        ));

        let collection = CollectionCoordinator::new(
            config.collection.clone(),
            store.clone(),
            Arc::new(registry),
            merger,
            activity.clone(),
        );

        let worker = Arc::new(SummarizationWorker::new(
            config.summarization.clone(),
            store.clone(),
            summarizer,
            activity.clone(),
            queue_rx,
        ));

        let aggregator = ProgressAggregator::new(
            config.progress.clone(),
            store.clone(),
            activity,
            sink,
        );

        Self {
            store,
            collection,
            worker,
            aggregator,
            started: AtomicBool::new(false),
        }
    }

    /// Register items for processing. Only allowed before `start`; the
    /// worker pool assumes the item set is fixed once running.
    pub fn register_items(&self, items: Vec<Item>) -> Result<(), PipelineError> {
        if self.started.load(Ordering::SeqCst) {
            return Err(PipelineError::AlreadyStarted);
        }
        self.store.register(items)?;
        Ok(())
    }

    /// Start every pipeline component. Idempotent.
    pub fn start(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        info!(items = self.store.len(), "Starting pipeline");
        self.aggregator.start();
        self.worker.start();
        self.collection.start();
    }

    /// Stop every pipeline component gracefully. Idempotent; safe to call
    /// before `start`.
    pub fn shutdown(&self) {
        info!("Shutting down pipeline");
        self.collection.stop();
        self.worker.stop();
        self.aggregator.stop();
    }

    /// Wait until every item is terminal and nothing is in flight, or the
    /// timeout elapses. Returns true when completion was reached.
    pub async fn wait_for_completion(&self, timeout: Duration) -> bool {
        self.aggregator.wait_for_completion(timeout).await
    }

    /// Current progress snapshot, built on demand.
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.aggregator.snapshot()
    }

    /// Aggregate outcome counters.
    pub fn statistics(&self) -> PipelineStatistics {
        let totals = self.store.totals();
        PipelineStatistics {
            total: self.store.len() as u64,
            collected: totals.collected,
            summarized: totals.summarized,
            failed: totals.failed,
            reused: totals.reused,
        }
    }

    /// Collection pool status.
    pub fn collection_status(&self) -> CoordinatorStatus {
        self.collection.status()
    }

    /// The underlying state store, for inspection.
    pub fn store(&self) -> &Arc<ItemStateStore> {
        &self.store
    }
}
