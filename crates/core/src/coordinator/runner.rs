//! Collection worker pool.
//!
//! Spawns a fixed number of workers. Each worker repeatedly claims one idle
//! item through the store's atomic transition, runs every registered
//! collector for the item's source kind concurrently, and hands the partial
//! results to the merger. The claim is the only coordination between
//! workers; losing it just means another worker got there first.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::collector::CollectorRegistry;
use crate::item::{Item, ItemState, ItemStateStore};
use crate::merger::DataMerger;
use crate::metrics;
use crate::progress::ActivityTracker;

use super::config::CollectionConfig;
use super::types::CoordinatorStatus;

/// The bounded collection worker pool.
pub struct CollectionCoordinator {
    config: CollectionConfig,
    store: Arc<ItemStateStore>,
    registry: Arc<CollectorRegistry>,
    merger: Arc<DataMerger>,
    activity: Arc<ActivityTracker>,
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
}

impl CollectionCoordinator {
    pub fn new(
        config: CollectionConfig,
        store: Arc<ItemStateStore>,
        registry: Arc<CollectorRegistry>,
        merger: Arc<DataMerger>,
        activity: Arc<ActivityTracker>,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            config,
            store,
            registry,
            merger,
            activity,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        }
    }

    /// Start the worker pool (spawns `max_concurrent` background tasks).
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Collection coordinator already running");
            return;
        }

        info!(
            workers = self.config.max_concurrent,
            "Starting collection coordinator"
        );
        for worker_id in 0..self.config.max_concurrent {
            self.spawn_worker(worker_id);
        }
    }

    /// Stop the pool. Workers finish their current item, then exit.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        info!("Stopping collection coordinator");
        let _ = self.shutdown_tx.send(());
    }

    pub fn status(&self) -> CoordinatorStatus {
        CoordinatorStatus {
            running: self.running.load(Ordering::SeqCst),
            active_workers: self.activity.active_collectors(),
            max_concurrent: self.config.max_concurrent,
        }
    }

    fn spawn_worker(&self, worker_id: usize) {
        let running = Arc::clone(&self.running);
        let store = Arc::clone(&self.store);
        let registry = Arc::clone(&self.registry);
        let merger = Arc::clone(&self.merger);
        let activity = Arc::clone(&self.activity);
        let idle_interval = Duration::from_millis(self.config.idle_poll_interval_ms);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            debug!(worker_id, "Collection worker started");
            loop {
                if !running.load(Ordering::SeqCst) {
                    break;
                }

                match Self::claim_next(&store) {
                    Some(item) => {
                        activity.collector_started();
                        Self::process_item(&store, &registry, &merger, item).await;
                        activity.collector_finished();
                    }
                    None => {
                        // No idle items right now, back off before retrying.
                        tokio::select! {
                            _ = shutdown_rx.recv() => break,
                            _ = tokio::time::sleep(idle_interval) => {}
                        }
                    }
                }
            }
            debug!(worker_id, "Collection worker stopped");
        });
    }

    /// Claim one idle item via the store's atomic transition. Returns the
    /// claimed item, or `None` when no item could be claimed.
    fn claim_next(store: &ItemStateStore) -> Option<Item> {
        for (id, state) in store.snapshot() {
            if state != ItemState::Idle {
                continue;
            }
            // Another worker may have claimed it between snapshot and here;
            // a false transition just means we try the next candidate.
            if store.transition(&id, &[ItemState::Idle], ItemState::Collecting) {
                return store.get(&id).map(|record| record.item);
            }
        }
        None
    }

    /// Run all collectors for one claimed item and hand results to the
    /// merger. Always drives the item to `Collected` or `Failed`.
    async fn process_item(
        store: &ItemStateStore,
        registry: &CollectorRegistry,
        merger: &DataMerger,
        item: Item,
    ) {
        let started = std::time::Instant::now();
        let collectors = registry.collectors_for(item.source_kind);

        if collectors.is_empty() {
            warn!(
                item_id = %item.id,
                source_kind = %item.source_kind.as_str(),
                "No collectors registered for source kind"
            );
            store.record_failure(
                &item.id,
                format!(
                    "no collectors registered for source kind {}",
                    item.source_kind.as_str()
                ),
                0,
            );
            store.transition(&item.id, &[ItemState::Collecting], ItemState::Failed);
            metrics::COLLECTIONS_TOTAL.with_label_values(&["failure"]).inc();
            return;
        }

        debug!(
            item_id = %item.id,
            collectors = collectors.len(),
            "Collecting item"
        );

        let results = join_all(collectors.iter().map(|c| c.collect(&item))).await;

        let mut parts = Vec::with_capacity(results.len());
        let mut errors = Vec::new();
        for (collector, result) in collectors.iter().zip(results) {
            match result {
                Ok(part) => parts.push(part),
                Err(e) => errors.push(format!("{}: {}", collector.name(), e)),
            }
        }

        // Any collector failure fails the whole item; partial documents
        // never reach the summarizer.
        if !errors.is_empty() {
            warn!(
                item_id = %item.id,
                errors = errors.len(),
                "Collection failed"
            );
            store.record_failure(&item.id, errors.join("; "), 0);
            store.transition(&item.id, &[ItemState::Collecting], ItemState::Failed);
            metrics::COLLECTIONS_TOTAL.with_label_values(&["failure"]).inc();
            return;
        }

        // Mark collected first so the merger's queue handoff sees the item
        // in the state it expects.
        if !store.transition(&item.id, &[ItemState::Collecting], ItemState::Collected) {
            warn!(item_id = %item.id, "Item left collecting state mid-flight");
            return;
        }
        metrics::COLLECTIONS_TOTAL.with_label_values(&["success"]).inc();
        metrics::COLLECTION_DURATION.observe(started.elapsed().as_secs_f64());

        for part in parts {
            merger.on_part_arrived(part);
        }
    }
}
