//! Joins partial collection results into complete documents.
//!
//! The merger is the single handoff point between the collection stage and
//! the summarization queue: every item passes through it exactly once.

mod types;

pub use types::{MergePolicy, MergePolicyTable, MergedDocument};

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::collector::PartialResult;
use crate::item::{ItemState, ItemStateStore, PartKind};
use crate::progress::ActivityTracker;
use crate::summarizer::SummarizationJob;

struct MergerInner {
    /// Parts accumulated so far for items not yet merged.
    pending: HashMap<String, BTreeMap<PartKind, PartialResult>>,
    /// Items already merged and enqueued; late parts for these are dropped.
    merged: HashSet<String>,
}

/// Accumulates partial results per item and fires a single merged document
/// into the summarization queue once the item's merge policy is satisfied.
pub struct DataMerger {
    store: Arc<ItemStateStore>,
    policies: MergePolicyTable,
    queue_tx: mpsc::UnboundedSender<SummarizationJob>,
    activity: Arc<ActivityTracker>,
    inner: Mutex<MergerInner>,
}

impl DataMerger {
    pub fn new(
        store: Arc<ItemStateStore>,
        policies: MergePolicyTable,
        queue_tx: mpsc::UnboundedSender<SummarizationJob>,
        activity: Arc<ActivityTracker>,
    ) -> Self {
        Self {
            store,
            policies,
            queue_tx,
            activity,
            inner: Mutex::new(MergerInner {
                pending: HashMap::new(),
                merged: HashSet::new(),
            }),
        }
    }

    /// Accept one partial result. If it completes the item's expected set
    /// per the merge policy, build the merged document and enqueue it.
    ///
    /// Readiness is checked while holding the internal lock, so concurrent
    /// arrivals for the same item produce exactly one merged document.
    pub fn on_part_arrived(&self, part: PartialResult) {
        let Some(record) = self.store.get(&part.item_id) else {
            warn!(item_id = %part.item_id, "Dropping part for unknown item");
            return;
        };
        let item = record.item;

        let document = {
            let mut inner = self.inner.lock().expect("merger lock poisoned");

            if inner.merged.contains(&part.item_id) {
                warn!(
                    item_id = %part.item_id,
                    part_kind = ?part.part_kind,
                    "Dropping part for already merged item"
                );
                return;
            }

            let parts = inner.pending.entry(part.item_id.clone()).or_default();
            if parts.insert(part.part_kind, part.clone()).is_some() {
                warn!(
                    item_id = %part.item_id,
                    part_kind = ?part.part_kind,
                    "Replaced duplicate part for pending item"
                );
            }

            let expected = item.source_kind.expected_parts();
            let present: Vec<PartKind> = parts.keys().copied().collect();
            let policy = self.policies.policy_for(item.source_kind);
            if !policy.is_satisfied(expected, &present) {
                debug!(
                    item_id = %part.item_id,
                    present = present.len(),
                    expected = expected.len(),
                    "Item not ready to merge yet"
                );
                return;
            }

            // Mark merged before releasing the lock so no second document
            // can fire for this item, whatever happens downstream.
            let parts = inner
                .pending
                .remove(&part.item_id)
                .unwrap_or_default();
            inner.merged.insert(part.item_id.clone());

            let from_cache = !parts.is_empty() && parts.values().all(|p| p.from_cache);
            MergedDocument {
                item_id: item.id.clone(),
                source_kind: item.source_kind,
                url: item.url.clone(),
                parts: parts
                    .into_iter()
                    .map(|(kind, p)| (kind, p.content))
                    .collect(),
                from_cache,
                merged_at: Utc::now(),
            }
        };

        if !self
            .store
            .transition(&document.item_id, &[ItemState::Collected], ItemState::Queued)
        {
            warn!(
                item_id = %document.item_id,
                "Merged document dropped, item no longer in collected state"
            );
            return;
        }

        if document.from_cache {
            self.store.mark_reused(&document.item_id);
        }

        debug!(
            item_id = %document.item_id,
            parts = document.parts.len(),
            from_cache = document.from_cache,
            "Item merged, enqueueing for summarization"
        );
        crate::metrics::MERGES_TOTAL.inc();
        self.activity.job_enqueued();
        if self.queue_tx.send(SummarizationJob::new(document)).is_err() {
            warn!("Summarization queue closed, merged document lost");
            self.activity.job_dropped();
        }
    }

    /// Ids of items with at least one part that have not merged yet.
    pub fn pending_items(&self) -> Vec<String> {
        let inner = self.inner.lock().expect("merger lock poisoned");
        inner.pending.keys().cloned().collect()
    }

    pub fn pending_count(&self) -> usize {
        let inner = self.inner.lock().expect("merger lock poisoned");
        inner.pending.len()
    }
}
