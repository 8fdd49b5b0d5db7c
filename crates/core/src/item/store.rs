//! The authoritative per-item lifecycle table.
//!
//! All state transitions in the pipeline are serialized through this store;
//! it is the single synchronization point the other components trust. Every
//! transition is an atomic check-and-move, so callers can detect and ignore
//! stale or duplicate signals instead of corrupting state.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use tokio::sync::watch;
use tracing::debug;

use super::types::{Item, ItemRecord, ItemState, StateCounts, SummaryResult};

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An item id was registered twice with different metadata.
    #[error("Duplicate item with conflicting metadata: {0}")]
    DuplicateItem(String),
}

/// Monotonic outcome totals, never decremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreTotals {
    /// Items that completed collection (reached `Collected`).
    pub collected: u64,
    /// Items that completed summarization (reached `Completed`).
    pub summarized: u64,
    /// Items that reached `Failed`.
    pub failed: u64,
    /// Items whose merged document was built entirely from cached parts.
    pub reused: u64,
}

struct StoreInner {
    records: HashMap<String, ItemRecord>,
    totals: StoreTotals,
    version: u64,
}

/// In-memory item state store with single-writer discipline.
///
/// A plain `std::sync::Mutex` serializes all mutation; operations are short
/// and never await while holding the lock, so the store is safe to call
/// from async contexts.
pub struct ItemStateStore {
    inner: Mutex<StoreInner>,
    version_tx: watch::Sender<u64>,
}

impl Default for ItemStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let (version_tx, _) = watch::channel(0);
        Self {
            inner: Mutex::new(StoreInner {
                records: HashMap::new(),
                totals: StoreTotals::default(),
                version: 0,
            }),
            version_tx,
        }
    }

    /// Subscribe to state changes.
    ///
    /// The channel carries a version counter bumped on every successful
    /// transition; receivers should re-read the store on change rather than
    /// rely on the value itself (updates coalesce).
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version_tx.subscribe()
    }

    /// Register a batch of items, all starting at `Idle`.
    ///
    /// Idempotent for identical items; a conflicting registration for an
    /// existing id fails the whole call without inserting anything.
    pub fn register(&self, items: Vec<Item>) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");

        for item in &items {
            if let Some(existing) = inner.records.get(&item.id) {
                if existing.item != *item {
                    return Err(StoreError::DuplicateItem(item.id.clone()));
                }
            }
        }

        let mut registered = 0u64;
        for item in items {
            if !inner.records.contains_key(&item.id) {
                inner.records.insert(item.id.clone(), ItemRecord::new(item));
                registered += 1;
            }
        }

        if registered > 0 {
            crate::metrics::ITEMS_REGISTERED.inc_by(registered);
            Self::notify(&mut inner, &self.version_tx);
        }

        Ok(())
    }

    /// Atomically move `id` to `to` if its current state is in `from_allowed`
    /// and the edge exists in the state graph.
    ///
    /// Returns `false` (a no-op, not an error) when the precondition fails:
    /// another path already moved the item, and the caller must abandon
    /// whatever action the transition was guarding.
    pub fn transition(&self, id: &str, from_allowed: &[ItemState], to: ItemState) -> bool {
        let mut inner = self.inner.lock().expect("store lock poisoned");

        let Some(record) = inner.records.get_mut(id) else {
            debug!("Transition for unknown item {} to {} ignored", id, to.as_str());
            return false;
        };

        let current = record.state;
        if !from_allowed.contains(&current) || !current.can_transition_to(to) {
            debug!(
                "Transition {} -> {} rejected for item {} (stale or invalid)",
                current.as_str(),
                to.as_str(),
                id
            );
            return false;
        }

        record.state = to;
        record.updated_at = Utc::now();

        match to {
            ItemState::Collected => inner.totals.collected += 1,
            ItemState::Completed => inner.totals.summarized += 1,
            ItemState::Failed => inner.totals.failed += 1,
            _ => {}
        }

        Self::notify(&mut inner, &self.version_tx);
        true
    }

    /// Record the final summary for an item together with the attempt count.
    pub fn record_summary(&self, id: &str, summary: SummaryResult, attempts: u32) {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        if let Some(record) = inner.records.get_mut(id) {
            record.summary = Some(summary);
            record.attempts = attempts;
            record.updated_at = Utc::now();
        }
    }

    /// Record the failure reason for an item.
    pub fn record_failure(&self, id: &str, error: impl Into<String>, attempts: u32) {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        if let Some(record) = inner.records.get_mut(id) {
            record.error = Some(error.into());
            record.attempts = attempts;
            record.updated_at = Utc::now();
        }
    }

    /// Mark an item's document as built entirely from cached parts.
    pub fn mark_reused(&self, id: &str) {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        if let Some(record) = inner.records.get_mut(id) {
            if !record.reused {
                record.reused = true;
                inner.totals.reused += 1;
            }
        }
    }

    /// Get a copy of an item's full record.
    pub fn get(&self, id: &str) -> Option<ItemRecord> {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner.records.get(id).cloned()
    }

    /// Get an item's current state.
    pub fn state_of(&self, id: &str) -> Option<ItemState> {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner.records.get(id).map(|r| r.state)
    }

    /// A consistent point-in-time copy of all item states.
    pub fn snapshot(&self) -> HashMap<String, ItemState> {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner
            .records
            .iter()
            .map(|(id, record)| (id.clone(), record.state))
            .collect()
    }

    /// Per-state counts at this instant.
    pub fn counts(&self) -> StateCounts {
        let inner = self.inner.lock().expect("store lock poisoned");
        let mut counts = StateCounts::default();
        for record in inner.records.values() {
            counts.bump(record.state);
        }
        counts
    }

    /// True when every registered item is in a terminal state.
    ///
    /// Vacuously true for an empty store. Necessary but not sufficient for
    /// pipeline completion; see the progress aggregator.
    pub fn all_terminal(&self) -> bool {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner.records.values().all(|r| r.state.is_terminal())
    }

    /// Monotonic outcome totals.
    pub fn totals(&self) -> StoreTotals {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner.totals
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner.records.len()
    }

    /// True when no items are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn notify(inner: &mut StoreInner, tx: &watch::Sender<u64>) {
        inner.version += 1;
        let _ = tx.send(inner.version);
    }
}
