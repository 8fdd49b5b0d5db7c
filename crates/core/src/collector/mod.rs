//! Content collector boundary: the trait, its result type, and the
//! per-source-kind registry consumed by the collection coordinator.

mod error;
mod traits;
mod types;

pub use error::CollectorError;
pub use traits::Collector;
pub use types::PartialResult;

use std::collections::HashMap;
use std::sync::Arc;

use crate::item::SourceKind;

/// Maps each source kind to the collectors that serve it.
///
/// Built once at wiring time and shared read-only afterwards.
#[derive(Default)]
pub struct CollectorRegistry {
    by_kind: HashMap<SourceKind, Vec<Arc<dyn Collector>>>,
}

impl CollectorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collector for a source kind (builder style).
    pub fn with_collector(mut self, kind: SourceKind, collector: Arc<dyn Collector>) -> Self {
        self.register(kind, collector);
        self
    }

    /// Register a collector for a source kind.
    pub fn register(&mut self, kind: SourceKind, collector: Arc<dyn Collector>) {
        self.by_kind.entry(kind).or_default().push(collector);
    }

    /// Collectors serving the given kind, in registration order.
    pub fn collectors_for(&self, kind: SourceKind) -> &[Arc<dyn Collector>] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when no collectors are registered at all.
    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }
}
