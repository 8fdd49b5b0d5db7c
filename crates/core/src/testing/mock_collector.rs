//! Mock collector for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use crate::collector::{Collector, CollectorError, PartialResult};
use crate::item::{Item, PartKind};

/// Mock implementation of the Collector trait.
///
/// Provides controllable behavior for testing:
/// - Configurable content per item (with a sensible default)
/// - Per-item failure injection
/// - Simulated latency and cache hits
/// - Records every collect call, plus a concurrency high-water mark
///
/// # Example
///
/// ```rust,ignore
/// use digester_core::testing::MockCollector;
/// use digester_core::item::PartKind;
///
/// let collector = MockCollector::new("transcript", PartKind::Transcript);
/// collector.set_content("v1", "hand-written transcript");
/// collector.fail_for_item("v2", "subtitles disabled");
///
/// // ... run the pipeline ...
///
/// assert_eq!(collector.recorded_collects(), vec!["v1".to_string()]);
/// ```
pub struct MockCollector {
    name: String,
    part_kind: PartKind,
    /// Configured content per item id.
    contents: RwLock<HashMap<String, String>>,
    /// Item ids that should fail, with the error message.
    failures: RwLock<HashMap<String, String>>,
    /// Simulated collection latency.
    delay: RwLock<Option<Duration>>,
    /// When true, results report a cache hit.
    from_cache: AtomicBool,
    /// Item ids collected, in call order.
    collects: RwLock<Vec<String>>,
    in_flight: AtomicUsize,
    high_water: AtomicUsize,
}

impl MockCollector {
    pub fn new(name: impl Into<String>, part_kind: PartKind) -> Self {
        Self {
            name: name.into(),
            part_kind,
            contents: RwLock::new(HashMap::new()),
            failures: RwLock::new(HashMap::new()),
            delay: RwLock::new(None),
            from_cache: AtomicBool::new(false),
            collects: RwLock::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            high_water: AtomicUsize::new(0),
        }
    }

    /// Set the content returned for one item.
    pub fn set_content(&self, item_id: &str, content: &str) {
        self.contents
            .write()
            .unwrap()
            .insert(item_id.to_string(), content.to_string());
    }

    /// Make collection fail for one item with the given message.
    pub fn fail_for_item(&self, item_id: &str, error: &str) {
        self.failures
            .write()
            .unwrap()
            .insert(item_id.to_string(), error.to_string());
    }

    /// Simulate collection latency.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.write().unwrap() = Some(delay);
    }

    /// Report all results as cache hits.
    pub fn set_from_cache(&self, from_cache: bool) {
        self.from_cache.store(from_cache, Ordering::SeqCst);
    }

    /// Item ids collected so far, in call order.
    pub fn recorded_collects(&self) -> Vec<String> {
        self.collects.read().unwrap().clone()
    }

    /// Highest number of concurrent collect calls observed.
    pub fn max_concurrent(&self) -> usize {
        self.high_water.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Collector for MockCollector {
    fn name(&self) -> &str {
        &self.name
    }

    fn part_kind(&self) -> PartKind {
        self.part_kind
    }

    async fn collect(&self, item: &Item) -> Result<PartialResult, CollectorError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(current, Ordering::SeqCst);

        let delay = *self.delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.collects.write().unwrap().push(item.id.clone());

        if let Some(error) = self.failures.read().unwrap().get(&item.id) {
            return Err(CollectorError::Network(error.clone()));
        }

        let content = self
            .contents
            .read()
            .unwrap()
            .get(&item.id)
            .cloned()
            .unwrap_or_else(|| format!("{} content for {}", self.name, item.id));

        let part = PartialResult::new(&item.id, self.part_kind, content);
        if self.from_cache.load(Ordering::SeqCst) {
            Ok(part.cached())
        } else {
            Ok(part)
        }
    }
}
