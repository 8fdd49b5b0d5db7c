//! Mock summarizer for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use crate::item::SummaryResult;
use crate::merger::MergedDocument;
use crate::summarizer::{Summarizer, SummarizerError};

/// Mock implementation of the Summarizer trait.
///
/// Provides controllable behavior for testing:
/// - Per-item transient failure budgets (fail N times, then succeed)
/// - Simulated latency
/// - Records every summarized document, plus a concurrency high-water mark
///   (must stay at 1: the worker is sequential)
pub struct MockSummarizer {
    /// Remaining injected failures per item id.
    fail_budget: RwLock<HashMap<String, u32>>,
    /// Simulated summarization latency.
    delay: RwLock<Option<Duration>>,
    /// Every document passed to summarize, in call order.
    documents: RwLock<Vec<MergedDocument>>,
    in_flight: AtomicUsize,
    high_water: AtomicUsize,
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self {
            fail_budget: RwLock::new(HashMap::new()),
            delay: RwLock::new(None),
            documents: RwLock::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            high_water: AtomicUsize::new(0),
        }
    }

    /// Fail the next `times` calls for one item, then succeed.
    pub fn fail_times_for(&self, item_id: &str, times: u32) {
        self.fail_budget
            .write()
            .unwrap()
            .insert(item_id.to_string(), times);
    }

    /// Simulate summarization latency.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.write().unwrap() = Some(delay);
    }

    /// Documents passed to summarize so far (failed attempts included).
    pub fn recorded_documents(&self) -> Vec<MergedDocument> {
        self.documents.read().unwrap().clone()
    }

    /// Highest number of concurrent summarize calls observed.
    pub fn max_concurrent(&self) -> usize {
        self.high_water.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, document: &MergedDocument) -> Result<SummaryResult, SummarizerError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(current, Ordering::SeqCst);

        let delay = *self.delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.documents.write().unwrap().push(document.clone());

        {
            let mut budget = self.fail_budget.write().unwrap();
            if let Some(remaining) = budget.get_mut(&document.item_id) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(SummarizerError::Api("injected failure".to_string()));
                }
            }
        }

        Ok(SummaryResult {
            summary: format!("summary of {}", document.item_id),
            model: Some("mock-model".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{PartKind, SourceKind};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn doc(id: &str) -> MergedDocument {
        let mut parts = BTreeMap::new();
        parts.insert(PartKind::Body, "body".to_string());
        MergedDocument {
            item_id: id.to_string(),
            source_kind: SourceKind::Article,
            url: format!("https://e.com/{id}"),
            parts,
            from_cache: false,
            merged_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_succeeds_by_default() {
        let summarizer = MockSummarizer::new();
        let result = summarizer.summarize(&doc("a1")).await.unwrap();
        assert!(result.summary.contains("a1"));
    }

    #[tokio::test]
    async fn test_failure_budget_is_consumed() {
        let summarizer = MockSummarizer::new();
        summarizer.fail_times_for("a1", 2);

        assert!(summarizer.summarize(&doc("a1")).await.is_err());
        assert!(summarizer.summarize(&doc("a1")).await.is_err());
        assert!(summarizer.summarize(&doc("a1")).await.is_ok());
        assert_eq!(summarizer.recorded_documents().len(), 3);
    }
}
