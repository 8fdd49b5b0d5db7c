//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Registration and collection (claims, collector outcomes)
//! - Merging and summarization (merges, attempts, retries)
//! - Progress publication

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Registration & Collection
// =============================================================================

/// Items registered total.
pub static ITEMS_REGISTERED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("digester_items_registered_total", "Total items registered").unwrap()
});

/// Collections total by result.
pub static COLLECTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("digester_collections_total", "Total item collections"),
        &["result"], // "success", "failure"
    )
    .unwrap()
});

/// Collection duration in seconds (successful collections only).
pub static COLLECTION_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "digester_collection_duration_seconds",
            "Duration of item collection",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
    )
    .unwrap()
});

// =============================================================================
// Merging & Summarization
// =============================================================================

/// Merged documents produced total.
pub static MERGES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("digester_merges_total", "Total merged documents produced").unwrap()
});

/// Summarization attempts total by result.
pub static SUMMARIZATION_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "digester_summarization_attempts_total",
            "Total summarization attempts",
        ),
        &["result"], // "success", "failure"
    )
    .unwrap()
});

/// Summarization duration in seconds, job pickup to success, retries included.
pub static SUMMARIZATION_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "digester_summarization_duration_seconds",
            "Duration of item summarization including retries",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
    )
    .unwrap()
});

/// Items completed (reached Completed state).
pub static ITEMS_COMPLETED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "digester_items_completed_total",
        "Total items summarized successfully",
    )
    .unwrap()
});

// =============================================================================
// Progress
// =============================================================================

/// Progress snapshots published total.
pub static SNAPSHOTS_PUBLISHED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "digester_snapshots_published_total",
        "Total progress snapshots published",
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Registration & collection
        Box::new(ITEMS_REGISTERED.clone()),
        Box::new(COLLECTIONS_TOTAL.clone()),
        Box::new(COLLECTION_DURATION.clone()),
        // Merging & summarization
        Box::new(MERGES_TOTAL.clone()),
        Box::new(SUMMARIZATION_ATTEMPTS.clone()),
        Box::new(SUMMARIZATION_DURATION.clone()),
        Box::new(ITEMS_COMPLETED.clone()),
        // Progress
        Box::new(SNAPSHOTS_PUBLISHED.clone()),
    ]
}
