//! Pipeline lifecycle integration tests.
//!
//! These tests verify the complete item lifecycle through the pipeline:
//! idle -> collecting -> collected -> queued -> summarizing -> completed,
//! plus the failure paths of both stages.

use std::sync::Arc;
use std::time::Duration;

use digester_core::{
    testing::{fixtures, MockCollector, MockSink, MockSummarizer},
    CollectorRegistry, Config, Item, ItemState, PartKind, PipelineCoordinator, PipelineError,
    SourceKind,
};

/// Test helper wiring mock collaborators into a full pipeline.
struct TestHarness {
    pipeline: PipelineCoordinator,
    transcript: Arc<MockCollector>,
    comments: Arc<MockCollector>,
    body: Arc<MockCollector>,
    summarizer: Arc<MockSummarizer>,
    sink: Arc<MockSink>,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_config(Self::fast_config())
    }

    fn fast_config() -> Config {
        let mut config = Config::default();
        config.collection.max_concurrent = 4;
        config.collection.idle_poll_interval_ms = 10;
        config.summarization.base_delay_ms = 1;
        config.summarization.max_delay_ms = 5;
        config.progress.min_publish_interval_ms = 10;
        config
    }

    fn with_config(config: Config) -> Self {
        let transcript = Arc::new(MockCollector::new("transcript", PartKind::Transcript));
        let comments = Arc::new(MockCollector::new("comments", PartKind::Comments));
        let body = Arc::new(MockCollector::new("body", PartKind::Body));
        let summarizer = Arc::new(MockSummarizer::new());
        let sink = Arc::new(MockSink::new());

        let registry = CollectorRegistry::new()
            .with_collector(SourceKind::Video, transcript.clone())
            .with_collector(SourceKind::Video, comments.clone())
            .with_collector(SourceKind::Article, body.clone())
            .with_collector(SourceKind::Post, body.clone());

        let pipeline =
            PipelineCoordinator::new(config, registry, summarizer.clone(), sink.clone());

        Self {
            pipeline,
            transcript,
            comments,
            body,
            summarizer,
            sink,
        }
    }
}

#[tokio::test]
async fn test_mixed_items_complete_end_to_end() {
    let harness = TestHarness::new();
    harness
        .pipeline
        .register_items(vec![
            fixtures::video_item("v1"),
            fixtures::article_item("a1"),
            fixtures::post_item("p1"),
        ])
        .unwrap();

    harness.pipeline.start();
    assert!(
        harness
            .pipeline
            .wait_for_completion(Duration::from_secs(5))
            .await
    );

    let stats = harness.pipeline.statistics();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.collected, 3);
    assert_eq!(stats.summarized, 3);
    assert_eq!(stats.failed, 0);

    for id in ["v1", "a1", "p1"] {
        let record = harness.pipeline.store().get(id).unwrap();
        assert_eq!(record.state, ItemState::Completed);
        assert!(record.summary.unwrap().summary.contains(id));
    }

    // The video document must carry both parts.
    let docs = harness.summarizer.recorded_documents();
    let video_doc = docs.iter().find(|d| d.item_id == "v1").unwrap();
    assert!(video_doc.part(PartKind::Transcript).is_some());
    assert!(video_doc.part(PartKind::Comments).is_some());

    harness.pipeline.shutdown();
}

#[tokio::test]
async fn test_collection_failure_is_isolated() {
    let harness = TestHarness::new();
    harness.comments.fail_for_item("v1", "comments API down");
    harness
        .pipeline
        .register_items(vec![
            fixtures::video_item("v1"),
            fixtures::video_item("v2"),
            fixtures::article_item("a1"),
        ])
        .unwrap();

    harness.pipeline.start();
    assert!(
        harness
            .pipeline
            .wait_for_completion(Duration::from_secs(5))
            .await
    );

    let stats = harness.pipeline.statistics();
    assert_eq!(stats.summarized, 2);
    assert_eq!(stats.failed, 1);

    let failed = harness.pipeline.store().get("v1").unwrap();
    assert_eq!(failed.state, ItemState::Failed);
    assert!(failed.error.unwrap().contains("comments API down"));

    // A half-collected item never reaches the summarizer.
    assert!(harness
        .summarizer
        .recorded_documents()
        .iter()
        .all(|d| d.item_id != "v1"));

    harness.pipeline.shutdown();
}

#[tokio::test]
async fn test_summarizer_retries_transient_failures() {
    let harness = TestHarness::new();
    harness.summarizer.fail_times_for("a1", 2);
    harness
        .pipeline
        .register_items(vec![fixtures::article_item("a1")])
        .unwrap();

    harness.pipeline.start();
    assert!(
        harness
            .pipeline
            .wait_for_completion(Duration::from_secs(5))
            .await
    );

    let record = harness.pipeline.store().get("a1").unwrap();
    assert_eq!(record.state, ItemState::Completed);
    assert_eq!(record.attempts, 3);

    harness.pipeline.shutdown();
}

#[tokio::test]
async fn test_summarizer_exhaustion_fails_item() {
    let harness = TestHarness::new();
    harness.summarizer.fail_times_for("a1", 10);
    harness
        .pipeline
        .register_items(vec![
            fixtures::article_item("a1"),
            fixtures::article_item("a2"),
        ])
        .unwrap();

    harness.pipeline.start();
    assert!(
        harness
            .pipeline
            .wait_for_completion(Duration::from_secs(5))
            .await
    );

    let failed = harness.pipeline.store().get("a1").unwrap();
    assert_eq!(failed.state, ItemState::Failed);
    assert_eq!(failed.attempts, 3);
    assert!(failed.error.is_some());

    let ok = harness.pipeline.store().get("a2").unwrap();
    assert_eq!(ok.state, ItemState::Completed);

    let stats = harness.pipeline.statistics();
    assert_eq!(stats.summarized, 1);
    assert_eq!(stats.failed, 1);

    harness.pipeline.shutdown();
}

#[tokio::test]
async fn test_registration_rejected_after_start() {
    let harness = TestHarness::new();
    harness
        .pipeline
        .register_items(vec![fixtures::post_item("p1")])
        .unwrap();
    harness.pipeline.start();

    let result = harness.pipeline.register_items(vec![fixtures::post_item("p2")]);
    assert!(matches!(result, Err(PipelineError::AlreadyStarted)));
    assert_eq!(harness.pipeline.statistics().total, 1);

    harness.pipeline.shutdown();
}

#[tokio::test]
async fn test_duplicate_registration_is_atomic() {
    let harness = TestHarness::new();
    harness
        .pipeline
        .register_items(vec![fixtures::article_item("a1")])
        .unwrap();

    // One duplicate poisons the whole batch; none of it lands.
    let result = harness.pipeline.register_items(vec![
        fixtures::article_item("a2"),
        fixtures::article_item("a1"),
        fixtures::article_item("a3"),
    ]);
    assert!(result.is_err());
    assert_eq!(harness.pipeline.statistics().total, 1);
    assert!(harness.pipeline.store().get("a2").is_none());
}

#[tokio::test]
async fn test_empty_pipeline_completes_immediately() {
    let harness = TestHarness::new();
    harness.pipeline.start();

    assert!(
        harness
            .pipeline
            .wait_for_completion(Duration::from_millis(200))
            .await
    );
    let snapshot = harness.pipeline.snapshot();
    assert_eq!(snapshot.total, 0);
    assert!(snapshot.fully_done);

    harness.pipeline.shutdown();
}

#[tokio::test]
async fn test_wait_does_not_return_early_with_work_in_flight() {
    let harness = TestHarness::new();
    harness.summarizer.set_delay(Duration::from_millis(200));
    harness
        .pipeline
        .register_items(vec![fixtures::article_item("a1")])
        .unwrap();
    harness.pipeline.start();

    // Summarization takes 200ms; a 100ms wait must time out, not pass.
    assert!(
        !harness
            .pipeline
            .wait_for_completion(Duration::from_millis(100))
            .await
    );
    assert!(
        harness
            .pipeline
            .wait_for_completion(Duration::from_secs(5))
            .await
    );
    assert_eq!(
        harness.pipeline.store().state_of("a1"),
        Some(ItemState::Completed)
    );

    harness.pipeline.shutdown();
}

#[tokio::test]
async fn test_cached_parts_count_as_reused() {
    let harness = TestHarness::new();
    harness.transcript.set_from_cache(true);
    harness.comments.set_from_cache(true);
    harness.body.set_from_cache(true);
    harness
        .pipeline
        .register_items(vec![
            fixtures::video_item("v1"),
            fixtures::article_item("a1"),
        ])
        .unwrap();

    harness.pipeline.start();
    assert!(
        harness
            .pipeline
            .wait_for_completion(Duration::from_secs(5))
            .await
    );

    assert_eq!(harness.pipeline.statistics().reused, 2);
    harness.pipeline.shutdown();
}

#[tokio::test]
async fn test_collection_concurrency_stays_within_bound() {
    let mut config = TestHarness::fast_config();
    config.collection.max_concurrent = 3;
    let harness = TestHarness::with_config(config);
    harness.body.set_delay(Duration::from_millis(20));

    let items: Vec<Item> = (0..20)
        .map(|i| fixtures::article_item(&format!("a{i}")))
        .collect();
    harness.pipeline.register_items(items).unwrap();

    harness.pipeline.start();
    assert!(
        harness
            .pipeline
            .wait_for_completion(Duration::from_secs(10))
            .await
    );

    assert!(harness.body.max_concurrent() <= 3);
    assert_eq!(harness.pipeline.statistics().summarized, 20);
    harness.pipeline.shutdown();
}

#[tokio::test]
async fn test_summarization_is_sequential() {
    let harness = TestHarness::new();
    harness.summarizer.set_delay(Duration::from_millis(10));
    let items: Vec<Item> = (0..6)
        .map(|i| fixtures::post_item(&format!("p{i}")))
        .collect();
    harness.pipeline.register_items(items).unwrap();

    harness.pipeline.start();
    assert!(
        harness
            .pipeline
            .wait_for_completion(Duration::from_secs(5))
            .await
    );

    assert_eq!(harness.summarizer.max_concurrent(), 1);
    harness.pipeline.shutdown();
}

#[tokio::test]
async fn test_published_snapshots_are_monotonic() {
    let harness = TestHarness::new();
    let items: Vec<Item> = (0..8)
        .map(|i| fixtures::article_item(&format!("a{i}")))
        .collect();
    harness.pipeline.register_items(items).unwrap();

    harness.pipeline.start();
    assert!(
        harness
            .pipeline
            .wait_for_completion(Duration::from_secs(5))
            .await
    );
    // Give the publisher a beat to flush the completion snapshot.
    for _ in 0..100 {
        if harness.sink.published().iter().any(|s| s.fully_done) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let published = harness.sink.published();
    assert!(!published.is_empty());
    let terminals: Vec<usize> = published.iter().map(|s| s.counts.terminal()).collect();
    for pair in terminals.windows(2) {
        assert!(pair[0] <= pair[1], "terminal counts regressed: {terminals:?}");
    }
    assert!(published.iter().any(|s| s.fully_done));

    harness.pipeline.shutdown();
}

#[tokio::test]
async fn test_start_and_shutdown_are_idempotent() {
    let harness = TestHarness::new();
    harness
        .pipeline
        .register_items(vec![fixtures::post_item("p1")])
        .unwrap();

    harness.pipeline.start();
    harness.pipeline.start();
    assert!(
        harness
            .pipeline
            .wait_for_completion(Duration::from_secs(5))
            .await
    );

    // Each item collected exactly once despite the double start.
    assert_eq!(harness.body.recorded_collects().len(), 1);

    harness.pipeline.shutdown();
    harness.pipeline.shutdown();
}

#[tokio::test]
async fn test_snapshot_reflects_progress_mid_run() {
    let harness = TestHarness::new();
    harness.summarizer.set_delay(Duration::from_millis(100));
    harness
        .pipeline
        .register_items(vec![fixtures::article_item("a1")])
        .unwrap();

    let before = harness.pipeline.snapshot();
    assert_eq!(before.total, 1);
    assert_eq!(before.counts.idle, 1);
    assert!(!before.fully_done);

    harness.pipeline.start();
    assert!(
        harness
            .pipeline
            .wait_for_completion(Duration::from_secs(5))
            .await
    );

    let after = harness.pipeline.snapshot();
    assert_eq!(after.counts.completed, 1);
    assert_eq!(after.completion_rate, 1.0);
    assert!(after.fully_done);

    harness.pipeline.shutdown();
}
