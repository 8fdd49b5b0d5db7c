//! The single sequential summarization worker.
//!
//! Drains the merge queue one job at a time: the summarizer collaborator is
//! never invoked concurrently. Each job gets up to `max_attempts` calls with
//! exponential backoff between attempts, then a terminal outcome is recorded
//! either way.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::item::{ItemState, ItemStateStore};
use crate::metrics;
use crate::progress::ActivityTracker;

use super::config::SummarizationConfig;
use super::traits::Summarizer;
use super::types::SummarizationJob;

/// Drives merged documents through the summarizer, one at a time.
pub struct SummarizationWorker {
    config: SummarizationConfig,
    store: Arc<ItemStateStore>,
    summarizer: Arc<dyn Summarizer>,
    activity: Arc<ActivityTracker>,
    // Taken exactly once, by the loop task at startup.
    queue_rx: Mutex<Option<mpsc::UnboundedReceiver<SummarizationJob>>>,
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
}

impl SummarizationWorker {
    pub fn new(
        config: SummarizationConfig,
        store: Arc<ItemStateStore>,
        summarizer: Arc<dyn Summarizer>,
        activity: Arc<ActivityTracker>,
        queue_rx: mpsc::UnboundedReceiver<SummarizationJob>,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            config,
            store,
            summarizer,
            activity,
            queue_rx: Mutex::new(Some(queue_rx)),
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        }
    }

    /// Start the worker loop (spawns one background task).
    pub fn start(self: &Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Summarization worker already running");
            return;
        }

        let queue_rx = self
            .queue_rx
            .lock()
            .expect("worker lock poisoned")
            .take();
        let Some(mut queue_rx) = queue_rx else {
            warn!("Summarization worker queue already consumed, not starting");
            self.running.store(false, Ordering::SeqCst);
            return;
        };

        let worker = Arc::clone(self);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            info!("Summarization worker started");
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Summarization worker received shutdown signal");
                        break;
                    }
                    job = queue_rx.recv() => {
                        match job {
                            Some(job) => worker.process_job(job, &mut shutdown_rx).await,
                            None => {
                                debug!("Summarization queue closed, worker exiting");
                                break;
                            }
                        }
                        // The backoff wait may have consumed the shutdown
                        // signal; the flag is the backstop.
                        if !worker.running.load(Ordering::SeqCst) {
                            break;
                        }
                    }
                }
            }
            worker.running.store(false, Ordering::SeqCst);
            info!("Summarization worker stopped");
        });
    }

    /// Stop the worker. The current attempt is allowed to finish; backoff
    /// waits are interrupted.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        info!("Stopping summarization worker");
        let _ = self.shutdown_tx.send(());
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run one job to a terminal outcome.
    async fn process_job(&self, job: SummarizationJob, shutdown_rx: &mut broadcast::Receiver<()>) {
        self.activity.job_started();

        if !self
            .store
            .transition(&job.item_id, &[ItemState::Queued], ItemState::Summarizing)
        {
            warn!(
                item_id = %job.item_id,
                "Dropping job, item no longer queued"
            );
            self.activity.job_finished();
            return;
        }

        let started = std::time::Instant::now();
        let mut last_error = String::new();

        for attempt in 1..=self.config.max_attempts {
            debug!(
                item_id = %job.item_id,
                attempt,
                max_attempts = self.config.max_attempts,
                "Summarizing item"
            );

            match self.summarizer.summarize(&job.document).await {
                Ok(summary) => {
                    metrics::SUMMARIZATION_ATTEMPTS
                        .with_label_values(&["success"])
                        .inc();
                    metrics::SUMMARIZATION_DURATION.observe(started.elapsed().as_secs_f64());
                    self.store.record_summary(&job.item_id, summary, attempt);
                    if self
                        .store
                        .transition(&job.item_id, &[ItemState::Summarizing], ItemState::Completed)
                    {
                        metrics::ITEMS_COMPLETED.inc();
                        info!(item_id = %job.item_id, attempt, "Item summarized");
                    }
                    self.activity.job_finished();
                    return;
                }
                Err(e) => {
                    metrics::SUMMARIZATION_ATTEMPTS
                        .with_label_values(&["failure"])
                        .inc();
                    last_error = e.to_string();
                    warn!(
                        item_id = %job.item_id,
                        attempt,
                        error = %last_error,
                        "Summarization attempt failed"
                    );

                    if attempt < self.config.max_attempts {
                        let delay = self.config.backoff_delay_ms(attempt);
                        tokio::select! {
                            _ = shutdown_rx.recv() => {
                                last_error =
                                    format!("worker shut down during retry backoff: {last_error}");
                                break;
                            }
                            _ = tokio::time::sleep(Duration::from_millis(delay)) => {}
                        }
                    }
                }
            }
        }

        self.store
            .record_failure(&job.item_id, last_error, self.config.max_attempts);
        self.store
            .transition(&job.item_id, &[ItemState::Summarizing], ItemState::Failed);
        self.activity.job_finished();
    }
}
