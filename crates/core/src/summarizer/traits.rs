//! Summarizer collaborator interface.

use async_trait::async_trait;

use super::error::SummarizerError;
use crate::item::SummaryResult;
use crate::merger::MergedDocument;

/// The AI summarization collaborator.
///
/// Invoked strictly sequentially by the summarization worker; never called
/// concurrently, so implementations need no internal job coordination.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize a complete merged document.
    async fn summarize(&self, document: &MergedDocument) -> Result<SummaryResult, SummarizerError>;
}
