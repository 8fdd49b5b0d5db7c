//! Summarization job types.

use crate::merger::MergedDocument;

/// One unit of summarization work.
///
/// Owned by the worker from enqueue to terminal outcome; there is exactly
/// one worker, so jobs are never shared.
#[derive(Debug, Clone)]
pub struct SummarizationJob {
    pub item_id: String,
    pub document: MergedDocument,
    /// Attempts made so far (0 at enqueue time).
    pub attempt: u32,
}

impl SummarizationJob {
    /// Create a fresh job for a merged document.
    pub fn new(document: MergedDocument) -> Self {
        Self {
            item_id: document.item_id.clone(),
            document,
            attempt: 0,
        }
    }
}
