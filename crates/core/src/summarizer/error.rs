//! Summarizer error types.

/// Error type for summarization calls.
///
/// All variants are treated as retryable by the worker until its attempt
/// budget is exhausted.
#[derive(Debug, thiserror::Error)]
pub enum SummarizerError {
    /// The model API rejected or failed the call.
    #[error("Summarization API error: {0}")]
    Api(String),

    /// The model API rate-limited the call.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// The model responded with something unusable.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
