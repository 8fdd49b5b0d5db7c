//! Collector error types.

/// Error type for collector operations.
///
/// A collector failure is terminal for the item's collection attempt; the
/// coordinator records it and moves the item to `Failed` without retrying.
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    /// Network-level failure reaching the source.
    #[error("Network error: {0}")]
    Network(String),

    /// The source responded but its content could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The source is unavailable (removed, private, rate-limited).
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}
