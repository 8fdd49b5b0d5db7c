//! Collector collaborator interface.

use async_trait::async_trait;

use super::error::CollectorError;
use super::types::PartialResult;
use crate::item::{Item, PartKind};

/// A pluggable content collector.
///
/// Each collector produces exactly one named part for the items it serves.
/// A two-part source kind registers two collectors; the coordinator runs
/// them concurrently for a claimed item. Implementations must be safe to
/// invoke concurrently across different items.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Human-readable collector name (for logging).
    fn name(&self) -> &str;

    /// The part this collector produces.
    fn part_kind(&self) -> PartKind;

    /// Fetch this collector's part of the item's content.
    async fn collect(&self, item: &Item) -> Result<PartialResult, CollectorError>;
}
