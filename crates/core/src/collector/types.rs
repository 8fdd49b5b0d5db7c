//! Collector data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::PartKind;

/// A fragment of an item's content produced by a single collector.
///
/// Owned exclusively by the merge stage from hand-off until the item's
/// document is built, then discarded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartialResult {
    /// The item this part belongs to.
    pub item_id: String,
    /// Which named part this is.
    pub part_kind: PartKind,
    /// Raw collected content.
    pub content: String,
    /// True when the collector served this part from its own cache rather
    /// than fetching it. Feeds the `reused` statistic.
    #[serde(default)]
    pub from_cache: bool,
    pub collected_at: DateTime<Utc>,
}

impl PartialResult {
    /// Create a freshly fetched part.
    pub fn new(item_id: impl Into<String>, part_kind: PartKind, content: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            part_kind,
            content: content.into(),
            from_cache: false,
            collected_at: Utc::now(),
        }
    }

    /// Mark the part as served from cache.
    pub fn cached(mut self) -> Self {
        self.from_cache = true;
        self
    }
}
