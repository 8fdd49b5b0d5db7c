//! Core item data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of source an item points at.
///
/// The source kind decides which collectors run for the item and which
/// merge policy applies to the collected parts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A video with separate transcript and comment streams (two-part).
    Video,
    /// A long-form article (one-part).
    Article,
    /// A short text post (one-part).
    Post,
}

impl SourceKind {
    /// Parts a complete document for this kind may contain.
    pub fn expected_parts(&self) -> &'static [PartKind] {
        match self {
            SourceKind::Video => &[PartKind::Transcript, PartKind::Comments],
            SourceKind::Article => &[PartKind::Body],
            SourceKind::Post => &[PartKind::Body],
        }
    }

    /// Returns the kind as a string (for logging and filtering).
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Video => "video",
            SourceKind::Article => "article",
            SourceKind::Post => "post",
        }
    }
}

/// A named fragment of an item's content, produced by one collector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    Transcript,
    Comments,
    Body,
}

impl PartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartKind::Transcript => "transcript",
            PartKind::Comments => "comments",
            PartKind::Body => "body",
        }
    }
}

/// Lifecycle state of an item.
///
/// State machine flow:
/// ```text
/// Idle -> Collecting -> Collected -> Queued -> Summarizing -> Completed
///                  \-> Failed                           \-> Failed
/// ```
///
/// `Completed` and `Failed` are terminal; once reached, no further
/// transition is permitted. Exactly one state per item at any time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    /// Registered, waiting to be claimed by a collection worker.
    Idle,
    /// A collection worker owns the item and its collectors are running.
    Collecting,
    /// All parts collected; waiting for the merge stage to fire.
    Collected,
    /// Merged document enqueued for summarization.
    Queued,
    /// The summarization worker is processing the item.
    Summarizing,
    /// Summary recorded (terminal).
    Completed,
    /// Collection or summarization failed (terminal).
    Failed,
}

impl ItemState {
    /// All states, in pipeline order. Useful for iteration in counts.
    pub const ALL: [ItemState; 7] = [
        ItemState::Idle,
        ItemState::Collecting,
        ItemState::Collected,
        ItemState::Queued,
        ItemState::Summarizing,
        ItemState::Completed,
        ItemState::Failed,
    ];

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemState::Completed | ItemState::Failed)
    }

    /// Returns true if `to` is a valid direct successor of this state.
    ///
    /// The edges here are the only ones the store will ever take; callers
    /// additionally narrow them with a `from_allowed` precondition.
    pub fn can_transition_to(&self, to: ItemState) -> bool {
        matches!(
            (self, to),
            (ItemState::Idle, ItemState::Collecting)
                | (ItemState::Collecting, ItemState::Collected)
                | (ItemState::Collecting, ItemState::Failed)
                | (ItemState::Collected, ItemState::Queued)
                | (ItemState::Queued, ItemState::Summarizing)
                | (ItemState::Queued, ItemState::Failed)
                | (ItemState::Summarizing, ItemState::Completed)
                | (ItemState::Summarizing, ItemState::Failed)
        )
    }

    /// Returns the state as a string (for logging and filtering).
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::Idle => "idle",
            ItemState::Collecting => "collecting",
            ItemState::Collected => "collected",
            ItemState::Queued => "queued",
            ItemState::Summarizing => "summarizing",
            ItemState::Completed => "completed",
            ItemState::Failed => "failed",
        }
    }
}

/// One content reference to ingest.
///
/// Identity is immutable after registration; only the lifecycle state
/// tracked by the store changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Unique, stable identifier.
    pub id: String,
    /// Which collectors and merge policy apply.
    pub source_kind: SourceKind,
    /// Where the content lives.
    pub url: String,
}

impl Item {
    /// Create a new item.
    pub fn new(id: impl Into<String>, source_kind: SourceKind, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_kind,
            url: url.into(),
        }
    }
}

/// Per-state item counts, as captured in a snapshot.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateCounts {
    pub idle: usize,
    pub collecting: usize,
    pub collected: usize,
    pub queued: usize,
    pub summarizing: usize,
    pub completed: usize,
    pub failed: usize,
}

impl StateCounts {
    /// Total items across all states.
    pub fn total(&self) -> usize {
        self.idle
            + self.collecting
            + self.collected
            + self.queued
            + self.summarizing
            + self.completed
            + self.failed
    }

    /// Items in a terminal state.
    pub fn terminal(&self) -> usize {
        self.completed + self.failed
    }

    /// Bump the count for `state` by one.
    pub(crate) fn bump(&mut self, state: ItemState) {
        match state {
            ItemState::Idle => self.idle += 1,
            ItemState::Collecting => self.collecting += 1,
            ItemState::Collected => self.collected += 1,
            ItemState::Queued => self.queued += 1,
            ItemState::Summarizing => self.summarizing += 1,
            ItemState::Completed => self.completed += 1,
            ItemState::Failed => self.failed += 1,
        }
    }
}

/// Result of a summarization call, as produced by the collaborator.
///
/// The worker fills in attempt bookkeeping on the item record; the
/// collaborator only supplies the content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryResult {
    /// The generated summary text.
    pub summary: String,
    /// Model identifier, if the collaborator reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Full per-item record held by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemRecord {
    pub item: Item,
    pub state: ItemState,
    /// Summarization attempts made (0 until the item reaches the worker).
    pub attempts: u32,
    /// Final summary, once completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryResult>,
    /// Error message, once failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// True when every merged part was served from a collector cache.
    pub reused: bool,
    pub updated_at: DateTime<Utc>,
}

impl ItemRecord {
    pub(crate) fn new(item: Item) -> Self {
        Self {
            item,
            state: ItemState::Idle,
            attempts: 0,
            summary: None,
            error: None,
            reused: false,
            updated_at: Utc::now(),
        }
    }
}
