//! Merge stage data types and readiness policies.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::{PartKind, SourceKind};

/// The union of all required partial results for one item.
///
/// Built exactly once per item; handed by value to the summarization queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergedDocument {
    pub item_id: String,
    pub source_kind: SourceKind,
    pub url: String,
    /// Part contents keyed by kind, in stable order.
    pub parts: BTreeMap<PartKind, String>,
    /// True when every part was served from a collector cache.
    pub from_cache: bool,
    pub merged_at: DateTime<Utc>,
}

impl MergedDocument {
    /// Content of a single part, if present.
    pub fn part(&self, kind: PartKind) -> Option<&str> {
        self.parts.get(&kind).map(String::as_str)
    }

    /// All parts concatenated in kind order, separated by blank lines.
    /// Convenience for summarizers that take one flat text.
    pub fn combined_text(&self) -> String {
        self.parts
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// When an item's accumulated parts are ready to merge.
///
/// The policy is explicit per source kind: a single shared rule silently
/// merges two-part sources with half their content missing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Ready only when every expected part is present (two-part sources).
    AllParts,
    /// Ready as soon as any expected part is present (one-part sources).
    AnyPart,
}

impl MergePolicy {
    /// Evaluate readiness given the expected parts and those present so far.
    pub fn is_satisfied(&self, expected: &[PartKind], present: &[PartKind]) -> bool {
        match self {
            MergePolicy::AllParts => expected.iter().all(|p| present.contains(p)),
            MergePolicy::AnyPart => expected.iter().any(|p| present.contains(p)),
        }
    }
}

/// Per-source-kind merge policy table, with sensible defaults and
/// per-kind overrides.
#[derive(Debug, Clone, Default)]
pub struct MergePolicyTable {
    overrides: HashMap<SourceKind, MergePolicy>,
}

impl MergePolicyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the policy for one source kind.
    pub fn with_policy(mut self, kind: SourceKind, policy: MergePolicy) -> Self {
        self.overrides.insert(kind, policy);
        self
    }

    /// Effective policy for a kind: the override if set, otherwise the
    /// kind's natural default (all parts for multi-part kinds).
    pub fn policy_for(&self, kind: SourceKind) -> MergePolicy {
        if let Some(policy) = self.overrides.get(&kind) {
            return *policy;
        }
        if kind.expected_parts().len() > 1 {
            MergePolicy::AllParts
        } else {
            MergePolicy::AnyPart
        }
    }
}
