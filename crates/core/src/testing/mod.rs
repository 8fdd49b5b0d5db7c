//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of all collaborator traits,
//! allowing comprehensive pipeline testing without real collectors or a
//! real model API.
//!
//! # Example
//!
//! ```rust,ignore
//! use digester_core::testing::{fixtures, MockCollector, MockSummarizer};
//! use digester_core::item::PartKind;
//!
//! let collector = MockCollector::new("body", PartKind::Body);
//! let summarizer = MockSummarizer::new();
//!
//! // Configure mock behavior
//! collector.set_content("a1", "article body");
//! summarizer.fail_times_for("a1", 2);
//!
//! // Use in a PipelineCoordinator...
//! ```

mod mock_collector;
mod mock_sink;
mod mock_summarizer;

pub use mock_collector::MockCollector;
pub use mock_sink::MockSink;
pub use mock_summarizer::MockSummarizer;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::item::{Item, SourceKind};

    /// A two-part video item.
    pub fn video_item(id: &str) -> Item {
        Item::new(id, SourceKind::Video, format!("https://videos.example/{id}"))
    }

    /// A one-part article item.
    pub fn article_item(id: &str) -> Item {
        Item::new(
            id,
            SourceKind::Article,
            format!("https://articles.example/{id}"),
        )
    }

    /// A one-part post item.
    pub fn post_item(id: &str) -> Item {
        Item::new(id, SourceKind::Post, format!("https://posts.example/{id}"))
    }
}
