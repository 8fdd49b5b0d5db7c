//! Item model and the authoritative lifecycle state store.

mod store;
mod types;

pub use store::{ItemStateStore, StoreError, StoreTotals};
pub use types::{Item, ItemRecord, ItemState, PartKind, SourceKind, StateCounts, SummaryResult};
