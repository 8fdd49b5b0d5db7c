//! Collection stage coordination: the bounded worker pool that claims idle
//! items and runs their collectors.

mod config;
mod runner;
mod types;

pub use config::CollectionConfig;
pub use runner::CollectionCoordinator;
pub use types::CoordinatorStatus;
