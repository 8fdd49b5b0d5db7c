//! End-to-end pipeline assembly and lifecycle.

mod coordinator;
mod types;

pub use coordinator::PipelineCoordinator;
pub use types::{PipelineError, PipelineStatistics};
