//! Summarization stage: the collaborator trait, job types and the single
//! sequential worker that drains the queue.

mod config;
mod error;
mod traits;
mod types;
mod worker;

pub use config::SummarizationConfig;
pub use error::SummarizerError;
pub use traits::Summarizer;
pub use types::SummarizationJob;
pub use worker::SummarizationWorker;
