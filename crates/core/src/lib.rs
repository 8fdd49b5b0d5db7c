pub mod collector;
pub mod config;
pub mod coordinator;
pub mod item;
pub mod merger;
pub mod metrics;
pub mod pipeline;
pub mod progress;
pub mod summarizer;
pub mod testing;

pub use collector::{Collector, CollectorError, CollectorRegistry, PartialResult};
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use coordinator::{CollectionConfig, CollectionCoordinator, CoordinatorStatus};
pub use item::{
    Item, ItemRecord, ItemState, ItemStateStore, PartKind, SourceKind, StateCounts, StoreError,
    SummaryResult,
};
pub use merger::{DataMerger, MergePolicy, MergePolicyTable, MergedDocument};
pub use pipeline::{PipelineCoordinator, PipelineError, PipelineStatistics};
pub use progress::{
    ActivityTracker, FileSnapshotSink, ProgressAggregator, ProgressConfig, ProgressSnapshot,
    SinkError, SnapshotSink, TracingSink,
};
pub use summarizer::{
    SummarizationConfig, SummarizationJob, SummarizationWorker, Summarizer, SummarizerError,
};
