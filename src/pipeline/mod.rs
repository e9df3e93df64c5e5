//! Scan/worker pipeline: context, per-source walk, file workers, assembly.

pub mod context;
pub mod orchestrator;
pub mod walk;
pub mod worker;

pub use context::{
    MAX_WORKERS, PipelineChannels, PipelineContext, PipelineHandles, STREAM_CHANNEL_CAP,
    create_pipeline_channels, worker_count,
};
pub use orchestrator::run_pipeline;
pub use walk::scan_source;
pub use worker::{FileJob, process_file};
