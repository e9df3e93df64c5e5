//! Pipeline context and channels: shared data passed into the dispatch
//! thread and workers, plus the bounded channels between them.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::config::Config;
use crate::filetypes::FileTypeRegistry;
use crate::types::{FileDescriptor, ScanEvent};

use super::worker::FileJob;

/// Capacity of the descriptor and event output streams.
pub const STREAM_CHANNEL_CAP: usize = 100;

/// Worker pool ceiling. Extraction is I/O bound with occasional subprocess
/// fallbacks, so more threads stop paying off quickly.
pub const MAX_WORKERS: usize = 8;

/// Shared read-only context for the dispatch thread and every worker.
pub struct PipelineContext {
    pub config: Arc<Config>,
    pub registry: Arc<FileTypeRegistry>,
    /// Restrict the run to one profile when set.
    pub profile_filter: Option<String>,
}

/// Channels for the pipeline. The dispatch thread gets `job_tx` and
/// `event_tx`; workers get `job_rx` and `descriptor_tx` clones.
pub struct PipelineChannels {
    pub job_tx: Sender<FileJob>,
    pub job_rx: Receiver<FileJob>,
    pub descriptor_tx: Sender<FileDescriptor>,
    pub descriptor_rx: Receiver<FileDescriptor>,
    pub event_tx: Sender<ScanEvent>,
    pub event_rx: Receiver<ScanEvent>,
}

/// Handles returned by [`run_pipeline`](super::run_pipeline) for streaming.
///
/// Receive from **both** `descriptor_rx` and `event_rx` (events on their own
/// thread if descriptors are processed slowly) so neither bounded stream
/// stalls the scan. Both streams close together once every discovered file
/// has produced a descriptor; join `supervisor` after draining.
pub struct PipelineHandles {
    pub descriptor_rx: Receiver<FileDescriptor>,
    pub event_rx: Receiver<ScanEvent>,
    pub supervisor: JoinHandle<()>,
}

/// Worker pool size: available parallelism capped at [`MAX_WORKERS`], at
/// least one.
pub fn worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .clamp(1, MAX_WORKERS)
}

pub fn create_pipeline_channels(workers: usize) -> PipelineChannels {
    let (job_tx, job_rx) = bounded::<FileJob>(workers * 2);
    let (descriptor_tx, descriptor_rx) = bounded::<FileDescriptor>(STREAM_CHANNEL_CAP);
    let (event_tx, event_rx) = bounded::<ScanEvent>(STREAM_CHANNEL_CAP);
    PipelineChannels {
        job_tx,
        job_rx,
        descriptor_tx,
        descriptor_rx,
        event_tx,
        event_rx,
    }
}
