//! Pipeline assembly: dispatch thread, worker pool, supervisor.

use crossbeam_channel::Sender;
use log::{debug, warn};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::Config;
use crate::filetypes::FileTypeRegistry;
use crate::types::{FileDescriptor, ScanEvent, ScanEventKind};

use super::context::{
    PipelineChannels, PipelineContext, PipelineHandles, create_pipeline_channels, worker_count,
};
use super::walk::scan_source;
use super::worker::{FileJob, spawn_workers};

/// Start the scan/worker pipeline. Returns receivers for the descriptor and
/// event streams plus a supervisor handle; the caller drains both streams
/// and joins the supervisor when they close.
///
/// The supervisor holds the last sender of each stream and drops them only
/// after the dispatch thread and every worker have exited, so both streams
/// close together exactly once, after all dispatched work is done.
pub fn run_pipeline(
    config: Arc<Config>,
    registry: FileTypeRegistry,
    profile_filter: Option<String>,
) -> PipelineHandles {
    let workers = worker_count();
    debug!("pipeline: {} workers", workers);

    let PipelineChannels {
        job_tx,
        job_rx,
        descriptor_tx,
        descriptor_rx,
        event_tx,
        event_rx,
    } = create_pipeline_channels(workers);

    let ctx = Arc::new(PipelineContext {
        config,
        registry: Arc::new(registry),
        profile_filter,
    });

    let worker_handles = spawn_workers(job_rx, &descriptor_tx, &ctx, workers);
    let dispatch_handle =
        spawn_dispatch_thread(job_tx, event_tx.clone(), descriptor_tx.clone(), ctx);

    let supervisor = thread::spawn(move || {
        let _ = dispatch_handle.join();
        for handle in worker_handles {
            let _ = handle.join();
        }
        drop(descriptor_tx);
        drop(event_tx);
    });

    PipelineHandles {
        descriptor_rx,
        event_rx,
        supervisor,
    }
}

/// Walk every source of every (selected) profile, emitting events and
/// enqueueing jobs. A failed scan aborts only its own source: it emits a
/// `Failed` event plus one error descriptor carrying the source path, and
/// the dispatch moves on.
fn spawn_dispatch_thread(
    job_tx: Sender<FileJob>,
    event_tx: Sender<ScanEvent>,
    descriptor_tx: Sender<FileDescriptor>,
    ctx: Arc<PipelineContext>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        for (name, profile) in ctx.config.profiles.iter() {
            if let Some(filter) = &ctx.profile_filter {
                if filter != name {
                    continue;
                }
            }
            for src in &profile.sources {
                let event = |kind: ScanEventKind| ScanEvent {
                    profile: name.clone(),
                    source: src.path.clone(),
                    recurse: src.recurse,
                    types: src.types.clone(),
                    kind,
                };
                if event_tx.send(event(ScanEventKind::Started)).is_err() {
                    return;
                }
                debug!(
                    "scanning profile={} {} (recurse={}, types={:?})",
                    name,
                    src.path.display(),
                    src.recurse,
                    src.types
                );

                match scan_source(src, &ctx.registry) {
                    Ok(files) => {
                        let _ = event_tx.send(event(ScanEventKind::Found(files.len())));
                        for path in files {
                            let job = FileJob {
                                path,
                                source: src.clone(),
                                profile: name.clone(),
                            };
                            if job_tx.send(job).is_err() {
                                return;
                            }
                        }
                    }
                    Err(err) => {
                        warn!("error scanning {}: {}", src.path.display(), err);
                        let _ = event_tx.send(event(ScanEventKind::Failed(err.to_string())));
                        let _ =
                            descriptor_tx.send(FileDescriptor::failed(src.path.clone(), None, err));
                    }
                }
            }
        }
    })
}
