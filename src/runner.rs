//! Run command: consume the pipeline and report or execute moves.

use anyhow::Result;
use log::{info, warn};
use std::thread;

use crate::config::Config;
use crate::ferry;
use crate::pipeline::PipelineHandles;
use crate::target::has_unresolved_tokens;
use crate::types::ScanEventKind;

/// Counts reported at the end of a run. A dry run counts would-be moves as
/// moved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub moved: usize,
    pub skipped: usize,
}

/// Drain the pipeline and act on each descriptor. Without `ack` this is a
/// dry run that only prints what would happen; with `ack` it creates target
/// directories and renames files. Per-file failures are reported and
/// counted as skipped; the run continues.
pub fn perform_run(config: Config, profile: Option<String>, ack: bool) -> Result<RunSummary> {
    let PipelineHandles {
        descriptor_rx,
        event_rx,
        supervisor,
    } = ferry(config, profile);

    // Events drain on their own thread so a full event queue never stalls
    // the scan while descriptors are being acted on.
    let event_thread = thread::spawn(move || {
        while let Ok(ev) = event_rx.recv() {
            match &ev.kind {
                ScanEventKind::Started => info!(
                    "scanning profile={} {} (recurse={}, types={:?})",
                    ev.profile,
                    ev.source.display(),
                    ev.recurse,
                    ev.types
                ),
                ScanEventKind::Found(n) => info!("found {} files in {}", n, ev.source.display()),
                ScanEventKind::Failed(msg) => {
                    warn!("scan failed for {}: {}", ev.source.display(), msg)
                }
            }
        }
    });

    let mut summary = RunSummary::default();
    while let Ok(descriptor) = descriptor_rx.recv() {
        if let Some(err) = &descriptor.error {
            warn!("{}: {}", descriptor.old_path.display(), err);
            summary.skipped += 1;
            continue;
        }
        if !descriptor.operate {
            summary.skipped += 1;
            continue;
        }
        if has_unresolved_tokens(&descriptor.new_path.to_string_lossy()) {
            warn!(
                "{}: target {} still contains template tokens, skipping",
                descriptor.old_path.display(),
                descriptor.new_path.display()
            );
            summary.skipped += 1;
            continue;
        }

        if ack {
            if let Some(dir) = descriptor.new_path.parent() {
                if let Err(err) = std::fs::create_dir_all(dir) {
                    warn!(
                        "{}: failed to create dir {}: {}",
                        descriptor.old_path.display(),
                        dir.display(),
                        err
                    );
                    summary.skipped += 1;
                    continue;
                }
            }
            info!(
                "moving {} -> {}",
                descriptor.old_path.display(),
                descriptor.new_path.display()
            );
            if let Err(err) = std::fs::rename(&descriptor.old_path, &descriptor.new_path) {
                warn!("{}: failed to move: {}", descriptor.old_path.display(), err);
                summary.skipped += 1;
                continue;
            }
            summary.moved += 1;
        } else {
            info!(
                "would move {} -> {} (use --ack to actually move)",
                descriptor.old_path.display(),
                descriptor.new_path.display()
            );
            summary.moved += 1;
        }
    }

    supervisor
        .join()
        .map_err(|_| anyhow::anyhow!("pipeline supervisor panicked"))?;
    let _ = event_thread.join();

    info!(
        "summary: {} moved, {} skipped",
        summary.moved, summary.skipped
    );
    Ok(summary)
}
