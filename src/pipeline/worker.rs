//! File workers: turn a discovered path into a [`FileDescriptor`].

use crossbeam_channel::{Receiver, Sender};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::SourceSpec;
use crate::error::FerryError;
use crate::meta;
use crate::target::resolve_target_path;
use crate::types::{FileDescriptor, FileMetadata};

use super::context::PipelineContext;

/// One unit of work: a discovered file plus the source and profile it came
/// from.
pub struct FileJob {
    pub path: PathBuf,
    pub source: SourceSpec,
    pub profile: String,
}

fn worker_loop(
    job_rx: Receiver<FileJob>,
    descriptor_tx: Sender<FileDescriptor>,
    ctx: Arc<PipelineContext>,
) {
    while let Ok(job) = job_rx.recv() {
        let descriptor = process_file(&job, &ctx);
        if descriptor_tx.send(descriptor).is_err() {
            break;
        }
    }
    drop(descriptor_tx);
}

/// Spawn the worker pool. Each worker reads jobs until the job channel
/// closes; the caller must drop its descriptor sender after the workers are
/// joined so the stream closes.
pub fn spawn_workers(
    job_rx: Receiver<FileJob>,
    descriptor_tx: &Sender<FileDescriptor>,
    ctx: &Arc<PipelineContext>,
    count: usize,
) -> Vec<JoinHandle<()>> {
    (0..count)
        .map(|_| {
            let job_rx = job_rx.clone();
            let descriptor_tx = descriptor_tx.clone();
            let ctx = Arc::clone(ctx);
            thread::spawn(move || worker_loop(job_rx, descriptor_tx, ctx))
        })
        .collect()
}

/// Process one file: filename patterns (source first, then profile), the
/// extractor for its category, field-by-field merge, target resolution.
pub fn process_file(job: &FileJob, ctx: &PipelineContext) -> FileDescriptor {
    let filename = job
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut metadata: Option<FileMetadata> = None;
    for pat in &job.source.filenames {
        metadata = meta::parse_filename_pattern(&filename, pat);
        if metadata.is_some() {
            break;
        }
    }
    let profile = ctx.config.profiles.get(&job.profile);
    if metadata.is_none() {
        if let Some(prof) = profile {
            for pat in &prof.patterns {
                metadata = meta::parse_filename_pattern(&filename, pat);
                if metadata.is_some() {
                    break;
                }
            }
        }
    }

    // Raw images go through the image extractor as well; it degrades to
    // extension-only metadata when the container has no readable EXIF.
    let extracted = if ctx.registry.is_category(&job.path, "image")
        || ctx.registry.is_category(&job.path, "image.raw")
    {
        Some(meta::image::extract(&job.path))
    } else if ctx.registry.is_category(&job.path, "video") {
        Some(meta::video::extract(&job.path))
    } else {
        None
    };

    if let Some(extracted) = extracted {
        match metadata.as_mut() {
            Some(m) => m.merge_extracted(&extracted),
            None => metadata = Some(extracted),
        }
    }

    let target_template = profile.map(|p| p.target.path.as_str()).unwrap_or("");
    if target_template.is_empty() {
        return FileDescriptor::failed(
            job.path.clone(),
            metadata,
            FerryError::NoTargetTemplate(job.path.display().to_string()),
        );
    }

    let new_path = match resolve_target_path(target_template, metadata.as_ref()) {
        Ok(p) => p,
        Err(err) => return FileDescriptor::failed(job.path.clone(), metadata, err),
    };

    // Absolute-path comparison; resolution errors degrade to the raw string
    // comparison outcome.
    let abs_old = std::path::absolute(&job.path).unwrap_or_default();
    let abs_new = std::path::absolute(&new_path).unwrap_or_default();
    let operate = abs_old != abs_new;

    FileDescriptor {
        old_path: job.path.clone(),
        new_path,
        operate,
        metadata,
        error: None,
    }
}
