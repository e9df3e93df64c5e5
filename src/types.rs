//! Public types for the mediaferry API and pipeline.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::error::FerryError;

/// Capture metadata for a single media file.
///
/// `taken_time` is the local wall-clock capture time. String fields use the
/// empty string for "absent" so a merge can fill them field by field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileMetadata {
    pub taken_time: Option<DateTime<Local>>,
    /// Lowercase extension without the leading dot.
    pub extension: String,
    pub camera_maker: String,
    pub camera_model: String,
}

impl FileMetadata {
    /// Metadata carrying only the file's extension (lowercased, no dot).
    pub fn for_path(path: &Path) -> Self {
        FileMetadata {
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Overlay extractor-derived metadata on top of pattern-derived metadata:
    /// the extracted value wins whenever it is present and non-empty.
    pub fn merge_extracted(&mut self, extracted: &FileMetadata) {
        if extracted.taken_time.is_some() {
            self.taken_time = extracted.taken_time;
        }
        if !extracted.extension.is_empty() {
            self.extension = extracted.extension.clone();
        }
        if !extracted.camera_maker.is_empty() {
            self.camera_maker = extracted.camera_maker.clone();
        }
        if !extracted.camera_model.is_empty() {
            self.camera_model = extracted.camera_model.clone();
        }
    }
}

/// Outcome of processing one discovered file. Exactly one descriptor is
/// emitted per file; `error` and a usable `new_path` are mutually exclusive.
#[derive(Debug)]
pub struct FileDescriptor {
    pub old_path: PathBuf,
    /// Resolved target path; empty when resolution failed.
    pub new_path: PathBuf,
    /// True when the absolute forms of `old_path` and `new_path` differ.
    pub operate: bool,
    pub metadata: Option<FileMetadata>,
    pub error: Option<FerryError>,
}

impl FileDescriptor {
    pub(crate) fn failed(
        old_path: PathBuf,
        metadata: Option<FileMetadata>,
        error: FerryError,
    ) -> Self {
        FileDescriptor {
            old_path,
            new_path: PathBuf::new(),
            operate: false,
            metadata,
            error: Some(error),
        }
    }
}

/// Observational progress event for one source scan. `Started` always
/// precedes the `Found`/`Failed` event for the same source.
#[derive(Clone, Debug)]
pub struct ScanEvent {
    pub profile: String,
    pub source: PathBuf,
    pub recurse: bool,
    pub types: Vec<String>,
    pub kind: ScanEventKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanEventKind {
    Started,
    Found(usize),
    Failed(String),
}
