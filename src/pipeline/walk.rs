//! Per-source directory scan: walkdir with optional recursion, filtered
//! through the file type registry.

use std::path::PathBuf;
use walkdir::WalkDir;

use crate::config::SourceSpec;
use crate::error::{FerryError, Result};
use crate::filetypes::FileTypeRegistry;

/// Collect matching files under one source, in walk order.
///
/// `recurse: false` limits the walk to the source directory itself. The
/// first walk error (missing directory, permission denied) aborts this
/// source and is returned; other sources are unaffected.
pub fn scan_source(src: &SourceSpec, registry: &FileTypeRegistry) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(&src.path);
    if !src.recurse {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| FerryError::Scan(e.to_string()))?;
        if entry.file_type().is_file() && registry.matches(entry.path(), &src.types) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
