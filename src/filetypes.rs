//! Supported file types: category names mapped to extension lists.

use std::collections::HashMap;
use std::path::Path;

/// Immutable registry of file type categories. Built once (usually via
/// `Default`) and passed into the pipeline; sources reference categories by
/// name in their `types` list.
#[derive(Clone, Debug)]
pub struct FileTypeRegistry {
    categories: HashMap<String, Vec<String>>,
}

impl Default for FileTypeRegistry {
    fn default() -> Self {
        let mut categories = HashMap::new();
        categories.insert(
            "image".to_string(),
            as_strings(&["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp"]),
        );
        categories.insert(
            "image.raw".to_string(),
            as_strings(&[
                "dng", // Adobe Digital Negative
                "arw", // Sony
                "cr2", "cr3", // Canon
                "nef", // Nikon
                "raw", // generic
                "raf", // Fujifilm
                "orf", // Olympus
                "rw2", // Panasonic
                "pef", // Pentax
                "srw", // Samsung
                "x3f", // Sigma
            ]),
        );
        categories.insert(
            "video".to_string(),
            as_strings(&["mp4", "mov", "avi", "mkv", "webm", "flv", "wmv"]),
        );
        FileTypeRegistry { categories }
    }
}

impl FileTypeRegistry {
    /// True when the path's extension belongs to any of the named categories.
    /// Unknown category names match nothing.
    pub fn matches(&self, path: &Path, types: &[String]) -> bool {
        types.iter().any(|t| self.is_category(path, t))
    }

    /// True when the path's extension belongs to the single named category.
    pub fn is_category(&self, path: &Path, category: &str) -> bool {
        let ext = match path.extension() {
            Some(e) => e.to_string_lossy().to_lowercase(),
            None => return false,
        };
        self.categories
            .get(category)
            .is_some_and(|exts| exts.iter().any(|e| *e == ext))
    }
}

fn as_strings(exts: &[&str]) -> Vec<String> {
    exts.iter().map(|e| e.to_string()).collect()
}
