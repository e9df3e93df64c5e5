//! Metadata extraction: filename patterns, EXIF, container scans, and
//! external tool fallbacks.

pub mod exiftool;
pub mod ffprobe;
pub mod image;
pub mod pattern;
pub mod video;

pub use pattern::parse_filename_pattern;
