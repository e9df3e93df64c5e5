//! Image metadata: in-process EXIF decode, exiftool for whatever is missing.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use exif::{Exif, In, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::exiftool;
use crate::types::FileMetadata;

/// Extract image metadata. Never fails: EXIF decode first, an exiftool
/// subprocess for fields still missing, extension-only metadata in the
/// worst case.
pub fn extract(path: &Path) -> FileMetadata {
    let mut meta = FileMetadata::for_path(path);

    if let Some(exif) = read_exif(path) {
        meta.taken_time = exif_datetime(&exif);
        if let Some(maker) = ascii_field(&exif, Tag::Make) {
            meta.camera_maker = maker;
        }
        if let Some(model) = ascii_field(&exif, Tag::Model) {
            meta.camera_model = model;
        }
    }

    if meta.taken_time.is_none() || meta.camera_maker.is_empty() || meta.camera_model.is_empty() {
        if let Some(fallback) = exiftool::probe(path) {
            if meta.taken_time.is_none() {
                meta.taken_time = fallback.taken_time;
            }
            if meta.camera_maker.is_empty() {
                meta.camera_maker = fallback.camera_maker;
            }
            if meta.camera_model.is_empty() {
                meta.camera_model = fallback.camera_model;
            }
        }
    }

    meta
}

fn read_exif(path: &Path) -> Option<Exif> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    exif::Reader::new().read_from_container(&mut reader).ok()
}

fn exif_datetime(exif: &Exif) -> Option<DateTime<Local>> {
    let raw = ascii_tag(exif, Tag::DateTimeOriginal).or_else(|| ascii_tag(exif, Tag::DateTime))?;
    let ndt = NaiveDateTime::parse_from_str(raw.trim(), "%Y:%m:%d %H:%M:%S").ok()?;
    Local.from_local_datetime(&ndt).earliest()
}

/// Raw ASCII value of a tag. `display_value()` quotes strings, so read the
/// bytes directly.
fn ascii_tag(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(vec) if !vec.is_empty() => String::from_utf8(vec[0].clone()).ok(),
        _ => None,
    }
}

fn ascii_field(exif: &Exif, tag: Tag) -> Option<String> {
    ascii_tag(exif, tag)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
