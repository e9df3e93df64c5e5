//! exiftool subprocess fallback for fields the in-process EXIF reader missed.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde_json::Value;
use std::path::Path;
use std::process::Command;

use crate::tools::exiftool_path;
use crate::types::FileMetadata;

/// Run `exiftool -j` for the three fields we care about. Any failure
/// (missing binary, bad exit status, malformed JSON) yields `None`.
pub(crate) fn probe(path: &Path) -> Option<FileMetadata> {
    let out = Command::new(exiftool_path())
        .args(["-j", "-CreateDate", "-Make", "-Model"])
        .arg(path)
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }

    let parsed: Vec<serde_json::Map<String, Value>> = serde_json::from_slice(&out.stdout).ok()?;
    let data = parsed.first()?;

    let mut meta = FileMetadata::default();
    if let Some(create) = data.get("CreateDate").and_then(Value::as_str) {
        meta.taken_time = parse_exiftool_datetime(create);
    }
    if let Some(make) = data.get("Make").and_then(Value::as_str) {
        meta.camera_maker = make.trim().to_string();
    }
    if let Some(model) = data.get("Model").and_then(Value::as_str) {
        meta.camera_model = model.trim().to_string();
    }
    Some(meta)
}

/// exiftool emits a few date shapes; zone-less ones are taken as local time.
fn parse_exiftool_datetime(s: &str) -> Option<DateTime<Local>> {
    for layout in ["%Y:%m:%d %H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, layout) {
            return Local.from_local_datetime(&ndt).earliest();
        }
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Local))
}
