//! ffprobe subprocess fallback: format-level tags for videos whose container
//! scan produced no timestamp.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use crate::tools::ffprobe_path;
use crate::types::FileMetadata;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    tags: Option<HashMap<String, String>>,
}

/// Run `ffprobe -show_format` and map the tags. Any failure yields `None`.
pub(crate) fn probe(path: &Path) -> Option<FileMetadata> {
    let out = Command::new(ffprobe_path())
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(path)
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }

    let parsed: FfprobeOutput = serde_json::from_slice(&out.stdout).ok()?;
    let tags = parsed.format?.tags?;

    let lookup = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| tags.get(*k).filter(|v| !v.is_empty()).cloned())
            .unwrap_or_default()
    };

    let mut meta = FileMetadata {
        camera_maker: lookup(&["com.android.manufacturer", "make", "manufacturer"]),
        camera_model: lookup(&["com.android.model", "model"]),
        ..Default::default()
    };

    let creation = lookup(&["creation_time"]);
    if !creation.is_empty() {
        meta.taken_time = parse_creation_time(&creation);
    }
    Some(meta)
}

/// `creation_time` shapes seen in the wild; zone-less ones are UTC.
fn parse_creation_time(s: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }
    for layout in ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(Utc.from_utc_datetime(&ndt).with_timezone(&Local));
        }
    }
    None
}
