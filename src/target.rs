//! Target path resolution: template token substitution and filename cleanup.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::error::{FerryError, Result};
use crate::types::FileMetadata;

/// Resolve a target path template against metadata.
///
/// Time tokens are substituted only when `taken_time` is present; the other
/// tokens always, with empty strings for absent camera fields. Unknown
/// tokens are left in place for the caller to detect with
/// [`has_unresolved_tokens`]. Fails only when `meta` is `None`.
pub fn resolve_target_path(template: &str, meta: Option<&FileMetadata>) -> Result<PathBuf> {
    let meta = meta.ok_or(FerryError::NoMetadata)?;
    let mut path = template.to_string();
    if let Some(taken) = meta.taken_time {
        path = path.replace("{meta.taken.year}", &fmt(taken, "%Y"));
        path = path.replace("{meta.taken.date}", &fmt(taken, "%Y-%m-%d"));
        path = path.replace("{meta.taken.datetime}", &fmt(taken, "%Y-%m-%d-%H-%M-%S"));
    }
    path = path.replace("{file.extension}", &meta.extension);
    path = path.replace("{meta.camera.maker}", &meta.camera_maker);
    path = path.replace("{meta.camera.model}", &meta.camera_model);
    Ok(PathBuf::from(normalize_target_path(&path)))
}

fn fmt(taken: DateTime<Local>, layout: &str) -> String {
    taken.format(layout).to_string()
}

/// True when the path still contains a `{...}` token run.
///
/// Deliberately broader than the known token vocabulary so typos in templates
/// surface as skipped files instead of literal-brace directories.
pub fn has_unresolved_tokens(path: &str) -> bool {
    let mut open: Option<usize> = None;
    for (i, b) in path.bytes().enumerate() {
        match b {
            // keep the earliest unmatched opener so "x{{}y" still counts
            b'{' => {
                if open.is_none() {
                    open = Some(i);
                }
            }
            b'}' => {
                if open.is_some_and(|s| i > s + 1) {
                    return true;
                }
                open = None;
            }
            _ => {}
        }
    }
    false
}

/// Clean up the final filename component: collapse runs of `-` and `_`, trim
/// leading and trailing separators from the stem, keep the extension.
/// Directory components are untouched. Idempotent.
pub fn normalize_target_path(path: &str) -> String {
    let p = Path::new(path);
    let base = match p.file_name().and_then(|b| b.to_str()) {
        Some(b) => b,
        None => return path.to_string(),
    };
    let (stem, ext) = match base.rfind('.') {
        Some(i) => (&base[..i], &base[i..]),
        None => (base, ""),
    };
    let mut name = collapse_separator(stem, '-');
    name = collapse_separator(&name, '_');
    let name = name.trim_matches(|c| c == '-' || c == '_' || c == ' ');
    let new_base = format!("{name}{ext}");
    match p.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            dir.join(new_base).to_string_lossy().into_owned()
        }
        _ => new_base,
    }
}

fn collapse_separator(s: &str, sep: char) -> String {
    let double: String = [sep, sep].iter().collect();
    let single = sep.to_string();
    let mut out = s.to_string();
    while out.contains(&double) {
        out = out.replace(&double, &single);
    }
    out
}
