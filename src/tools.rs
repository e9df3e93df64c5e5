//! External tool resolution for the subprocess fallbacks.
//!
//! Resolution order: environment variable override, then the bare name for
//! PATH lookup.

use std::env;
use std::path::PathBuf;

fn resolve_tool(env_key: &str, default_name: &str) -> PathBuf {
    if let Ok(v) = env::var(env_key) {
        let p = PathBuf::from(&v);
        if p.exists() {
            return p;
        }
    }
    PathBuf::from(default_name)
}

/// Path to the exiftool binary. Override with `MEDIAFERRY_EXIFTOOL_PATH`.
pub fn exiftool_path() -> PathBuf {
    resolve_tool("MEDIAFERRY_EXIFTOOL_PATH", "exiftool")
}

/// Path to the ffprobe binary. Override with `MEDIAFERRY_FFPROBE_PATH`.
pub fn ffprobe_path() -> PathBuf {
    resolve_tool("MEDIAFERRY_FFPROBE_PATH", "ffprobe")
}
