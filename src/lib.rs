//! Mediaferry: organize media files by capture metadata. Scans configured
//! sources, extracts when and on what each file was captured, and resolves
//! a target path from a template.

pub mod cli;
pub mod config;
pub mod error;
pub mod filetypes;
pub mod meta;
pub mod pipeline;
pub mod runner;
pub mod target;
pub mod tools;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use error::{FerryError, Result};
pub use types::*;

use log::debug;

/// Single entry point: start the scan/worker pipeline for `config` and
/// stream results.
///
/// The caller receives from both `descriptor_rx` and `event_rx` (drain both
/// so neither bounded stream stalls the scan) and joins `supervisor` once
/// the streams close. Pass `profile: Some(name)` to restrict the run to one
/// profile.
pub fn ferry(config: config::Config, profile: Option<String>) -> pipeline::PipelineHandles {
    let config_str = format!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        config
    );
    debug!("{}", config_str);

    pipeline::run_pipeline(
        std::sync::Arc::new(config),
        filetypes::FileTypeRegistry::default(),
        profile,
    )
}
