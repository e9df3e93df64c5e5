//! Error types for the mediaferry API and pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FerryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("{0}")]
    InvalidConfig(String),

    #[error("no config file found (tried: {0})")]
    ConfigNotFound(String),

    #[error("scan failed: {0}")]
    Scan(String),

    #[error("could not determine target template for {0}")]
    NoTargetTemplate(String),

    #[error("no metadata")]
    NoMetadata,
}

pub type Result<T> = std::result::Result<T, FerryError>;
