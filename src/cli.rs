use clap::Parser;
use std::path::PathBuf;

/// Organize media files into target directories derived from their capture
/// metadata.
#[derive(Clone, Parser)]
#[command(name = "mediaferry")]
#[command(about = "Scan configured sources and move files according to the target template.")]
pub struct Cli {
    /// Path to the config file. Default: ./mediaferry.toml, then the user config dir.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Only process the named profile.
    #[arg(long, short)]
    pub profile: Option<String>,

    /// Actually move files. Without this flag the run only reports.
    #[arg(long)]
    pub ack: bool,

    /// Verbose output.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
