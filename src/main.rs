//! Mediaferry CLI: scan sources and move media files; reports only unless
//! --ack is given.

use anyhow::Result;
use clap::Parser;
use mediaferry::cli::Cli;
use mediaferry::config::Config;
use mediaferry::runner::perform_run;
use mediaferry::utils::setup_logging;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    let config = Config::load_preferred(cli.config.as_deref())?;
    perform_run(config, cli.profile.clone(), cli.ack)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
