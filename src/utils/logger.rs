use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::from_default_env()
        .filter_level(LevelFilter::Warn) // Default: only warnings from dependencies
        .filter_module(env!("CARGO_PKG_NAME"), level) // Our crate: use requested level
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            let line = match record.level() {
                Level::Warn => format!(
                    "[{} {} {}] {}",
                    name.cyan(),
                    "WARN".yellow(),
                    record.target().white(),
                    record.args()
                ),
                Level::Error => format!(
                    "[{} {} {}] {}",
                    name.cyan(),
                    "ERROR".red(),
                    record.target().white(),
                    record.args()
                ),
                _ => format!("[{}] {}", name.cyan(), record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .init();
}
