//! LVGL Layout Editor - CLI Entry Point
//!
//! A thin wrapper around `lvgl_core`: argument parsing, configuration,
//! logging setup and command dispatch.

mod cli;
mod config;
mod demo;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::Args;
use config::Config;
use log::debug;

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path).unwrap_or_else(|e| {
            eprintln!("Warning: {:#}", e);
            Config::default()
        }),
        None => Config::load_default().unwrap_or_else(|e| {
            eprintln!("Warning: {:#}", e);
            Config::default()
        }),
    };

    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    logging::init_logging(&config.logging.level);
    debug!("lvgl_cli v{}", env!("CARGO_PKG_VERSION"));

    cli::run_command(&args, &config)
}
