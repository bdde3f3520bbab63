//! Caliper CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use caliper_cli::Args;

fn main() {
    let args = Args::parse();

    let log_level = match LevelFilter::from_str(&args.log_level) {
        Ok(level) => level,
        Err(_) => {
            eprintln!("Unknown log level '{}', falling back to 'warn'", args.log_level);
            LevelFilter::Warn
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    debug!(args:?; "Parsed arguments");
    info!(scene = args.input.as_str(); "Rendering annotation scene");

    match caliper_cli::run(&args) {
        Ok(()) => info!(output = args.output.as_str(); "Overlay written"),
        Err(err) => {
            error!("{err}");
            process::exit(1);
        }
    }
}
