//! synthe - terminal host for the synth engine
//!
//! Run with: cargo run -- [--config PATH] [--midi PORT] [--list-midi] [--verbose]

mod app;
mod config;
mod midi;
mod terminal_input;
mod ui;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use std::{fs::File, path::PathBuf};

fn init_logging(verbose: bool, path: PathBuf) -> EyreResult<()> {
    use simplelog::*;

    // The terminal belongs to the UI, so logs go to a file.
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let log_file = File::create(&path)
        .or_else(|_| File::create(std::env::temp_dir().join("synthe.log")))
        .wrap_err_with(|| format!("cannot create log file {}", path.display()))?;

    WriteLogger::init(log_level, Config::default(), log_file)
        .wrap_err("failed to initialize logger")?;

    log::info!("synthe starting (log level: {:?})", log_level);
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    let value_of = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1).cloned())
    };

    if args.iter().any(|a| a == "--list-midi") {
        for name in midi::port_names()? {
            println!("{}", name);
        }
        return Ok(());
    }

    let config_path = value_of("--config").map(PathBuf::from);
    let mut settings = config::load(config_path.as_deref())?;
    if let Some(port) = value_of("--midi") {
        settings.midi_port = Some(port);
    }

    let log_path = settings
        .log_path
        .clone()
        .unwrap_or_else(config::default_log_path);
    init_logging(verbose, log_path)?;

    app::run(settings)
}
