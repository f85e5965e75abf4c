//! Logging initialization for watcher_app.
//!
//! The watcher usually runs headless under cron, so logs go both to the
//! terminal and to `./watcher.log` in the working directory. The level
//! can be raised through the `WATCHER_LOG_LEVEL` environment variable
//! (`trace`, `debug`, `info`, `warn`, `error`).

use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "./watcher.log";
const LEVEL_ENV_VAR: &str = "WATCHER_LOG_LEVEL";

/// Initialize terminal and file logging for one watcher invocation.
pub fn initialize() {
    let level = level_from_env();
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    match File::create(Path::new(LOG_FILE)) {
        Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
        Err(err) => eprintln!("Warning: could not create log file {LOG_FILE}: {err}"),
    }

    let _ = CombinedLogger::init(loggers);
}

fn level_from_env() -> LevelFilter {
    std::env::var(LEVEL_ENV_VAR)
        .ok()
        .and_then(|value| LevelFilter::from_str(&value).ok())
        .unwrap_or(LevelFilter::Info)
}
