//! Platform logging initialization for the dashboard.
//!
//! The TUI owns the terminal, so logs go to `./dashboard.log` in the current
//! working directory.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{CombinedLogger, Config, ConfigBuilder, WriteLogger};

/// Initialize the file logger. Logging is skipped (with a warning on stderr)
/// if the file cannot be created.
pub fn initialize(log_path: &Path) {
    let level = dashboard_logging::default_level();
    let config = build_config();

    let file = match File::create(log_path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            return;
        }
    };

    let _ = CombinedLogger::init(vec![WriteLogger::new(level, config, file)]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        // reqwest/hyper chatter drowns out poll ticks at debug level.
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .add_filter_ignore_str("rustls")
        .build()
}
