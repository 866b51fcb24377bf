//! File logging for the terminal client.
//!
//! The UI owns the terminal, so log output only ever goes to a file.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{CombinedLogger, Config, ConfigBuilder, SharedLogger, WriteLogger};

/// Initialize the global logger writing to `path`.
///
/// Leaves logging disabled when the file cannot be created.
pub fn initialize(path: &Path, level: LevelFilter) {
    if level == LevelFilter::Off {
        return;
    }
    let Some(file_logger) = create_file_logger(path, level, build_config()) else {
        return;
    };
    let loggers: Vec<Box<dyn SharedLogger>> = vec![file_logger];
    let _ = CombinedLogger::init(loggers);
}

/// Only this workspace's records; HTTP stack internals stay out of the file.
fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_allow_str("qa_")
        .add_filter_allow_str("grounded_qa")
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
