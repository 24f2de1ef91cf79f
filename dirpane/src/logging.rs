//! Logging to stderr and an optional log file.
//!
//! Only records from this program's own crates are shown; dependency noise
//! is dropped.

use std::fs::File;
use std::io::{self, Write};
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

use crate::cli::Options;

/// Crate name prefix of targets that get logged.
const ALLOWED_TARGET: &str = "dirpane";

/// Install the global logger.
pub fn initialize(options: &Options) -> io::Result<()> {
    let level = options.log_level();
    let logfile = options.log_file.as_ref().map(File::create).transpose()?.map(Mutex::new);

    let logger = Logger { level, start: Instant::now(), logfile };
    log::set_boxed_logger(Box::new(logger)).map_err(io::Error::other)?;
    log::set_max_level(level);
    Ok(())
}

struct Logger {
    level: LevelFilter,
    start: Instant,
    logfile: Option<Mutex<File>>,
}

impl Logger {
    fn format(&self, record: &Record<'_>) -> String {
        let elapsed = self.start.elapsed();
        format!(
            "[{}.{:06}s] [{:<5}] [{}] {}\n",
            elapsed.as_secs(),
            elapsed.subsec_micros(),
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level && is_allowed_target(metadata.level(), metadata.target())
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = self.format(record);
        if let Some(logfile) = &self.logfile {
            let _ = logfile.lock().write_all(message.as_bytes());
        }
        let _ = io::stderr().lock().write_all(message.as_bytes());
    }

    fn flush(&self) {
        if let Some(logfile) = &self.logfile {
            let _ = logfile.lock().flush();
        }
    }
}

/// Errors are always shown, other levels only from our crates.
fn is_allowed_target(level: Level, target: &str) -> bool {
    level == Level::Error || target.starts_with(ALLOWED_TARGET)
}
