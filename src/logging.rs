use std::io::Write;

use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// A logger writing one line per record to the standard error, with the level colored.
pub struct TerminalLogger {
    level: LevelFilter,
}

impl TerminalLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    fn level_label(level: Level) -> ColoredString {
        match level {
            Level::Error => "ERROR".red().bold(),
            Level::Warn => "WARN ".yellow(),
            Level::Info => "INFO ".green(),
            Level::Debug => "DEBUG".blue(),
            Level::Trace => "TRACE".dimmed(),
        }
    }
}

impl Log for TerminalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Nothing sensible can be done if stderr is gone.
        let _ = writeln!(std::io::stderr().lock(), "{} {}", Self::level_label(record.level()), record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Installs the terminal logger as the global logger.
///
/// # Errors
/// Fails if a logger was already installed.
pub fn initialize(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(TerminalLogger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}
