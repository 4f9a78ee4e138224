use std::fmt::Arguments;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::sync::{Mutex, PoisonError};
use std::thread;

use super::{LogLevel, LogMode, LoggerConfig, LoggerError};

/// A logging context with an explicit lifecycle: [`initialize`](Logger::initialize), log,
/// [`shutdown`](Logger::shutdown).
///
/// Writes to the sinks are best-effort. A sink that fails to accept a message is skipped, as there
/// is nowhere left to report the failure.
#[derive(Debug)]
pub struct Logger {
    min_level: LogLevel,
    mode: LogMode,
    file: Option<Mutex<BufWriter<File>>>,
}

impl Logger {
    /// Creates a new Logger from the provided config, opening the log file in append mode if
    /// [`LogMode::FILE`] is enabled.
    ///
    /// # Errors
    /// - [`LoggerError::MissingFile`] if [`LogMode::FILE`] is enabled without a file path.
    /// - [`LoggerError::OpenFile`] if the log file can't be opened or created.
    pub fn initialize(config: LoggerConfig) -> Result<Logger, LoggerError> {
        let file = if config.mode.contains(LogMode::FILE) {
            let path = config.file.ok_or(LoggerError::MissingFile)?;
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(Mutex::new(BufWriter::new(file)))
        } else {
            None
        };

        Ok(Logger {
            min_level: config.min_level,
            mode: config.mode,
            file,
        })
    }

    pub const fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub const fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    pub const fn mode(&self) -> LogMode {
        self.mode
    }

    /// Replaces the set of enabled sinks. [`LogMode::FILE`] only has an effect if a file was opened
    /// during initialization.
    pub const fn set_mode(&mut self, mode: LogMode) {
        self.mode = mode;
    }

    /// Returns true if messages at `level` would be written.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Writes a message to every enabled sink, unless `level` is below the minimum level. Usually
    /// invoked through [`log_to!`](crate::log_to).
    pub fn log(&self, level: LogLevel, file: &str, line: u32, args: Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }

        let message = format_line(level, file, line, args);
        let bytes = message.as_bytes();

        if self.mode.contains(LogMode::DEBUG_CONSOLE) {
            let _ = io::stderr().write_all(bytes);
        }

        if self.mode.contains(LogMode::CONSOLE) {
            let _ = if level >= LogLevel::Warn {
                io::stderr().write_all(bytes)
            } else {
                io::stdout().write_all(bytes)
            };
        }

        if self.mode.contains(LogMode::FILE) {
            if let Some(file) = &self.file {
                let mut file = file.lock().unwrap_or_else(PoisonError::into_inner);
                let _ = file.write_all(bytes);
            }
        }

        if level == LogLevel::Fatal {
            self.flush();
        }
    }

    /// Flushes every sink.
    pub fn flush(&self) {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();

        if let Some(file) = &self.file {
            let _ = file.lock().unwrap_or_else(PoisonError::into_inner).flush();
        }
    }

    /// Consumes the Logger, flushing and closing the log file.
    ///
    /// # Errors
    /// Returns any error encountered while flushing the log file.
    pub fn shutdown(self) -> io::Result<()> {
        let _ = io::stdout().flush();

        if let Some(file) = self.file {
            file.into_inner().unwrap_or_else(PoisonError::into_inner).flush()?;
        }
        Ok(())
    }

    /// Installs the Logger as the backend of the [`log`] facade, so that messages from the `log`
    /// macros are written through it. This can only succeed once per process, after which the
    /// Logger lives until the process exits.
    ///
    /// # Errors
    /// Returns [`LoggerError::Install`] if a backend has already been installed.
    pub fn install(self) -> Result<(), LoggerError> {
        let filter = self.min_level.to_level_filter();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(filter);
        Ok(())
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        Logger::enabled(self, metadata.level().into())
    }

    fn log(&self, record: &log::Record<'_>) {
        Logger::log(
            self,
            record.level().into(),
            record.file().unwrap_or("<unknown>"),
            record.line().unwrap_or(0),
            *record.args(),
        );
    }

    fn flush(&self) {
        Logger::flush(self);
    }
}

/// Formats a single log line, including the trailing newline.
pub(crate) fn format_line(level: LogLevel, file: &str, line: u32, args: Arguments<'_>) -> String {
    let thread = thread::current();
    let name = thread.name().unwrap_or("<unnamed>");
    format!("{name}\t[{level}]\t {file}:{line}: {args}\n")
}
