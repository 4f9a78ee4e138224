use std::path::PathBuf;

use super::{LogLevel, LogMode};

/// Settings used to initialize a [`Logger`](super::Logger).
///
/// The default configuration logs everything from [`LogLevel::Debug`] upwards to the console, as
/// well as to the debug console in debug builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub mode: LogMode,
    /// The file to append to when `mode` contains [`LogMode::FILE`].
    pub file: Option<PathBuf>,
}

impl LoggerConfig {
    /// Enables the file sink, appending to the file at `path`.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> LoggerConfig {
        self.mode |= LogMode::FILE;
        self.file = Some(path.into());
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let mut mode = LogMode::CONSOLE;
        if cfg!(debug_assertions) {
            mode |= LogMode::DEBUG_CONSOLE;
        }

        LoggerConfig {
            min_level: LogLevel::Debug,
            mode,
            file: None,
        }
    }
}
