use bitflags::bitflags;
use derive_more::Display;

/// The severity of a message. Messages below a [`Logger`](super::Logger)'s minimum level are
/// discarded.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    #[display("TRACE")]
    Trace,
    #[display("DEBUG")]
    Debug,
    #[display("INFO")]
    Info,
    #[display("WARN")]
    Warn,
    #[display("ERROR")]
    Error,
    /// An unrecoverable condition. Fatal messages flush every sink once written.
    #[display("FATAL")]
    Fatal,
}

impl LogLevel {
    /// Returns the most verbose [`log::LevelFilter`] that still includes this level.
    pub const fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error | LogLevel::Fatal => log::LevelFilter::Error,
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(value: log::Level) -> Self {
        match value {
            log::Level::Trace => LogLevel::Trace,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Info => LogLevel::Info,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Error => LogLevel::Error,
        }
    }
}

bitflags! {
    /// The sinks that a [`Logger`](super::Logger) writes to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LogMode: u8 {
        /// The platform's debugger console. On unix, this is stderr.
        const DEBUG_CONSOLE = 0x01;
        /// Stdout, or stderr for warnings and above.
        const CONSOLE = 0x02;
        /// The file provided in the [`LoggerConfig`](super::LoggerConfig).
        const FILE = 0x04;
    }
}
