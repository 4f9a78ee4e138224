//! An explicit logging context, [`Logger`], writing leveled messages to the console and to a file.
//!
//! Nothing in this module is global. A [`Logger`] is created from a [`LoggerConfig`], handed to
//! whatever needs it and shut down when done. If the rest of the program (including the
//! collections in this crate) should report through it as well, it can be installed as the
//! backend of the [`log`] facade with [`Logger::install`], which is never done implicitly.
//!
//! # Line Format
//! Every message is written as a single line:
//! ```text
//! <thread>\t[<LEVEL>]\t <file>:<line>: <message>
//! ```

mod config;
mod error;
mod level;
mod logger;
mod tests;

pub use config::*;
pub use error::*;
pub use level::*;
pub use logger::*;

/// Logs a formatted message through the provided [`Logger`], recording the file and line of the
/// invocation.
///
/// # Examples
/// ```
/// # use basis_lib::logger::{LogLevel, Logger, LoggerConfig};
/// # use basis_lib::log_to;
/// let logger = Logger::initialize(LoggerConfig::default()).unwrap();
/// log_to!(logger, LogLevel::Info, "{} items processed", 3);
/// logger.shutdown().unwrap();
/// ```
#[macro_export]
macro_rules! log_to {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, file!(), line!(), format_args!($($arg)+))
    };
}
