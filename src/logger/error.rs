use std::io;

use derive_more::{Display, Error, IsVariant};

#[derive(Debug, Display, Error, IsVariant)]
pub enum LoggerError {
    #[display("file logging enabled without a file path")]
    MissingFile,
    #[display("unable to open log file: {_0}")]
    OpenFile(io::Error),
    #[display("unable to install logger: {_0}")]
    Install(log::SetLoggerError),
}

impl From<io::Error> for LoggerError {
    fn from(value: io::Error) -> Self {
        LoggerError::OpenFile(value)
    }
}

impl From<log::SetLoggerError> for LoggerError {
    fn from(value: log::SetLoggerError) -> Self {
        LoggerError::Install(value)
    }
}
