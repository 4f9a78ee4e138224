use basis_lib::collections::contiguous::{DArray, DArrayError};
use basis_lib::log_to;
use basis_lib::logger::{LogLevel, Logger, LoggerConfig};

fn main() {
    let logger = match Logger::initialize(LoggerConfig::default()) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("{e}");
            return;
        },
    };

    log_to!(logger, LogLevel::Info, "Hello from basis-lib");

    if let Err(e) = demo(&logger) {
        log_to!(logger, LogLevel::Error, "{e}");
    }

    if let Err(e) = logger.shutdown() {
        eprintln!("{e}");
    }
}

fn demo(logger: &Logger) -> Result<(), DArrayError> {
    let mut arr = DArray::<u32>::new()?;

    for i in 0..8 {
        arr.push(i * 10)?;
        log_to!(logger, LogLevel::Debug, "{arr:?}");
    }

    arr.push_at(2, 100)?;
    log_to!(logger, LogLevel::Info, "after insert: {arr:?}");

    let removed = arr.pop_at(3)?;
    log_to!(logger, LogLevel::Info, "removed {removed}, left with {arr:?}");

    if let Err(e) = arr.push_at(arr.len(), 0) {
        log_to!(logger, LogLevel::Warn, "insert past the end rejected: {e}");
    }

    while let Ok(value) = arr.pop() {
        log_to!(logger, LogLevel::Trace, "popped {value}");
    }

    Ok(())
}
