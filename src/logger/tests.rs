#![cfg(test)]

use std::fs;
use std::path::PathBuf;
use std::process;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use super::logger::format_line;
use super::*;
use crate::log_to;

fn temp_log_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    std::env::temp_dir().join(format!("basis-lib-{}-{nanos}-{name}.log", process::id()))
}

#[test]
fn test_format_line() {
    let line = thread::Builder::new()
        .name("worker".into())
        .spawn(|| format_line(LogLevel::Warn, "src/main.rs", 12, format_args!("{} left", 3)))
        .unwrap()
        .join()
        .unwrap();

    assert_eq!(line, "worker\t[WARN]\t src/main.rs:12: 3 left\n");
}

#[test]
fn test_default_config() {
    let config = LoggerConfig::default();
    assert_eq!(config.min_level, LogLevel::Debug);
    assert!(config.mode.contains(LogMode::CONSOLE));
    assert_eq!(
        config.mode.contains(LogMode::DEBUG_CONSOLE),
        cfg!(debug_assertions),
        "The debug console should only be enabled in debug builds."
    );
    assert!(config.file.is_none());
}

#[test]
fn test_levels() {
    assert!(LogLevel::Trace < LogLevel::Debug);
    assert!(LogLevel::Error < LogLevel::Fatal);
    assert_eq!(LogLevel::from(log::Level::Info), LogLevel::Info);
    assert_eq!(LogLevel::Fatal.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Fatal.to_string(), "FATAL");

    let mut logger = Logger::initialize(LoggerConfig::default()).unwrap();
    assert!(!logger.enabled(LogLevel::Trace));
    assert!(logger.enabled(LogLevel::Debug));

    logger.set_min_level(LogLevel::Error);
    assert!(!logger.enabled(LogLevel::Warn));
    assert!(logger.enabled(LogLevel::Fatal));
}

#[test]
fn test_file_sink() {
    let path = temp_log_path("file-sink");
    let config = LoggerConfig {
        min_level: LogLevel::Info,
        mode: LogMode::empty(),
        file: None,
    }
    .with_file(&path);

    let logger = Logger::initialize(config).unwrap();
    assert_eq!(logger.mode(), LogMode::FILE);

    let first_line = line!() + 1;
    log_to!(logger, LogLevel::Info, "first {}", 1);
    log_to!(logger, LogLevel::Debug, "filtered");
    logger.log(LogLevel::Error, "lib.rs", 7, format_args!("second"));
    logger.shutdown().unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines.len(), 2, "Messages below the minimum level should be discarded.");
    assert!(lines[0].ends_with(&format!("[INFO]\t {}:{}: first 1", file!(), first_line)));
    assert!(lines[1].ends_with("[ERROR]\t lib.rs:7: second"));
}

#[test]
fn test_file_sink_appends() {
    let path = temp_log_path("append");
    for i in 0..2 {
        let logger = Logger::initialize(LoggerConfig {
            min_level: LogLevel::Trace,
            mode: LogMode::FILE,
            file: Some(path.clone()),
        })
        .unwrap();
        logger.log(LogLevel::Trace, "a.rs", i, format_args!("run {i}"));
        logger.shutdown().unwrap();
    }

    let contents = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(contents.lines().count(), 2, "Reinitializing should append to the log file.");
}

#[test]
fn test_missing_file() {
    let config = LoggerConfig {
        mode: LogMode::CONSOLE | LogMode::FILE,
        ..LoggerConfig::default()
    };
    assert!(Logger::initialize(config).unwrap_err().is_missing_file());

    let config = LoggerConfig::default().with_file("/nonexistent-dir/basis-lib/log.txt");
    assert!(Logger::initialize(config).unwrap_err().is_open_file());
}

#[test]
fn test_set_mode_and_fatal_flush() {
    let path = temp_log_path("mode");
    let mut logger = Logger::initialize(LoggerConfig {
        min_level: LogLevel::Trace,
        mode: LogMode::FILE,
        file: Some(path.clone()),
    })
    .unwrap();

    logger.log(LogLevel::Fatal, "a.rs", 1, format_args!("fatal"));
    assert!(
        fs::read_to_string(&path).unwrap().ends_with("[FATAL]\t a.rs:1: fatal\n"),
        "Fatal messages should reach the file without an explicit flush."
    );

    logger.set_mode(LogMode::empty());
    assert_eq!(logger.mode(), LogMode::empty());
    logger.log(LogLevel::Fatal, "a.rs", 2, format_args!("discarded"));

    logger.set_mode(LogMode::FILE);
    logger.log(LogLevel::Info, "a.rs", 3, format_args!("resumed"));
    logger.shutdown().unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines.len(), 2, "Nothing should be written while the file sink is disabled.");
    assert!(lines[1].ends_with("[INFO]\t a.rs:3: resumed"));
}

// Installing succeeds once per process, so this is the only test that does it.
#[cfg(feature = "collections")]
#[test]
fn test_install_routes_array_diagnostics() {
    use crate::collections::contiguous::DArray;

    let path = temp_log_path("install");
    let logger = Logger::initialize(LoggerConfig {
        min_level: LogLevel::Trace,
        mode: LogMode::FILE,
        file: Some(path.clone()),
    })
    .unwrap();
    logger.install().unwrap();

    let mut arr = DArray::<u32>::with_capacity(1).unwrap();
    arr.push(7).unwrap();
    assert!(arr.pop_at(5).unwrap_err().is_index_out_of_bounds());
    log::Log::flush(log::logger());

    let contents = fs::read_to_string(&path).unwrap();
    let _ = fs::remove_file(&path);

    assert!(
        contents.lines().any(|line| line.contains("\t[TRACE]\t ")
            && line.ends_with("darray grew from 1 to 2 elements, moving 0")),
        "Growth should be logged at trace."
    );
    assert!(
        contents.lines().any(|line| line.contains("\t[WARN]\t ")
            && line.ends_with("rejected access at index 5 of darray with 1 elements")),
        "Rejected accesses should be logged at warn."
    );
}
