//! The logger slot is process-wide, so every test here runs under #[serial].

use crate::nimbus3d::{Engine, Error};
use crate::nimbus3d::log::{Logger, LogEntry, LogSeverity};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

/// Other unit tests log concurrently; only records tagged by these tests are kept
impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source == "nimbus3d::Test" {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

// ============================================================================
// LOGGING API TESTS
// ============================================================================

#[test]
#[serial]
fn test_set_logger_captures_entries() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    Engine::log(LogSeverity::Info, "nimbus3d::Test", "hello".to_string());
    Engine::log_detailed(LogSeverity::Error, "nimbus3d::Test", "boom".to_string(), "x.rs", 3);

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0].message, "hello");
    assert!(captured[0].file.is_none());
    assert_eq!(captured[1].file, Some("x.rs"));
    assert_eq!(captured[1].line, Some(3));
    drop(captured);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_reset_logger_stops_capture() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);
    Engine::reset_logger();

    Engine::log(LogSeverity::Debug, "nimbus3d::Test", "not captured".to_string());

    assert!(entries.lock().unwrap().is_empty());
}

// ============================================================================
// MACRO TESTS
// ============================================================================

#[test]
#[serial]
fn test_info_macro_formats_message() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    crate::engine_info!("nimbus3d::Test", "{} modules registered", 4);

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].severity, LogSeverity::Info);
    assert_eq!(captured[0].message, "4 modules registered");
    drop(captured);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_engine_err_logs_and_builds_variant() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    let err = crate::engine_err!(InvalidObject, "nimbus3d::Test", "no object {}", 7);

    match err {
        Error::InvalidObject(msg) => assert_eq!(msg, "no object 7"),
        other => panic!("unexpected variant {:?}", other),
    }
    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].severity, LogSeverity::Error);
    assert!(captured[0].file.is_some());
    drop(captured);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_engine_bail_returns_error() {
    fn reject(value: f32) -> crate::nimbus3d::Result<f32> {
        if value < 0.0 {
            crate::engine_bail!(InvalidParameter, "nimbus3d::Test", "negative value {}", value);
        }
        Ok(value)
    }

    assert!(reject(1.0).is_ok());
    assert!(matches!(reject(-1.0), Err(Error::InvalidParameter(_))));
}
