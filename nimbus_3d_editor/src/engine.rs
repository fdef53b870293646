/// Engine: process-wide logging facade
///
/// The active logger and the minimum severity are the only process-wide
/// state of the editor core. Everything else (pipeline, scene, clock)
/// lives in an explicitly constructed `Application`.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{OnceLock, RwLock};
use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};

static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Records below this severity are dropped before reaching the logger
static MIN_SEVERITY: AtomicU8 = AtomicU8::new(0);

fn logger_slot() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

fn dispatch(entry: LogEntry) {
    if entry.severity < Engine::min_severity() {
        return;
    }
    if let Ok(logger) = logger_slot().read() {
        logger.log(&entry);
    }
}

/// Entry point of the `engine_*!` macros.
///
/// # Example
///
/// ```no_run
/// use nimbus_3d_editor::nimbus3d::Engine;
/// use nimbus_3d_editor::nimbus3d::log::{ConsoleLogger, LogSeverity};
///
/// let console = ConsoleLogger::new();
/// Engine::set_logger(console.clone());
/// Engine::set_min_severity(LogSeverity::Info);
/// ```
pub struct Engine;

impl Engine {
    /// Replace the active logger.
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut slot) = logger_slot().write() {
            *slot = Box::new(logger);
        }
    }

    /// Back to colored stdout with every severity enabled.
    pub fn reset_logger() {
        if let Ok(mut slot) = logger_slot().write() {
            *slot = Box::new(DefaultLogger);
        }
        Self::set_min_severity(LogSeverity::Trace);
    }

    pub fn min_severity() -> LogSeverity {
        LogSeverity::from_index(MIN_SEVERITY.load(Ordering::Relaxed))
    }

    pub fn set_min_severity(severity: LogSeverity) {
        MIN_SEVERITY.store(severity.index(), Ordering::Relaxed);
    }

    /// Log without call site (`engine_trace!` to `engine_warn!`).
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        dispatch(LogEntry::new(severity, source, message));
    }

    /// Log with call site (`engine_error!`, `engine_err!`, `engine_bail!`).
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        dispatch(LogEntry::new(severity, source, message).with_location(file, line));
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
