//! Editor log records and sinks
//!
//! Every component logs through the `engine_*!` macros with a
//! `"nimbus3d::<Component>"` source tag. Records reach the active
//! `Logger`, which prints them (`DefaultLogger`) or keeps them for the
//! editor console window (`ConsoleLogger`).

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use chrono::{DateTime, Local};
use colored::*;
use serde::{Deserialize, Serialize};

/// Receives every record that passes the engine's severity filter.
///
/// # Example
///
/// ```no_run
/// use nimbus_3d_editor::nimbus3d::log::{Logger, LogEntry};
///
/// struct StatusBarLogger;
///
/// impl Logger for StatusBarLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Show the last message in the status bar...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

/// One log record.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Emitting component, e.g. "nimbus3d::Pipeline"
    pub source: String,
    pub message: String,
    /// Call site, only recorded for errors
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

impl LogEntry {
    pub fn new(severity: LogSeverity, source: &str, message: String) -> Self {
        Self {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        }
    }

    pub fn with_location(mut self, file: &'static str, line: u32) -> Self {
        self.file = Some(file);
        self.line = Some(line);
        self
    }

    /// Local time as `YYYY-MM-DD HH:MM:SS.mmm`.
    pub fn formatted_timestamp(&self) -> String {
        let datetime: DateTime<Local> = self.timestamp.into();
        datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
    }

    /// Uncolored `[SEVERITY] [source] message (file:line)`, without the time.
    pub fn plain_line(&self) -> String {
        let mut line = format!("[{}] [{}] {}", self.severity.label(), self.source, self.message);
        if let (Some(file), Some(number)) = (self.file, self.line) {
            line.push_str(&format!(" ({}:{})", file, number));
        }
        line
    }
}

/// Ordered from the most verbose to the most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogSeverity {
    /// Per-frame details
    Trace,
    Debug,
    Info,
    Warn,
    /// Carries the call site
    Error,
}

impl LogSeverity {
    pub const ALL: [LogSeverity; 5] = [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO",
            LogSeverity::Warn => "WARN",
            LogSeverity::Error => "ERROR",
        }
    }

    pub(crate) fn from_index(index: u8) -> LogSeverity {
        LogSeverity::ALL
            .get(index as usize)
            .copied()
            .unwrap_or(LogSeverity::Error)
    }

    pub(crate) fn index(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LogSeverity {
    type Err = String;

    /// Case-insensitive severity name.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        LogSeverity::ALL
            .into_iter()
            .find(|severity| severity.label().eq_ignore_ascii_case(text.trim()))
            .ok_or_else(|| format!("unknown log severity '{}'", text))
    }
}

/// Colored stdout output.
///
/// Format: `[timestamp] [SEVERITY] [source] message`, with ` (file:line)`
/// appended to errors.
#[derive(Debug, Default)]
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let severity = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };
        let location = match (entry.file, entry.line) {
            (Some(file), Some(line)) => format!(" ({}:{})", file, line),
            _ => String::new(),
        };

        println!(
            "[{}] [{}] [{}] {}{}",
            entry.formatted_timestamp(),
            severity,
            entry.source.bright_blue(),
            entry.message,
            location,
        );
    }
}

/// Number of lines the console window keeps by default.
pub const CONSOLE_CAPACITY: usize = 256;

/// Bounded in-memory buffer feeding the editor console window.
///
/// Clones share the same buffer, so the host keeps one handle and hands
/// another to `Engine::set_logger`. The oldest lines are dropped first.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    lines: Arc<Mutex<VecDeque<(LogSeverity, String)>>>,
    capacity: usize,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::with_capacity(CONSOLE_CAPACITY)
    }
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity.min(CONSOLE_CAPACITY)))),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Buffered lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.iter().map(|(_, text)| text.clone()).collect())
            .unwrap_or_default()
    }

    /// Buffered lines at or above `severity`, oldest first.
    pub fn lines_at_least(&self, severity: LogSeverity) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| {
                lines
                    .iter()
                    .filter(|(line_severity, _)| *line_severity >= severity)
                    .map(|(_, text)| text.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, entry: &LogEntry) {
        if let Ok(mut lines) = self.lines.lock() {
            if lines.len() == self.capacity {
                lines.pop_front();
            }
            lines.push_back((entry.severity, entry.plain_line()));
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message (per-frame details)
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::nimbus3d::Engine::log(
            $crate::nimbus3d::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::nimbus3d::Engine::log(
            $crate::nimbus3d::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message (lifecycle, state changes, imports)
///
/// # Example
///
/// ```no_run
/// nimbus_3d_editor::engine_info!("nimbus3d::Importer", "Imported {} meshes", 3);
/// ```
#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::nimbus3d::Engine::log(
            $crate::nimbus3d::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message (recovered problems)
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::nimbus3d::Engine::log(
            $crate::nimbus3d::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with its call site
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::nimbus3d::Engine::log_detailed(
            $crate::nimbus3d::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log an ERROR and build the matching `Error` variant.
///
/// # Example
///
/// ```no_run
/// use nimbus_3d_editor::engine_err;
///
/// let err = engine_err!(InvalidObject, "nimbus3d::Scene", "No object with uid {}", 42);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($variant:ident, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::nimbus3d::Engine::log_detailed(
            $crate::nimbus3d::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::nimbus3d::Error::$variant(message)
    }};
}

/// Log an ERROR and return early with the matching `Error` variant.
#[macro_export]
macro_rules! engine_bail {
    ($variant:ident, $source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($variant, $source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
