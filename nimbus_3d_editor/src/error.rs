//! Error types for the Nimbus3D editor core
//!
//! This module defines the error types used throughout the editor,
//! covering pipeline faults, configuration and scene documents,
//! camera parameter validation and object graph handles.

use std::fmt;

/// Result type for Nimbus3D operations
pub type Result<T> = std::result::Result<T, Error>;

/// Nimbus3D errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Initialization failed (application, pipeline, subsystems)
    InitializationFailed(String),

    /// A module signaled failure during Init, Start or CleanUp
    ModuleFailed {
        /// Name of the failing module
        module: String,
        /// Lifecycle stage ("init", "start", "update", "clean_up")
        stage: &'static str,
    },

    /// Malformed or missing configuration data
    ConfigError(String),

    /// Malformed or inconsistent scene document
    SerializationError(String),

    /// Camera or geometry parameter outside its valid range
    InvalidParameter(String),

    /// Stale object handle, hierarchy cycle or duplicate component
    InvalidObject(String),

    /// Filesystem error while reading or writing a document
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::ModuleFailed { module, stage } => {
                write!(f, "Module '{}' failed during {}", module, stage)
            }
            Error::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            Error::InvalidObject(msg) => write!(f, "Invalid object: {}", msg),
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
