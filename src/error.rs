//! Error types for the payroll import engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for the conditions that abort a document or a run. Missing fields inside a
//! document are never errors; they degrade to zero values.

use thiserror::Error;

/// The main error type for the payroll import engine.
///
/// # Example
///
/// ```
/// use payroll_import::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds a value the engine cannot work with.
    #[error("Invalid configuration value '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// The import source directory does not exist.
    #[error("Source directory not found: {path}")]
    SourceNotFound {
        /// The directory that was requested.
        path: String,
    },

    /// An extracted document could not be read from disk.
    #[error("Failed to read document '{document}': {message}")]
    DocumentRead {
        /// The document identifier (file name).
        document: String,
        /// The underlying I/O message.
        message: String,
    },

    /// An extracted document was read but is not valid extractor output.
    #[error("Malformed document '{document}': {message}")]
    DocumentParse {
        /// The document identifier (file name).
        document: String,
        /// The underlying parse message.
        message: String,
    },

    /// The persistent store rejected an operation.
    #[error("Store error: {message}")]
    Store {
        /// A description of the store failure.
        message: String,
    },
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        EngineError::Store {
            message: err.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
