//! Error types for swraid walk and aggregation operations.
//!
//! A single error enum covers the transport (process execution, output
//! parsing) and the table aggregation engine, so a walk handler can return
//! engine errors through the transport unchanged.
//! All errors implement `std::error::Error` via `thiserror`.

use std::io;
use std::num::ParseIntError;
use thiserror::Error;

/// Result type alias for swraid operations.
pub type SwRaidResult<T> = Result<T, SwRaidError>;

/// Errors that can occur while walking and aggregating the RAID table.
#[derive(Debug, Error)]
pub enum SwRaidError {
    /// An index-walk leaf carried a non-integer value.
    #[error("unknown index type: {value_type} at {oid}")]
    UnsupportedIndexType {
        /// The OID of the offending leaf.
        oid: String,
        /// Name of the value type that arrived.
        value_type: String,
    },

    /// The trailing row index of a value OID did not fit an `i64`.
    #[error("invalid row index '{suffix}' in {oid}: {source}")]
    IndexParse {
        /// The OID of the offending leaf.
        oid: String,
        /// The digits that failed to parse.
        suffix: String,
        /// The underlying parse error.
        #[source]
        source: ParseIntError,
    },

    /// Failed to spawn an external program.
    #[error("failed to execute '{program}': {source}")]
    ProcessSpawn {
        /// The program that failed to start.
        program: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// A walk of a subtree did not complete.
    #[error("walk of {subtree} failed: {message}")]
    WalkFailed {
        /// The subtree being walked.
        subtree: String,
        /// Error message (usually the tool's stderr).
        message: String,
    },

    /// Walk output could not be interpreted.
    #[error("unparseable walk output at line {line}: {message}")]
    OutputParse {
        /// 1-based line number within the output.
        line: usize,
        /// Error message.
        message: String,
    },

    /// Configuration validation error.
    #[error("invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// File system error while reading configuration or replay data.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path being read.
        path: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Internal error (unexpected state).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl SwRaidError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a walk failure error.
    pub fn walk_failed(subtree: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WalkFailed {
            subtree: subtree.into(),
            message: message.into(),
        }
    }

    /// Creates an output parse error.
    pub fn output_parse(line: usize, message: impl Into<String>) -> Self {
        Self::OutputParse {
            line,
            message: message.into(),
        }
    }

    /// Creates an IO error for the given path.
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates a transient condition
    /// (agent timeout, refused request) that may succeed when the check is
    /// run again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SwRaidError::WalkFailed { .. })
    }
}
