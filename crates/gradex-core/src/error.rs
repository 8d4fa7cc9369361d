//! Error types for the compile-dispatch core

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a `compile` call.
///
/// This is the only error type callers ever see. Setup failures (scan,
/// classification, artifact preparation, command synthesis) abort the call
/// before any process is spawned; a nonzero exit of a spawned command is
/// NOT an error and is reported through the verdict sink instead.
#[derive(Error, Debug)]
pub enum CompileError {
    /// Source root is missing or is not a directory
    #[error("source path {path} is not a directory")]
    InvalidInput { path: PathBuf },

    /// Configured native frontend is not one of the recognized values
    #[error("unsupported compiler type: {compiler}")]
    UnsupportedCompiler { compiler: String },

    /// Output directory could not be cleared or created
    #[error("resource conflict at {path}: {reason}")]
    ResourceConflict { path: PathBuf, reason: String },

    /// Process could not be spawned, its streams could not be read, or a
    /// sink could not be reached
    #[error("execution failed: {0}")]
    Execution(String),
}

impl CompileError {
    /// Wrap a filesystem error against a specific path.
    pub fn conflict(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        CompileError::ResourceConflict {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CompileError {
    fn from(err: std::io::Error) -> Self {
        CompileError::Execution(err.to_string())
    }
}

/// Result type for compile-dispatch operations
pub type Result<T> = std::result::Result<T, CompileError>;
