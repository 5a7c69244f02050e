//! Error handling for propline-store
//!
//! Wraps propline-core ExError with store-specific helpers

use propline_core::errors::{ExError, ExErrorKind, PropError};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create a read error carrying the line it failed after
pub fn read_error(path: &Path, line: usize, text: &str, err: std::io::Error) -> ExError {
    PropError::ReadFailed {
        path: path.to_path_buf(),
        line,
        text: text.to_string(),
        reason: err.to_string(),
    }
    .into()
}

/// Create a write error
pub fn write_error(path: &Path, err: std::io::Error) -> ExError {
    PropError::WriteFailed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
    .into()
}

/// Create a wait-interrupted error
pub fn interrupted(path: &Path) -> ExError {
    PropError::WaitInterrupted {
        path: path.to_path_buf(),
    }
    .into()
}

/// Create a wait-timed-out error
pub fn timed_out(path: &Path, ticket: u64) -> ExError {
    PropError::WaitTimedOut {
        path: path.to_path_buf(),
        ticket,
    }
    .into()
}

/// Create an error for a path that cannot name a properties file
pub fn invalid_path(path: &Path) -> ExError {
    PropError::InvalidFileName {
        name: path.display().to_string(),
    }
    .into()
}
