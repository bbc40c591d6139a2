// ============================================================================
// wildtrack-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the Wildtrack Core
//
// This module defines the error taxonomy used across the library. Request
// level problems (validation, packaging, retrieval) are surfaced as
// `CoreError` values. Per-job problems (decode, detection, timeout) are also
// expressed here while a job runs, but the session coordinator converts them
// into recorded job outcomes instead of returning them to the caller.
//
// KEY COMPONENTS:
// - CoreError: Enum of all error kinds the library can produce
// - CoreResult: Result alias used throughout the crate

// ---- External crate imports ----
use thiserror::Error;

// ---- Standard library imports ----
use std::io;
use std::path::PathBuf;

/// Custom error type for wildtrack-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to decode {video}: {reason}")]
    Decode { video: String, reason: String },

    #[error("Detection failed: {0}")]
    Detection(#[from] crate::detection::DetectionFailure),

    #[error("Job exceeded its time limit of {0:?}")]
    Timeout(std::time::Duration),

    #[error("Job was cancelled before it started")]
    Cancelled,

    #[error("Packaging failed for session {session}: {reason}")]
    Packaging { session: String, reason: String },

    #[error("Session not found or expired: {0}")]
    NotFound(String),

    #[error("No supported video files found in {}", .0.display())]
    NoFilesFound(PathBuf),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for wildtrack-core operations
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Builds a decode error for the given video reference.
    pub fn decode(video: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::Decode {
            video: video.into(),
            reason: reason.into(),
        }
    }
}
