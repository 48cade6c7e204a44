//! Unified error handling for the walk-tracker library.
//!
//! One crate-wide error type covers the whole failure taxonomy: permission
//! refusal at start, transient location-source failures, and upload failures.
//! Lifecycle guard violations (e.g. `start()` while already Active) are
//! deliberately *not* errors; the engine absorbs them as no-ops.

use crate::location::AuthorizationStatus;
use thiserror::Error;

/// Unified error type for walk-tracker operations.
#[derive(Debug, Clone, Error)]
pub enum WalkTrackError {
    /// Location authorization was not granted when starting a session.
    /// The session state is unchanged; the caller should direct the user to
    /// the system permission settings.
    #[error("location permission not granted (status: {status:?})")]
    PermissionDenied { status: AuthorizationStatus },

    /// Transient failure reported by the location source. Does not stop an
    /// in-progress session.
    #[error("location source error: {message}")]
    LocationSource { message: String },

    /// Session upload failed. Single attempt, no retry.
    #[error("upload failed{}: {message}", .status_code.map(|c| format!(" ({c})")).unwrap_or_default())]
    Upload {
        message: String,
        status_code: Option<u16>,
    },

    /// Generic internal error.
    #[error("internal error: {message}")]
    Internal { message: String },
}

/// Result type alias for walk-tracker operations.
pub type Result<T> = std::result::Result<T, WalkTrackError>;
