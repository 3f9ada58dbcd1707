//! Error types for Strap operations.
//!
//! This module defines [`StrapError`], the primary error type used throughout
//! the installer, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `StrapError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `StrapError::Other`) for unexpected errors
//! - Any failed external command aborts the whole run; there are no retries
//!   and no rollback of already-applied filesystem changes

use thiserror::Error;

/// Core error type for Strap operations.
#[derive(Debug, Error)]
pub enum StrapError {
    /// A dotted version string contained a non-numeric component.
    ///
    /// Explicit policy: garbage tokens are rejected, never coerced to 0.
    #[error("Malformed version string: {input:?}")]
    MalformedVersion { input: String },

    /// An external command exited non-zero (or could not be spawned).
    #[error("Failed during: {command}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
    },

    /// A fatal host precondition failed (wrong OS, root user, missing
    /// admin membership, unsearchable prefix).
    #[error("{message}")]
    UnsupportedHost { message: String },

    /// The Xcode license has not been accepted.
    #[error(
        "You have not agreed to the Xcode license.\n\
         Before running the installer again please agree to the license by opening\n\
         Xcode.app or running:\n    sudo xcodebuild -license"
    )]
    LicenseNotAccepted,

    /// The user declined to continue at an interactive prompt.
    #[error("Aborted")]
    Aborted,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Strap operations.
pub type Result<T> = std::result::Result<T, StrapError>;
