//! Error types shared by the core layer.
//!
//! Router-level errors (registration) live in `obot-framework`; runtime and
//! configuration errors live in `obot-runtime`.

use thiserror::Error;

/// Type-erased error returned by action procedures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the chat-platform collaborator.
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    /// The client is not connected to the platform.
    #[error("not connected to the platform")]
    NotConnected,

    /// Sending a message or reply failed.
    #[error("failed to send message: {0}")]
    SendFailed(String),

    /// The platform refused the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The connection could not be established.
    #[error("connection failed: {reason}")]
    ConnectionFailed {
        /// Reason for failure.
        reason: String,
    },

    /// The adapter was asked to connect twice.
    #[error("adapter '{0}' is already connected")]
    AlreadyConnected(&'static str),

    /// Invalid adapter configuration.
    #[error("invalid adapter configuration: {0}")]
    InvalidConfig(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for PlatformError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
