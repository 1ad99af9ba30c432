//! Runtime error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// `run` was called before an adapter was set.
    #[error("No adapter registered")]
    NoAdapter,

    /// Adapter error.
    #[error("Adapter error: {0}")]
    Adapter(#[from] obot_core::PlatformError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The adapter's config section could not be deserialized.
    #[error("Failed to build adapter '{adapter}': {reason}")]
    AdapterConfig {
        adapter: &'static str,
        reason: String,
    },
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
