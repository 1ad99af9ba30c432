//! Errors raised while building actions.
//!
//! Failures while *running* an action are not errors here: they are
//! recorded as outcomes, or returned as a `BoxError` for the router to log.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    /// A configured endpoint is not a valid absolute URL.
    #[error("invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// The emoji map file could not be read or parsed.
    #[error("failed to load emoji map {path}: {reason}")]
    EmojiMap { path: PathBuf, reason: String },
}

pub type SetupResult<T> = Result<T, SetupError>;
