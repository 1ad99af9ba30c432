//! Error types for the obot framework.

use thiserror::Error;

/// Why a `register` or `bind_shortcut` call was rejected.
///
/// Rejections are never fatal: the router logs them and leaves its state
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// An action with this name is already registered.
    #[error("failed to add action \"{0}\", it already exists")]
    DuplicateAction(String),

    /// A shortcut with this name is already bound.
    #[error("a shortcut named \"{name}\" already exists, it refers to \"{target}\"")]
    DuplicateShortcut {
        /// The shortcut name.
        name: String,
        /// The action it already points to.
        target: String,
    },

    /// The shortcut target is not a registered action.
    #[error("failed to set shortcut for \"{0}\", it doesn't exist")]
    UnknownTarget(String),

    /// The shortcut equals the command prefix and could never be matched.
    #[error("failed to set shortcut \"{0}\", it is the command prefix")]
    ReservedShortcut(String),

    /// The name is empty or contains separator characters.
    #[error("invalid name \"{0}\": names must be a single non-empty token")]
    InvalidName(String),
}
