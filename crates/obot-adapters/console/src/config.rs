//! Configuration types for the console adapter.
//!
//! ```toml
//! [adapters.console]
//! user = "alice"
//! channel = "terminal"
//! ```

use serde::{Deserialize, Serialize};

/// Console adapter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Author name given to every input line, and the `@` target of replies.
    pub user: String,

    /// Channel identifier reported to actions.
    pub channel: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            user: "user".to_string(),
            channel: "console".to_string(),
        }
    }
}
