//! obot runtime: the orchestration layer around the command router.
//!
//! This crate provides:
//! - Layered configuration (`ObotConfig`, `ConfigLoader`)
//! - Logging setup (`LoggingBuilder`, `init_from_config`)
//! - The process lifecycle (`ObotRuntime`): connect the adapter, run start
//!   hooks, dispatch each inbound message on its own task, and on
//!   termination run shutdown hooks and disconnect
//!
//! ```ignore
//! use obot_runtime::ObotRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut runtime = ObotRuntime::new();
//!     runtime.register_adapter::<ConsoleAdapter>()?;
//!
//!     // Run until Ctrl+C
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{ConfigError, ConfigLoader, ConfigResult, ObotConfig, Profile};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{ObotRuntime, RuntimeBuilder};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Logging macros and span helpers.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
