//! # obot console adapter
//!
//! A line-oriented platform for running the bot from a terminal:
//!
//! - every non-blank input line becomes an inbound message authored by the
//!   configured user
//! - replies are written as `@<user> <text>`
//! - channel text is written as-is; attachments as `[attachment <name>, <n> bytes]`
//! - end of input closes the inbound stream, which stops the runtime
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use obot_runtime::ObotRuntime;
//! use obot_adapter_console::ConsoleAdapter;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut runtime = ObotRuntime::new();
//!     runtime.register_adapter::<ConsoleAdapter>()?;
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod config;
pub mod message;

pub use adapter::ConsoleAdapter;
pub use config::ConsoleConfig;
pub use message::{ConsoleChannel, ConsoleClient, ConsoleMessage};
