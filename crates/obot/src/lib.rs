//! # obot
//!
//! A chat bot command router: it listens for text messages, recognizes a
//! small command grammar, routes commands to pluggable actions, and lets the
//! actions reply on the originating channel.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────────────┐     ┌──────────────────────────────┐
//! │   Adapter   │────▶│ Runtime (task / message)│────▶│ Router: parse → resolve →    │──▶ Action
//! │  (platform) │     │                         │     │ dispatch → log outcomes      │
//! └─────────────┘     └─────────────────────────┘     └──────────────────────────────┘
//! ```
//!
//! - **Adapters** connect to a platform and stream inbound messages
//! - **Runtime** runs start hooks, dispatches each message on its own task,
//!   and runs shutdown hooks on termination
//! - **Router** owns the action registry and shortcuts, classifies text as
//!   `<prefix> <action> ...` or `<shortcut> ...`, and isolates failures
//! - **Actions** implement [`Action`](prelude::Action): a message handler
//!   plus optional help, start and shutdown procedures
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use obot::prelude::*;
//! use obot_adapter_console::ConsoleAdapter;
//!
//! struct Ping;
//!
//! #[async_trait]
//! impl Action for Ping {
//!     async fn on_message(&self, signal: &mut Signal, _router: &Router) -> ActionResult {
//!         signal.channel().send_text("pong").await?;
//!         signal.success("Ponged");
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut runtime = ObotRuntime::new();
//!     runtime.router_mut().register("ping", Ping, Some("Replies with pong"))?;
//!     runtime.router_mut().bind_shortcut("p", "ping")?;
//!     runtime.register_adapter::<ConsoleAdapter>()?;
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use obot_core as core;
pub use obot_framework as framework;
pub use obot_runtime as runtime;

/// Commonly used types for writing actions and wiring a bot.
///
/// ```rust,ignore
/// use obot::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use obot_runtime::{ObotConfig, ObotRuntime};

    // Action contract
    pub use obot_framework::{Action, ActionResult, Capabilities, Router, RouterOptions};

    // Per-invocation context and diagnostics
    pub use obot_core::{Outcome, OutcomeKind, Signal};

    // Platform traits
    pub use obot_core::{Channel, Message, Outgoing};

    pub use obot_framework::async_trait;
}
