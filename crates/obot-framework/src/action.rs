//! The contract every pluggable action implements.
//!
//! An action has one required procedure, [`Action::on_message`], and three
//! optional ones. Which optional procedures exist is declared up front via
//! [`Action::capabilities`]; the router only ever calls a procedure whose
//! capability flag is set.
//!
//! ```rust,ignore
//! struct Ping;
//!
//! #[async_trait]
//! impl Action for Ping {
//!     fn capabilities(&self) -> Capabilities {
//!         Capabilities::new().with_help()
//!     }
//!
//!     async fn on_message(&self, signal: &mut Signal, _router: &Router) -> ActionResult {
//!         signal.channel().send_text("Pong!").await?;
//!         signal.success("pong sent");
//!         Ok(())
//!     }
//!
//!     async fn on_help(&self, message: &dyn Message) -> ActionResult {
//!         message.channel().send_text("Write ``ob ping``").await?;
//!         Ok(())
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use obot_core::{BoxError, Message, Signal};

use crate::router::Router;

/// Result type of every action procedure.
pub type ActionResult = Result<(), BoxError>;

/// A shared, type-erased action.
pub type BoxedAction = Arc<dyn Action>;

/// Declares which optional procedures an action provides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// `on_help` is implemented.
    pub help: bool,
    /// `on_start` is implemented.
    pub start: bool,
    /// `on_shutdown` is implemented.
    pub shutdown: bool,
}

impl Capabilities {
    /// No optional procedures.
    pub const fn new() -> Self {
        Self {
            help: false,
            start: false,
            shutdown: false,
        }
    }

    pub const fn with_help(mut self) -> Self {
        self.help = true;
        self
    }

    pub const fn with_start(mut self) -> Self {
        self.start = true;
        self
    }

    pub const fn with_shutdown(mut self) -> Self {
        self.shutdown = true;
        self
    }
}

/// A named command handler.
///
/// Actions report how things went by appending [`Outcome`]s to the
/// [`Signal`]; the router only logs them. Anything the user should see has
/// to be sent by the action itself through the message or its channel.
///
/// Returning `Err` (or panicking) is caught at the router boundary and
/// logged; it never reaches the user and never affects other dispatches.
///
/// [`Outcome`]: obot_core::Outcome
#[async_trait]
pub trait Action: Send + Sync + 'static {
    /// Declares the optional procedures this action implements.
    fn capabilities(&self) -> Capabilities {
        Capabilities::new()
    }

    /// Handles one invocation.
    async fn on_message(&self, signal: &mut Signal, router: &Router) -> ActionResult;

    /// Explains usage of this action. Called by `explain <name>`.
    async fn on_help(&self, _message: &dyn Message) -> ActionResult {
        Ok(())
    }

    /// Runs once at startup, before any message is dispatched.
    async fn on_start(&self, _router: &Router) -> ActionResult {
        Ok(())
    }

    /// Runs once when the process receives a termination signal.
    async fn on_shutdown(&self, _router: &Router) -> ActionResult {
        Ok(())
    }
}
