//! # obot framework
//!
//! Command routing on top of `obot-core`:
//!
//! - [`Action`]: the contract every pluggable command implements
//! - [`parse_command`]: classifies text as nothing, a rejected command, or an invocation
//! - [`Router`]: registry of actions and shortcuts, dispatcher, lifecycle hooks
//! - Built-in `help` and `explain` actions, registered on every router

pub mod action;
pub mod builtin;
pub mod error;
pub mod parse;
pub mod router;

#[cfg(test)]
pub(crate) mod testing;

pub use action::{Action, ActionResult, BoxedAction, Capabilities};
pub use builtin::render_help;
pub use error::RegistrationError;
pub use parse::{
    CommandTable, Invocation, InvocationKind, ParseFailure, ParsedCommand, parse_command,
};
pub use router::{ActionInfo, DispatchStatus, RegisteredAction, Router, RouterOptions};

// Re-exported so actions can be written without a direct dependency.
pub use async_trait::async_trait;
