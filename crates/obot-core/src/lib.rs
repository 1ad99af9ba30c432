//! # obot core
//!
//! Building blocks shared by every layer of the obot command router:
//!
//! - [`Lexer`]: forward-only whitespace tokenizer for command text
//! - [`Outcome`]: severity-tagged diagnostics recorded by actions
//! - [`Signal`]: the per-invocation context handed to an action
//! - [`platform`]: traits for the chat-platform collaborator

pub mod error;
pub mod lexer;
pub mod outcome;
pub mod platform;
pub mod signal;

pub use error::{BoxError, PlatformError, PlatformResult};
pub use lexer::{Lexer, is_separator};
pub use outcome::{Outcome, OutcomeKind};
pub use platform::{
    Adapter, BoxedAdapter, BoxedClient, BoxedMessage, Channel, Client, ConfigurableAdapter,
    Connection, Message, Outgoing,
};
pub use signal::Signal;
