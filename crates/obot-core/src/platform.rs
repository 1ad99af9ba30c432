//! Chat-platform collaborator traits.
//!
//! The router never talks to a concrete platform. An [`Adapter`] connects
//! and hands back a [`Connection`]: a [`Client`] handle plus a stream of
//! inbound [`Message`]s. Actions reply through the message handle or its
//! [`Channel`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;

use crate::error::PlatformResult;

/// Content sent to a channel.
#[derive(Clone, PartialEq, Eq)]
pub enum Outgoing {
    /// Plain text.
    Text(String),
    /// A binary file such as an image.
    Attachment {
        /// File name shown by the platform.
        name: String,
        /// Raw file contents.
        data: Vec<u8>,
    },
}

impl Outgoing {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn attachment(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::Attachment {
            name: name.into(),
            data: data.into(),
        }
    }
}

impl fmt::Debug for Outgoing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Attachment { name, data } => f
                .debug_struct("Attachment")
                .field("name", name)
                .field("len", &data.len())
                .finish(),
        }
    }
}

/// The connected platform client.
pub trait Client: Send + Sync + 'static {
    /// Returns the identifier of the logged-in bot account.
    fn id(&self) -> &str;

    /// Returns a short platform name, e.g. `"console"`.
    fn platform(&self) -> &'static str;

    /// Returns self as an `Arc<dyn Any>` so actions can downcast to the
    /// concrete client when they need platform-specific calls.
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A place messages can be sent to.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Returns the channel identifier.
    fn id(&self) -> &str;

    /// Sends text or an attachment to this channel.
    async fn send(&self, content: Outgoing) -> PlatformResult<()>;

    /// Sends plain text to this channel.
    async fn send_text(&self, text: &str) -> PlatformResult<()> {
        self.send(Outgoing::text(text)).await
    }
}

/// An inbound text message.
#[async_trait]
pub trait Message: Send + Sync + 'static {
    /// Returns the platform message identifier.
    fn id(&self) -> &str;

    /// Returns the raw text content.
    fn content(&self) -> &str;

    /// Returns an identifier for the sender.
    fn author(&self) -> &str;

    /// Returns the channel the message arrived on.
    fn channel(&self) -> &dyn Channel;

    /// Replies to this message.
    async fn reply(&self, text: &str) -> PlatformResult<()>;

    /// Returns self as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// A shared client handle.
pub type BoxedClient = Arc<dyn Client>;

/// A shared inbound message handle.
pub type BoxedMessage = Arc<dyn Message>;

/// A live platform connection.
pub struct Connection {
    /// The connected client.
    pub client: BoxedClient,
    /// Inbound text messages, in arrival order. The stream ends when the
    /// platform connection closes.
    pub inbound: mpsc::Receiver<BoxedMessage>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("client", &self.client.id())
            .field("platform", &self.client.platform())
            .finish_non_exhaustive()
    }
}

/// Connects to a chat platform.
#[async_trait]
pub trait Adapter: Send + Sync + 'static {
    /// Returns the adapter name used in logs.
    fn name(&self) -> &'static str;

    /// Establishes the connection and starts delivering inbound messages.
    ///
    /// `buffer` is the capacity of the inbound channel.
    async fn connect(&self, buffer: usize) -> PlatformResult<Connection>;

    /// Tears the connection down. Called once at shutdown.
    async fn disconnect(&self) -> PlatformResult<()> {
        Ok(())
    }
}

/// A boxed adapter.
pub type BoxedAdapter = Box<dyn Adapter>;

/// An adapter that can be built from its own configuration section.
///
/// The runtime looks the section up under `adapters.<NAME>` and falls back to
/// `Config::default()` when it is absent.
pub trait ConfigurableAdapter: Adapter + Sized {
    /// Configuration type for this adapter.
    type Config: DeserializeOwned + Default + Send;

    /// Name of the configuration section.
    const NAME: &'static str;

    /// Builds the adapter from its configuration.
    fn from_config(config: Self::Config) -> PlatformResult<Self>;
}
