//! Console client, channel, and message types.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use obot_core::{Channel, Client, Message, Outgoing, PlatformResult};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::trace;

pub(crate) type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Shared line writer. Each line is written and flushed under the lock so
/// concurrent dispatches never interleave within a line.
#[derive(Clone)]
pub(crate) struct Output {
    writer: Arc<Mutex<BoxedWriter>>,
}

impl Output {
    pub(crate) fn new(writer: BoxedWriter) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
        }
    }

    pub(crate) async fn write_line(&self, line: &str) -> PlatformResult<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }

    pub(crate) async fn flush(&self) -> PlatformResult<()> {
        self.writer.lock().await.flush().await?;
        Ok(())
    }
}

/// The console "account".
pub struct ConsoleClient {
    id: String,
}

impl ConsoleClient {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Client for ConsoleClient {
    fn id(&self) -> &str {
        &self.id
    }

    fn platform(&self) -> &'static str {
        "console"
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Writes channel sends to the output as-is.
pub struct ConsoleChannel {
    id: String,
    output: Output,
}

impl ConsoleChannel {
    pub(crate) fn new(id: impl Into<String>, output: Output) -> Self {
        Self {
            id: id.into(),
            output,
        }
    }
}

#[async_trait]
impl Channel for ConsoleChannel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn send(&self, content: Outgoing) -> PlatformResult<()> {
        match content {
            Outgoing::Text(text) => self.output.write_line(&text).await,
            Outgoing::Attachment { name, data } => {
                trace!(channel = %self.id, name = %name, len = data.len(), "Rendering attachment");
                let line = format!("[attachment {name}, {} bytes]", data.len());
                self.output.write_line(&line).await
            }
        }
    }
}

/// One input line.
pub struct ConsoleMessage {
    id: String,
    content: String,
    author: String,
    channel: ConsoleChannel,
}

impl ConsoleMessage {
    pub(crate) fn new(id: u64, content: String, author: String, channel: ConsoleChannel) -> Self {
        Self {
            id: id.to_string(),
            content,
            author,
            channel,
        }
    }
}

#[async_trait]
impl Message for ConsoleMessage {
    fn id(&self) -> &str {
        &self.id
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn author(&self) -> &str {
        &self.author
    }

    fn channel(&self) -> &dyn Channel {
        &self.channel
    }

    async fn reply(&self, text: &str) -> PlatformResult<()> {
        let line = format!("@{} {}", self.author, text);
        self.channel.output.write_line(&line).await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
