//! Recording platform mocks shared by the framework tests.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use obot_core::{
    BoxedClient, Channel, Client, Message, Outgoing, PlatformError, PlatformResult,
};
use parking_lot::Mutex;

pub(crate) struct MockClient;

impl Client for MockClient {
    fn id(&self) -> &str {
        "mock-bot"
    }

    fn platform(&self) -> &'static str {
        "mock"
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

pub(crate) fn mock_client() -> BoxedClient {
    Arc::new(MockClient)
}

#[derive(Default)]
pub(crate) struct MockChannel {
    sent: Mutex<Vec<Outgoing>>,
    fail: bool,
}

#[async_trait]
impl Channel for MockChannel {
    fn id(&self) -> &str {
        "mock-channel"
    }

    async fn send(&self, content: Outgoing) -> PlatformResult<()> {
        if self.fail {
            return Err(PlatformError::SendFailed("channel closed".into()));
        }
        self.sent.lock().push(content);
        Ok(())
    }
}

pub(crate) struct MockMessage {
    content: String,
    channel: MockChannel,
    replies: Mutex<Vec<String>>,
    fail: bool,
}

impl MockMessage {
    pub(crate) fn new(content: &str) -> Arc<Self> {
        Self::build(content, false)
    }

    /// A message whose replies and channel sends always fail.
    pub(crate) fn failing(content: &str) -> Arc<Self> {
        Self::build(content, true)
    }

    fn build(content: &str, fail: bool) -> Arc<Self> {
        Arc::new(Self {
            content: content.to_string(),
            channel: MockChannel {
                sent: Mutex::new(Vec::new()),
                fail,
            },
            replies: Mutex::new(Vec::new()),
            fail,
        })
    }

    pub(crate) fn replies(&self) -> Vec<String> {
        self.replies.lock().clone()
    }

    pub(crate) fn sent(&self) -> Vec<Outgoing> {
        self.channel.sent.lock().clone()
    }

    pub(crate) fn sent_texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|content| match content {
                Outgoing::Text(text) => Some(text),
                Outgoing::Attachment { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl Message for MockMessage {
    fn id(&self) -> &str {
        "mock-message"
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn author(&self) -> &str {
        "tester"
    }

    fn channel(&self) -> &dyn Channel {
        &self.channel
    }

    async fn reply(&self, text: &str) -> PlatformResult<()> {
        if self.fail {
            return Err(PlatformError::SendFailed("reply rejected".into()));
        }
        self.replies.lock().push(text.to_string());
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
