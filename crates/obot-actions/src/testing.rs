//! Recording message used by action tests.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use obot_core::{BoxedMessage, Channel, Client, Message, Outgoing, PlatformResult, Signal};
use parking_lot::Mutex;

struct NullClient;

impl Client for NullClient {
    fn id(&self) -> &str {
        "bot"
    }

    fn platform(&self) -> &'static str {
        "test"
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

#[derive(Default)]
pub(crate) struct RecordingChannel {
    sent: Mutex<Vec<Outgoing>>,
}

#[async_trait]
impl Channel for RecordingChannel {
    fn id(&self) -> &str {
        "channel"
    }

    async fn send(&self, content: Outgoing) -> PlatformResult<()> {
        self.sent.lock().push(content);
        Ok(())
    }
}

pub(crate) struct Recorder {
    content: String,
    channel: RecordingChannel,
}

impl Recorder {
    pub(crate) fn texts(&self) -> Vec<String> {
        self.channel
            .sent
            .lock()
            .iter()
            .filter_map(|content| match content {
                Outgoing::Text(text) => Some(text.clone()),
                Outgoing::Attachment { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl Message for Recorder {
    fn id(&self) -> &str {
        "1"
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
        self.channel.send_text(text).await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A signal carrying `args`, plus a handle to what the action sent.
pub(crate) fn signal(args: &str) -> (Signal, Arc<Recorder>) {
    let recorder = Arc::new(Recorder {
        content: args.to_string(),
        channel: RecordingChannel::default(),
    });
    let message: BoxedMessage = recorder.clone();
    (Signal::new(Arc::new(NullClient), message, args), recorder)
}
