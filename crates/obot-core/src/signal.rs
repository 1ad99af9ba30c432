//! Per-invocation context handed to an action.

use std::fmt;
use std::mem;

use crate::outcome::Outcome;
use crate::platform::{BoxedClient, BoxedMessage, Channel, Message};

/// Context for one dispatched command.
///
/// A `Signal` is created fresh for every message the router dispatches and
/// dropped once its outcome log has been drained. It bundles the platform
/// client, the triggering message, the argument text that followed the
/// command name, and a private log the action appends [`Outcome`]s to.
pub struct Signal {
    client: BoxedClient,
    message: BoxedMessage,
    args: String,
    logs: Vec<Outcome>,
}

impl Signal {
    /// Creates a signal with an empty outcome log.
    pub fn new(client: BoxedClient, message: BoxedMessage, args: impl Into<String>) -> Self {
        Self {
            client,
            message,
            args: args.into(),
            logs: Vec::new(),
        }
    }

    /// Returns the platform client.
    pub fn client(&self) -> &BoxedClient {
        &self.client
    }

    /// Returns the message that triggered this invocation.
    pub fn message(&self) -> &dyn Message {
        self.message.as_ref()
    }

    /// Returns a shared handle to the triggering message.
    pub fn message_handle(&self) -> &BoxedMessage {
        &self.message
    }

    /// Returns the channel the triggering message arrived on.
    pub fn channel(&self) -> &dyn Channel {
        self.message.channel()
    }

    /// Returns the text after the command name, with leading separators
    /// removed and trailing text untouched.
    pub fn args(&self) -> &str {
        &self.args
    }

    /// Appends an outcome to the log.
    pub fn push(&mut self, outcome: Outcome) {
        self.logs.push(outcome);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Outcome::success(message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Outcome::warning(message));
    }

    pub fn failure(&mut self, message: impl Into<String>) {
        self.push(Outcome::failure(message));
    }

    /// Returns the outcomes recorded so far.
    pub fn logs(&self) -> &[Outcome] {
        &self.logs
    }

    /// Takes all recorded outcomes, leaving the log empty.
    pub fn drain_logs(&mut self) -> Vec<Outcome> {
        mem::take(&mut self.logs)
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("client", &self.client.id())
            .field("message", &self.message.id())
            .field("args", &self.args)
            .field("logs", &self.logs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlatformResult;
    use crate::outcome::OutcomeKind;
    use crate::platform::{Client, Outgoing};
    use async_trait::async_trait;
    use std::any::Any;
    use std::sync::Arc;

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

    struct NullChannel;

    #[async_trait]
    impl Channel for NullChannel {
        fn id(&self) -> &str {
            "general"
        }

        async fn send(&self, _content: Outgoing) -> PlatformResult<()> {
            Ok(())
        }
    }

    struct NullMessage {
        channel: NullChannel,
    }

    #[async_trait]
    impl Message for NullMessage {
        fn id(&self) -> &str {
            "m1"
        }

        fn content(&self) -> &str {
            "ob inspiro"
        }

        fn author(&self) -> &str {
            "alice"
        }

        fn channel(&self) -> &dyn Channel {
            &self.channel
        }

        async fn reply(&self, _text: &str) -> PlatformResult<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn signal(args: &str) -> Signal {
        Signal::new(
            Arc::new(NullClient),
            Arc::new(NullMessage {
                channel: NullChannel,
            }),
            args,
        )
    }

    #[test]
    fn test_accessors() {
        let signal = signal("today");
        assert_eq!(signal.args(), "today");
        assert_eq!(signal.client().id(), "bot");
        assert_eq!(signal.message().author(), "alice");
        assert_eq!(signal.channel().id(), "general");
        assert!(signal.logs().is_empty());
    }

    #[test]
    fn test_logs_keep_order_and_drain() {
        let mut signal = signal("");
        signal.success("sent");
        signal.warning("slow");
        signal.failure("gave up");

        let kinds: Vec<_> = signal.logs().iter().map(Outcome::kind).collect();
        assert_eq!(
            kinds,
            vec![OutcomeKind::Success, OutcomeKind::Warning, OutcomeKind::Failure]
        );

        let drained = signal.drain_logs();
        assert_eq!(drained.len(), 3);
        assert!(signal.logs().is_empty());
    }

    #[tokio::test]
    async fn test_channel_send_text_default() {
        let signal = signal("");
        assert!(signal.channel().send_text("hello").await.is_ok());
    }
}
