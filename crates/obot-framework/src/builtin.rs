//! Built-in meta actions registered on every [`Router`]: `help` and `explain`.

use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::FutureExt;
use obot_core::{Message, Signal};
use tracing::warn;

use crate::action::{Action, ActionResult, Capabilities};
use crate::router::{Router, panic_message};

/// Renders the listing sent by `help`.
pub fn render_help(router: &Router) -> String {
    let prefix = &router.options().prefix;
    let mut lines = vec![
        format!("Write ``{prefix} <action_name> <...arguments>`` to call your desired action"),
        "Or ``<action_shortcut> <...arguments>`` (If shortcut is available)".to_string(),
    ];

    let actions = router.list_actions();
    if !actions.is_empty() {
        lines.push("\nAvailable actions are:".to_string());
        for (i, info) in actions.iter().enumerate() {
            let shortcut = info
                .shortcut
                .as_deref()
                .map(|s| format!(" (shortcut: {s})"))
                .unwrap_or_default();
            lines.push(format!(
                "{}. **{}{}:** *{}*",
                i + 1,
                info.name,
                shortcut,
                info.description_or_placeholder()
            ));
        }
    }

    lines.join("\n")
}

/// `help`: lists every registered action.
pub(crate) struct Help {
    prefix: String,
}

impl Help {
    pub(crate) fn new(prefix: String) -> Self {
        Self { prefix }
    }
}

#[async_trait]
impl Action for Help {
    fn capabilities(&self) -> Capabilities {
        Capabilities::new().with_help()
    }

    async fn on_message(&self, signal: &mut Signal, router: &Router) -> ActionResult {
        signal.channel().send_text(&render_help(router)).await?;
        signal.success("Sent action listing");
        Ok(())
    }

    async fn on_help(&self, message: &dyn Message) -> ActionResult {
        let text = format!(
            "Are you really trying to get explanation for **help**?\n\
             Just write ``{} help``, it's self-explanatory.",
            self.prefix
        );
        message.channel().send_text(&text).await?;
        Ok(())
    }
}

/// `explain <action>`: runs the named action's help procedure.
pub(crate) struct Explain {
    prefix: String,
}

impl Explain {
    pub(crate) fn new(prefix: String) -> Self {
        Self { prefix }
    }
}

#[async_trait]
impl Action for Explain {
    fn capabilities(&self) -> Capabilities {
        Capabilities::new().with_help()
    }

    async fn on_message(&self, signal: &mut Signal, router: &Router) -> ActionResult {
        let name = signal.args().trim().to_string();

        match router.find_action(&name) {
            Some(entry) if entry.has_help() => {
                let result = AssertUnwindSafe(entry.action().on_help(signal.message()))
                    .catch_unwind()
                    .await;
                match result {
                    Ok(Ok(())) => signal.success(format!("Explained \"{}\"", entry.name())),
                    Ok(Err(e)) => {
                        warn!(action = %entry.name(), error = %e, "Failure executing help procedure");
                        signal.warning(format!("Help for \"{}\" failed: {e}", entry.name()));
                    }
                    Err(payload) => {
                        let cause = panic_message(payload.as_ref());
                        warn!(action = %entry.name(), cause = %cause, "Help procedure panicked");
                        signal.warning(format!("Help for \"{}\" panicked: {cause}", entry.name()));
                    }
                }
            }
            Some(entry) => {
                let text = format!("The action \"{}\" doesn't come with a help", entry.name());
                signal.channel().send_text(&text).await?;
            }
            None => {
                let text = format!("Non-existent action \"{name}\"");
                signal.channel().send_text(&text).await?;
            }
        }
        Ok(())
    }

    async fn on_help(&self, message: &dyn Message) -> ActionResult {
        let text = format!(
            "Write ``{} explain <action_name>`` to show help for that action",
            self.prefix
        );
        message.channel().send_text(&text).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::DispatchStatus;
    use crate::testing::{MockMessage, mock_client};
    use obot_core::Outgoing;
    use tokio_test::assert_ok;

    struct Quiet;

    #[async_trait]
    impl Action for Quiet {
        async fn on_message(&self, _signal: &mut Signal, _router: &Router) -> ActionResult {
            Ok(())
        }
    }

    struct Documented;

    #[async_trait]
    impl Action for Documented {
        fn capabilities(&self) -> Capabilities {
            Capabilities::new().with_help()
        }

        async fn on_message(&self, _signal: &mut Signal, _router: &Router) -> ActionResult {
            Ok(())
        }

        async fn on_help(&self, message: &dyn Message) -> ActionResult {
            message.channel().send_text("Documented usage").await?;
            Ok(())
        }
    }

    struct BrokenHelp;

    #[async_trait]
    impl Action for BrokenHelp {
        fn capabilities(&self) -> Capabilities {
            Capabilities::new().with_help()
        }

        async fn on_message(&self, _signal: &mut Signal, _router: &Router) -> ActionResult {
            Ok(())
        }

        async fn on_help(&self, _message: &dyn Message) -> ActionResult {
            Err("help text missing".into())
        }
    }

    fn router() -> Router {
        let mut router = Router::new();
        assert_ok!(router.register("inspiro", Documented, Some("AI generated inspirational quotes")));
        assert_ok!(router.register("emo", Quiet, Some("Mash up two emojis")));
        assert_ok!(router.register("nasa", BrokenHelp, None));
        assert_ok!(router.bind_shortcut("ainspire", "inspiro"));
        router
    }

    #[test]
    fn test_render_help_lists_each_action_once() {
        let text = render_help(&router());
        let expected = "Write ``ob <action_name> <...arguments>`` to call your desired action\n\
             Or ``<action_shortcut> <...arguments>`` (If shortcut is available)\n\
             \n\
             Available actions are:\n\
             1. **help:** *Displays this message*\n\
             2. **explain:** *Shows help message specific to an action*\n\
             3. **inspiro (shortcut: ainspire):** *AI generated inspirational quotes*\n\
             4. **emo:** *Mash up two emojis*\n\
             5. **nasa:** *<No Description>*";
        assert_eq!(text, expected);
    }

    #[tokio::test]
    async fn test_help_dispatch_sends_listing() {
        let router = router();
        let message = MockMessage::new("ob help");

        let status = router.dispatch(mock_client(), message.clone()).await;

        assert_eq!(
            status,
            DispatchStatus::Completed {
                action: "help".into(),
                outcomes: 1
            }
        );
        assert_eq!(message.sent(), vec![Outgoing::text(render_help(&router))]);
    }

    #[tokio::test]
    async fn test_explain_runs_help_procedure() {
        let router = router();
        let message = MockMessage::new("ob explain inspiro");

        router.dispatch(mock_client(), message.clone()).await;

        assert_eq!(message.sent_texts(), vec!["Documented usage"]);
    }

    #[tokio::test]
    async fn test_explain_without_help() {
        let router = router();
        let message = MockMessage::new("ob explain emo");

        router.dispatch(mock_client(), message.clone()).await;

        assert_eq!(
            message.sent_texts(),
            vec!["The action \"emo\" doesn't come with a help"]
        );
    }

    #[tokio::test]
    async fn test_explain_unknown_action() {
        let router = router();
        let message = MockMessage::new("ob explain weather");

        router.dispatch(mock_client(), message.clone()).await;

        assert_eq!(message.sent_texts(), vec!["Non-existent action \"weather\""]);
    }

    #[tokio::test]
    async fn test_explain_swallows_help_failure() {
        let router = router();
        let message = MockMessage::new("ob explain nasa");

        let status = router.dispatch(mock_client(), message.clone()).await;

        assert_eq!(
            status,
            DispatchStatus::Completed {
                action: "explain".into(),
                outcomes: 1
            }
        );
        assert!(message.sent().is_empty());
    }

    #[tokio::test]
    async fn test_explain_explain() {
        let router = router();
        let message = MockMessage::new("ob explain explain");

        router.dispatch(mock_client(), message.clone()).await;

        assert_eq!(
            message.sent_texts(),
            vec!["Write ``ob explain <action_name>`` to show help for that action"]
        );
    }
}
