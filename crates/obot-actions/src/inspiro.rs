//! `inspiro`: AI generated inspirational quotes.

use async_trait::async_trait;
use obot_core::{Message, Signal};
use obot_framework::{Action, ActionResult, Capabilities, Router};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SetupResult;
use crate::http::parse_endpoint;

/// `[actions.inspiro]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspiroConfig {
    /// Returns a freshly generated image link as plain text.
    pub endpoint: String,
}

impl Default for InspiroConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://inspirobot.me/api?generate=true".to_string(),
        }
    }
}

pub struct Inspiro {
    client: Client,
    endpoint: Url,
    prefix: String,
}

impl Inspiro {
    pub fn new(client: Client, config: InspiroConfig, prefix: &str) -> SetupResult<Self> {
        Ok(Self {
            client,
            endpoint: parse_endpoint(&config.endpoint)?,
            prefix: prefix.to_string(),
        })
    }
}

#[async_trait]
impl Action for Inspiro {
    fn capabilities(&self) -> Capabilities {
        Capabilities::new().with_help()
    }

    async fn on_message(&self, signal: &mut Signal, _router: &Router) -> ActionResult {
        let response = self.client.get(self.endpoint.clone()).send().await?;
        if response.status() != StatusCode::OK {
            debug!(status = %response.status(), "Quote generator refused");
            signal.failure("Failed to get link for inspirobot");
            return Ok(());
        }

        let link = response.text().await?;
        signal.channel().send_text(link.trim()).await?;
        signal.success("Sent inspirobot link");
        Ok(())
    }

    async fn on_help(&self, message: &dyn Message) -> ActionResult {
        let text = format!(
            "Write ``{} inspiro`` to show AI generated inspirational quotes",
            self.prefix
        );
        message.channel().send_text(&text).await?;
        Ok(())
    }
}
