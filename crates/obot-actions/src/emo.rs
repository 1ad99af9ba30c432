//! `emo <e1> + <e2>`: mash up two emojis.
//!
//! The mashup service takes two codepoint codes as `first` and `second`
//! query parameters and answers with an image. Which emojis are supported,
//! and their codes, comes from configuration:
//!
//! ```toml
//! [actions.emo]
//! endpoint = "https://example.com/api/mashup"
//! map_file = "emlist.json"
//!
//! [actions.emo.codes]
//! "🥳" = "u1f973"
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use obot_core::{Message, Outgoing, Signal};
use obot_framework::{Action, ActionResult, Capabilities, Router};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{SetupError, SetupResult};
use crate::http::{parse_endpoint, with_params};

/// Rows in the help listing.
const HELP_ROWS: usize = 9;

/// `[actions.emo]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmoConfig {
    /// Mashup service URL. Without it every request fails.
    pub endpoint: Option<String>,

    /// JSON object of emoji → code, merged under `codes`.
    pub map_file: Option<PathBuf>,

    /// Inline emoji → code entries; these win over `map_file`.
    pub codes: BTreeMap<String, String>,
}

/// Supported emojis and their service codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmojiTable {
    codes: BTreeMap<String, String>,
}

impl EmojiTable {
    pub fn new(codes: BTreeMap<String, String>) -> Self {
        Self { codes }
    }

    /// Builds the table from `map_file` (if any) overlaid with `codes`.
    pub fn from_config(config: &EmoConfig) -> SetupResult<Self> {
        let mut codes = match &config.map_file {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| SetupError::EmojiMap {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
                serde_json::from_str::<BTreeMap<String, String>>(&raw).map_err(|e| {
                    SetupError::EmojiMap {
                        path: path.clone(),
                        reason: e.to_string(),
                    }
                })?
            }
            None => BTreeMap::new(),
        };
        codes.extend(config.codes.clone());
        Ok(Self { codes })
    }

    pub fn code(&self, emoji: &str) -> Option<&str> {
        self.codes.get(emoji).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Splits the emojis into at most [`HELP_ROWS`] rows of equal length
    /// (the last may be shorter), two spaces apart.
    pub fn rows(&self) -> Vec<String> {
        if self.codes.is_empty() {
            return Vec::new();
        }
        let per_row = self.codes.len().div_ceil(HELP_ROWS);
        let emojis: Vec<&str> = self.codes.keys().map(String::as_str).collect();
        emojis.chunks(per_row).map(|row| row.join("  ")).collect()
    }
}

/// A validated `<e1> + <e2>` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mashup<'a> {
    pub first: &'a str,
    pub second: &'a str,
}

/// Why an expression was rejected. Displays as the reply sent to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    Invalid(String),
    LeftOperand(String),
    RightOperand(String),
    Unsupported(String),
    SameEmoji,
}

impl std::fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(args) => write!(f, "Invalid expression \"{args}\""),
            Self::LeftOperand(op) => write!(f, "Invalid left operand \"{op}\""),
            Self::RightOperand(op) => write!(f, "Invalid right operand \"{op}\""),
            Self::Unsupported(op) => write!(f, "Unsupported sequence/character \"{op}\""),
            Self::SameEmoji => f.write_str("Cannot combine same emojis"),
        }
    }
}

fn is_single_char(operand: &str) -> bool {
    let mut chars = operand.chars();
    chars.next().is_some() && chars.next().is_none()
}

/// Validates `args` against `table` and resolves both operands to codes.
pub fn parse_expression<'t>(
    args: &str,
    table: &'t EmojiTable,
) -> Result<Mashup<'t>, ExpressionError> {
    let operands: Vec<&str> = args.split('+').collect();
    let [left, right] = operands.as_slice() else {
        return Err(ExpressionError::Invalid(args.to_string()));
    };
    let (left, right) = (left.trim(), right.trim());

    if !is_single_char(left) {
        return Err(ExpressionError::LeftOperand(left.to_string()));
    }
    if !is_single_char(right) {
        return Err(ExpressionError::RightOperand(right.to_string()));
    }

    let first = table
        .code(left)
        .ok_or_else(|| ExpressionError::Unsupported(left.to_string()))?;
    let second = table
        .code(right)
        .ok_or_else(|| ExpressionError::Unsupported(right.to_string()))?;

    if left == right {
        return Err(ExpressionError::SameEmoji);
    }

    Ok(Mashup { first, second })
}

pub struct Emo {
    client: Client,
    endpoint: Option<Url>,
    table: EmojiTable,
    prefix: String,
}

impl Emo {
    pub fn new(client: Client, config: EmoConfig, prefix: &str) -> SetupResult<Self> {
        let endpoint = config.endpoint.as_deref().map(parse_endpoint).transpose()?;
        Ok(Self {
            client,
            endpoint,
            table: EmojiTable::from_config(&config)?,
            prefix: prefix.to_string(),
        })
    }

    pub fn table(&self) -> &EmojiTable {
        &self.table
    }
}

#[async_trait]
impl Action for Emo {
    fn capabilities(&self) -> Capabilities {
        Capabilities::new().with_help().with_start()
    }

    async fn on_message(&self, signal: &mut Signal, _router: &Router) -> ActionResult {
        let mashup = match parse_expression(signal.args(), &self.table) {
            Ok(mashup) => mashup,
            Err(e) => {
                signal.channel().send_text(&e.to_string()).await?;
                return Ok(());
            }
        };

        let Some(endpoint) = &self.endpoint else {
            signal.failure("Mashup endpoint is not configured");
            return Ok(());
        };

        let url = with_params(endpoint, [("first", mashup.first), ("second", mashup.second)]);
        debug!(first = mashup.first, second = mashup.second, "Requesting mashup");
        let response = self.client.get(url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let image = response.bytes().await?;
                let name = format!("{}_{}.png", mashup.first, mashup.second);
                signal
                    .channel()
                    .send(Outgoing::attachment(name, image.to_vec()))
                    .await?;
                signal.success("Sent mashed-up emoji");
            }
            StatusCode::BAD_REQUEST => signal.failure("Query params not supplied properly"),
            StatusCode::NOT_FOUND => signal.failure("Failed to fetch mashed-up emoji"),
            other => signal.failure(format!("Mashup service answered with status {other}")),
        }
        Ok(())
    }

    async fn on_help(&self, message: &dyn Message) -> ActionResult {
        let mut lines = vec![
            "Combine two emojis".to_string(),
            format!("Action command format is ``{} emo <emoji1> + <emoji2>``", self.prefix),
            format!("Example: ``{} emo 🥳 + 🥵``", self.prefix),
            "Supported emojis are:".to_string(),
        ];
        lines.extend(self.table.rows());
        message.channel().send_text(&lines.join("\n")).await?;
        Ok(())
    }

    async fn on_start(&self, _router: &Router) -> ActionResult {
        if self.endpoint.is_none() {
            warn!("emo has no endpoint configured; mashups will fail");
        }
        if self.table.is_empty() {
            warn!("emo has an empty emoji table; every operand will be unsupported");
        }
        info!(emojis = self.table.len(), "Emoji table ready");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::signal;

    fn table() -> EmojiTable {
        EmojiTable::new(BTreeMap::from([
            ("🥳".to_string(), "u1f973".to_string()),
            ("🥵".to_string(), "u1f975".to_string()),
            ("😀".to_string(), "u1f600".to_string()),
        ]))
    }

    #[test]
    fn test_parse_valid_expression() {
        let table = table();
        assert_eq!(
            parse_expression(" 🥳 +🥵 ", &table),
            Ok(Mashup {
                first: "u1f973",
                second: "u1f975"
            })
        );
    }

    #[test]
    fn test_parse_rejections() {
        let table = table();
        let reply = |args: &str| parse_expression(args, &table).unwrap_err().to_string();

        assert_eq!(reply("🥳 🥵"), "Invalid expression \"🥳 🥵\"");
        assert_eq!(reply("🥳 + 🥵 + 😀"), "Invalid expression \"🥳 + 🥵 + 😀\"");
        assert_eq!(reply("ab + 🥵"), "Invalid left operand \"ab\"");
        assert_eq!(reply(" + 🥵"), "Invalid left operand \"\"");
        assert_eq!(reply("🥳 + 🥵🥵"), "Invalid right operand \"🥵🥵\"");
        assert_eq!(reply("x + 🥵"), "Unsupported sequence/character \"x\"");
        assert_eq!(reply("🥳 + 🥳"), "Cannot combine same emojis");
    }

    #[test]
    fn test_inline_codes_override_map_file() {
        let path = std::env::temp_dir().join(format!("obot-emlist-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "🥳": "from-file", "🥵": "u1f975" }"#).unwrap();

        let config = EmoConfig {
            map_file: Some(path.clone()),
            codes: BTreeMap::from([("🥳".to_string(), "u1f973".to_string())]),
            ..Default::default()
        };
        let table = EmojiTable::from_config(&config).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(table.code("🥳"), Some("u1f973"));
        assert_eq!(table.code("🥵"), Some("u1f975"));
    }

    #[test]
    fn test_missing_map_file() {
        let config = EmoConfig {
            map_file: Some("/no/such/emlist.json".into()),
            ..Default::default()
        };
        assert!(matches!(
            EmojiTable::from_config(&config),
            Err(SetupError::EmojiMap { .. })
        ));
    }

    #[test]
    fn test_rows_cover_every_emoji() {
        let codes = (0..20)
            .map(|i| (char::from(b'a' + i).to_string(), format!("c{i}")))
            .collect();
        let rows = EmojiTable::new(codes).rows();

        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0], "a  b  c");
        assert_eq!(rows[6], "s  t");
    }

    #[tokio::test]
    async fn test_invalid_expression_is_replied() {
        let emo = Emo::new(Client::new(), EmoConfig::default(), "ob").unwrap();
        let (mut signal, recorder) = signal("🥳");

        emo.on_message(&mut signal, &Router::new()).await.unwrap();

        assert_eq!(recorder.texts(), vec!["Invalid expression \"🥳\""]);
        assert!(signal.logs().is_empty());
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_a_failure_outcome() {
        let config = EmoConfig {
            codes: table().codes,
            ..Default::default()
        };
        let emo = Emo::new(Client::new(), config, "ob").unwrap();
        let (mut signal, recorder) = signal("🥳 + 🥵");

        emo.on_message(&mut signal, &Router::new()).await.unwrap();

        assert!(recorder.texts().is_empty());
        assert_eq!(signal.logs().len(), 1);
        assert_eq!(signal.logs()[0].message(), "Mashup endpoint is not configured");
    }

    #[tokio::test]
    async fn test_help_lists_emojis() {
        let config = EmoConfig {
            codes: table().codes,
            ..Default::default()
        };
        let emo = Emo::new(Client::new(), config, "ob").unwrap();
        let (signal, recorder) = signal("");

        emo.on_help(signal.message()).await.unwrap();

        assert_eq!(
            recorder.texts(),
            vec![
                "Combine two emojis\n\
                 Action command format is ``ob emo <emoji1> + <emoji2>``\n\
                 Example: ``ob emo 🥳 + 🥵``\n\
                 Supported emojis are:\n\
                 😀\n🥳\n🥵"
            ]
        );
    }
}
