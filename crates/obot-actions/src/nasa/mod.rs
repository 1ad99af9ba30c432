//! `nasa [notext] [today | <date>]`: NASA Astronomy Picture Of the Day.
//!
//! ```text
//! ob nasa                     random day, retried on misses
//! ob nasa today               today's picture
//! ob nasa 4 Sep 2002          a given day
//! ob nasa notext 2013-07-03   link only
//! ```

mod date;
mod query;

pub use date::{DateError, FIRST_APOD, parse_date, random_date, validate_date};
pub use query::{ApodQuery, ApodTarget, parse_query};

use async_trait::async_trait;
use obot_core::{Message, Signal};
use obot_framework::{Action, ActionResult, Capabilities, Router};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use tracing::{debug, warn};

use crate::error::SetupResult;
use crate::http::{parse_endpoint, with_params};

const DEMO_KEY: &str = "DEMO_KEY";

/// `[actions.nasa]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NasaConfig {
    pub endpoint: String,

    /// api.nasa.gov key. `DEMO_KEY` works but is heavily rate limited.
    pub api_key: String,

    /// Fetch attempts for a random day before giving up.
    pub max_attempts: u32,
}

impl Default for NasaConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.nasa.gov/planetary/apod".to_string(),
            api_key: DEMO_KEY.to_string(),
            max_attempts: 10,
        }
    }
}

/// The subset of an APOD entry that gets posted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApodEntry {
    pub title: Option<String>,
    pub date: Option<String>,
    pub url: Option<String>,
    pub hdurl: Option<String>,
}

impl ApodEntry {
    /// The HD link when present, the regular one otherwise.
    pub fn link(&self) -> Option<&str> {
        self.hdurl.as_deref().or(self.url.as_deref())
    }

    /// Builds the reply text, or `None` if the entry has no link.
    ///
    /// `attempts` counts fetches including the one that found this entry;
    /// it is shown as `(Retries: n)` only when more than one was needed.
    pub fn render(&self, notext: bool, attempts: u32) -> Option<String> {
        let link = self.link()?;
        let mut lines = Vec::new();
        if !notext {
            if let Some(title) = &self.title {
                lines.push(format!("*{title}*"));
            }
            if let Some(date) = &self.date {
                lines.push(format!("Date: {date}"));
            }
            if attempts > 1 {
                lines.push(format!("(Retries: {attempts})"));
            }
        }
        lines.push(link.to_string());
        Some(lines.join("\n"))
    }
}

pub struct Nasa {
    client: Client,
    endpoint: Url,
    api_key: String,
    max_attempts: u32,
    prefix: String,
}

impl Nasa {
    pub fn new(client: Client, config: NasaConfig, prefix: &str) -> SetupResult<Self> {
        Ok(Self {
            client,
            endpoint: parse_endpoint(&config.endpoint)?,
            api_key: config.api_key,
            max_attempts: config.max_attempts.max(1),
            prefix: prefix.to_string(),
        })
    }

    /// Fetches one entry. Any transport error, non-200 status or
    /// unreadable body counts as a miss.
    async fn fetch(&self, date: Option<Date>) -> Option<ApodEntry> {
        let date = date.map(|d| d.to_string());
        let mut params = vec![("api_key", self.api_key.as_str())];
        if let Some(date) = &date {
            params.push(("date", date.as_str()));
        }
        let url = with_params(&self.endpoint, params);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(date = ?date, error = %e, "APOD request failed");
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            debug!(date = ?date, status = %response.status(), "No APOD entry");
            return None;
        }

        match response.json::<ApodEntry>().await {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(date = ?date, error = %e, "Unreadable APOD entry");
                None
            }
        }
    }

    /// Tries random days until one hits. Returns the entry and the number
    /// of attempts it took.
    async fn fetch_random(&self, today: Date) -> Option<(ApodEntry, u32)> {
        for attempt in 1..=self.max_attempts {
            let date = random_date(today, &mut rand::thread_rng());
            if let Some(entry) = self.fetch(Some(date)).await {
                return Some((entry, attempt));
            }
        }
        None
    }

    async fn post(
        &self,
        signal: &mut Signal,
        entry: &ApodEntry,
        notext: bool,
        attempts: u32,
    ) -> ActionResult {
        let Some(text) = entry.render(notext, attempts) else {
            signal.failure("200 status code but there is no link");
            return Ok(());
        };
        signal.channel().send_text(&text).await?;
        signal.success(format!(
            "Sent APOD for {}",
            entry.date.as_deref().unwrap_or("unknown date")
        ));
        Ok(())
    }
}

fn alerted(router: &Router, text: &str) -> String {
    let alert = &router.options().alert;
    if alert.is_empty() {
        text.to_string()
    } else {
        format!("{alert} {text}")
    }
}

#[async_trait]
impl Action for Nasa {
    fn capabilities(&self) -> Capabilities {
        Capabilities::new().with_help().with_start()
    }

    async fn on_message(&self, signal: &mut Signal, router: &Router) -> ActionResult {
        let query = parse_query(signal.args());
        let today = OffsetDateTime::now_utc().date();

        match query.target {
            ApodTarget::Random => match self.fetch_random(today).await {
                Some((entry, attempts)) => self.post(signal, &entry, query.notext, attempts).await?,
                None => {
                    let text = alerted(router, "Failed to get any images even after maximum retries");
                    signal.channel().send_text(&text).await?;
                }
            },
            ApodTarget::Today => match self.fetch(None).await {
                Some(entry) => self.post(signal, &entry, query.notext, 1).await?,
                None => {
                    let text = alerted(router, "No image/video for today");
                    signal.channel().send_text(&text).await?;
                }
            },
            ApodTarget::Date(input) => match validate_date(&input, today) {
                Ok(date) => match self.fetch(Some(date)).await {
                    Some(entry) => self.post(signal, &entry, query.notext, 1).await?,
                    None => {
                        let text = alerted(router, &format!("No image/video for date {date}"));
                        signal.channel().send_text(&text).await?;
                    }
                },
                Err(e) => signal.channel().send_text(&e.to_string()).await?,
            },
        }
        Ok(())
    }

    async fn on_help(&self, message: &dyn Message) -> ActionResult {
        let p = &self.prefix;
        let text = [
            "Show images/videos from NASA's Astronomy Picture of the Day".to_string(),
            format!("Action command format is ``{p} nasa <notext?> <\"today\" or any date>``"),
            "```bash".to_string(),
            "Examples:".to_string(),
            format!("{p} nasa"),
            format!("{p} nasa notext"),
            format!("{p} nasa today"),
            format!("{p} nasa notext today"),
            format!("{p} nasa 2013-07-03"),
            format!("{p} nasa 4 Sep 2002"),
            format!("{p} nasa notext 2013-07-03"),
            format!("{p} nasa notext 4 Sep 2002```"),
            "**notext** is optional, use this to hide title from image".to_string(),
            "**today** shows today's image".to_string(),
            "Date range is from Jun 18 1995 to today".to_string(),
            "By default, it shows random image".to_string(),
        ]
        .join("\n");
        message.channel().send_text(&text).await?;
        Ok(())
    }

    async fn on_start(&self, _router: &Router) -> ActionResult {
        if self.api_key == DEMO_KEY {
            warn!("No NASA API key configured, using the rate-limited DEMO_KEY");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::signal;

    fn entry() -> ApodEntry {
        ApodEntry {
            title: Some("Saturn at Night".into()),
            date: Some("2013-07-03".into()),
            url: Some("https://apod.nasa.gov/small.jpg".into()),
            hdurl: Some("https://apod.nasa.gov/big.jpg".into()),
        }
    }

    #[test]
    fn test_render_full() {
        assert_eq!(
            entry().render(false, 1).as_deref(),
            Some("*Saturn at Night*\nDate: 2013-07-03\nhttps://apod.nasa.gov/big.jpg")
        );
    }

    #[test]
    fn test_render_with_retries() {
        // Second attempt hit: the attempt count is shown.
        assert_eq!(
            entry().render(false, 2).as_deref(),
            Some("*Saturn at Night*\nDate: 2013-07-03\n(Retries: 2)\nhttps://apod.nasa.gov/big.jpg")
        );
    }

    #[test]
    fn test_render_notext_falls_back_to_url() {
        let entry = ApodEntry {
            hdurl: None,
            ..entry()
        };
        assert_eq!(
            entry.render(true, 2).as_deref(),
            Some("https://apod.nasa.gov/small.jpg")
        );
    }

    #[test]
    fn test_render_without_link() {
        let entry = ApodEntry {
            title: Some("Video".into()),
            ..Default::default()
        };
        assert_eq!(entry.render(false, 1), None);
    }

    #[test]
    fn test_entry_deserialize_ignores_extra_fields() {
        let entry: ApodEntry = serde_json::from_str(
            r#"{ "title": "T", "date": "2002-09-04", "url": "u", "media_type": "image" }"#,
        )
        .unwrap();
        assert_eq!(entry.link(), Some("u"));
    }

    fn nasa() -> Nasa {
        Nasa::new(Client::new(), NasaConfig::default(), "ob").unwrap()
    }

    #[tokio::test]
    async fn test_invalid_date_is_replied() {
        let (mut signal, recorder) = signal("31 Feb 2002");

        nasa().on_message(&mut signal, &Router::new()).await.unwrap();

        assert_eq!(recorder.texts(), vec!["Invalid Date string \"31 Feb 2002\""]);
    }

    #[tokio::test]
    async fn test_out_of_range_is_replied() {
        let (mut signal, recorder) = signal("notext 1990-01-01");

        nasa().on_message(&mut signal, &Router::new()).await.unwrap();

        assert_eq!(recorder.texts(), vec!["Given date is out of range"]);
    }

    #[tokio::test]
    async fn test_help_uses_prefix() {
        let nasa = Nasa::new(Client::new(), NasaConfig::default(), "bot").unwrap();
        let (signal, recorder) = signal("");

        nasa.on_help(signal.message()).await.unwrap();

        let text = &recorder.texts()[0];
        assert!(text.starts_with("Show images/videos from NASA's Astronomy Picture of the Day\n"));
        assert!(text.contains("``bot nasa <notext?> <\"today\" or any date>``"));
        assert!(text.ends_with("By default, it shows random image"));
    }
}
