//! Shared HTTP plumbing.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::{SetupError, SetupResult};

const USER_AGENT: &str = concat!("obot/", env!("CARGO_PKG_VERSION"));

/// Builds the client shared by every action.
pub fn build_client(timeout: Duration) -> SetupResult<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

/// Parses an endpoint from config, rejecting anything that is not http(s).
pub(crate) fn parse_endpoint(url: &str) -> SetupResult<Url> {
    let parsed = Url::parse(url).map_err(|e| SetupError::InvalidEndpoint {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(SetupError::InvalidEndpoint {
            url: url.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// Appends `params` to `base`, keeping any query `base` already has.
pub(crate) fn with_params<'a, I>(base: &Url, params: I) -> Url
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut url = base.clone();
    url.query_pairs_mut().extend_pairs(params);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_endpoint() {
        assert!(parse_endpoint("https://api.nasa.gov/planetary/apod").is_ok());
        assert!(matches!(
            parse_endpoint("ftp://example.com"),
            Err(SetupError::InvalidEndpoint { .. })
        ));
        assert!(parse_endpoint("not a url").is_err());
    }

    #[test]
    fn test_with_params_keeps_existing_query() {
        let base = parse_endpoint("https://inspirobot.me/api?generate=true").unwrap();
        let url = with_params(&base, [("first", "u1f973"), ("second", "u1f975")]);
        assert_eq!(
            url.as_str(),
            "https://inspirobot.me/api?generate=true&first=u1f973&second=u1f975"
        );
    }
}
