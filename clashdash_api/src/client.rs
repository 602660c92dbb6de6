//! HTTP client for the Clash of Clans REST API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    tag::encode_tag,
    types::{Clan, RaidSeason, War, WarLogEntry},
    Error, ItemsResponse,
};

/// HTTP client for the Clash of Clans REST API.
///
/// Authenticates every request with a developer-portal bearer token. Each
/// request builds a fresh `reqwest::Client` with a 30-second timeout.
#[derive(Debug)]
pub struct Client {
    /// Base URL for the API. Defaults to `https://api.clashofclans.com/v1`.
    base_api_url: String,
    token: String,
}

impl Client {
    /// Creates a new client pointing at the production API.
    pub fn new(token: &str) -> Self {
        Self {
            base_api_url: "https://api.clashofclans.com/v1".to_string(),
            token: token.to_string(),
        }
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, token: &str) -> Self {
        Self {
            base_api_url: base_url.to_string(),
            token: token.to_string(),
        }
    }

    fn get_url(&self, path: &str, limit: Option<u32>) -> Result<Url, Error> {
        let mut url =
            Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
                tracing::error!("Invalid URL constructed: {}", e);
                Error::RequestFailed
            })?;
        if let Some(limit) = limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        }
        Ok(url)
    }

    async fn get<T>(&self, path: &str, limit: Option<u32>) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let url = self.get_url(path, limit)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        let resp = client
            .get(url)
            .bearer_auth(&self.token)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let parsed = serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::RequestFailed
        })?;

        Ok(parsed)
    }

    /// Fetches a single clan by tag. The tag is normalized before the request.
    pub async fn get_clan(&self, tag: &str) -> Result<Clan, Error> {
        self.get::<Clan>(format!("/clans/{}", encode_tag(tag)).as_str(), None)
            .await
    }

    /// Fetches the clan's current war, if any.
    pub async fn get_current_war(&self, tag: &str) -> Result<War, Error> {
        self.get::<War>(
            format!("/clans/{}/currentwar", encode_tag(tag)).as_str(),
            None,
        )
        .await
    }

    /// Fetches the clan's war log, newest first.
    pub async fn get_war_log(
        &self,
        tag: &str,
        limit: Option<u32>,
    ) -> Result<ItemsResponse<WarLogEntry>, Error> {
        self.get::<ItemsResponse<WarLogEntry>>(
            format!("/clans/{}/warlog", encode_tag(tag)).as_str(),
            limit,
        )
        .await
    }

    /// Fetches the clan's capital raid seasons, newest first.
    pub async fn get_capital_raid_seasons(
        &self,
        tag: &str,
        limit: Option<u32>,
    ) -> Result<ItemsResponse<RaidSeason>, Error> {
        self.get::<ItemsResponse<RaidSeason>>(
            format!("/clans/{}/capitalraidseasons", encode_tag(tag)).as_str(),
            limit,
        )
        .await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    // Error bodies are arbitrary text; never cut inside a multibyte character.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
