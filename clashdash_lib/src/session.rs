//! Shared game-API session with single-flight initialization.
//!
//! The process holds exactly one API client. Initialization is lazy and
//! guarded by a `OnceCell`, so concurrent first users share one in-flight
//! initialization instead of each building (and validating) their own.

use std::sync::Arc;

use tokio::sync::OnceCell;

use clashdash_api::Client;

use crate::error::AggregationError;

/// Lazily-initialized shared API client.
pub struct ApiSession {
    token: Option<String>,
    base_url: Option<String>,
    client: OnceCell<Arc<Client>>,
}

impl ApiSession {
    /// Creates a session for the production API. The token is checked on
    /// first use, not here, so a misconfigured process still starts and
    /// reports the problem per request.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token,
            base_url: None,
            client: OnceCell::new(),
        }
    }

    /// Creates a session against a custom base URL. Used for testing.
    pub fn with_base_url(token: Option<String>, base_url: &str) -> Self {
        Self {
            token,
            base_url: Some(base_url.to_string()),
            client: OnceCell::new(),
        }
    }

    /// Returns the shared client, initializing it at most once.
    pub async fn client(&self) -> Result<Arc<Client>, AggregationError> {
        let client = self
            .client
            .get_or_try_init(|| async {
                let token = self
                    .token
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| {
                        AggregationError::Config("COC_API_TOKEN is not set".to_string())
                    })?;
                tracing::info!("initializing game API session");
                Ok::<_, AggregationError>(Arc::new(match &self.base_url {
                    Some(base) => Client::with_base_url(base, token),
                    None => Client::new(token),
                }))
            })
            .await?;
        Ok(client.clone())
    }
}
