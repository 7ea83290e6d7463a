//! Concurrent JSON source fetcher

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;

use crate::application::errors::{BotError, FetchError};
use crate::domain::entities::FetchResult;
use crate::domain::traits::SourceFetcher;
use crate::infrastructure::config::HttpConfig;

/// Fetches every requested URL at once over a shared client
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, BotError> {
        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled for source fetches");
        }

        let client = Client::builder()
            .user_agent(concat!("xsg-bot/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| BotError::Network(e.to_string()))?;

        Ok(Self { client })
    }

    async fn fetch_one(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        // Body is parsed regardless of the advertised content type
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch_all(&self, urls: &[String]) -> Vec<FetchResult> {
        let fetches = urls.iter().map(|url| async move {
            match self.fetch_one(url).await {
                Ok(value) => FetchResult::Success(value),
                Err(e) => {
                    tracing::warn!(url = %url, kind = e.kind(), "Source fetch failed: {}", e);
                    FetchResult::Failure
                }
            }
        });

        join_all(fetches).await
    }
}
