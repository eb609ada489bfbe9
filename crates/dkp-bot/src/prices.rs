//! Krono price feed client

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;

use crate::config::PriceFeedConfig;

/// Source of the current krono price, as display text.
pub trait PriceFeed {
    fn current_price(&self) -> impl Future<Output = Result<String>> + Send;
}

/// HTTP client for the auction site's price endpoint. The endpoint answers
/// with the bare price as plain text.
#[derive(Clone)]
pub struct KronoClient {
    client: Client,
    url: String,
}

impl KronoClient {
    pub fn new(config: &PriceFeedConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build price feed HTTP client")?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

impl PriceFeed for KronoClient {
    async fn current_price(&self) -> Result<String> {
        debug!("Fetching krono price from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Failed to reach price feed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Price feed returned {}", status);
        }

        let body = response
            .text()
            .await
            .context("Failed to read price feed response")?;
        Ok(body.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, timeout_secs: u64) -> KronoClient {
        KronoClient::new(&PriceFeedConfig {
            url: format!("{}/GetKronoPrice", server.uri()),
            timeout_secs,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_current_price_returns_trimmed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/GetKronoPrice"))
            .respond_with(ResponseTemplate::new(200).set_body_string("4123\n"))
            .expect(1)
            .mount(&server)
            .await;

        let price = client_for(&server, 10).current_price().await.unwrap();
        assert_eq!(price, "4123");
    }

    #[tokio::test]
    async fn test_server_error_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let err = client_for(&server, 10).current_price().await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_slow_feed_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("4123")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, 1).current_price().await.unwrap_err();
        assert!(err.to_string().contains("Failed to reach price feed"));
    }
}
