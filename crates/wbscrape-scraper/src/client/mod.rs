//! HTTP client for the catalog search API and its static metadata host.

mod fetch_all;

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::ScraperError;
use crate::retry::{is_retriable, retry_with_delay};
use crate::types::CatalogPage;

/// HTTP client for catalog JSON endpoints.
///
/// Every request is a plain GET. A response counts as success only when the
/// status is exactly `200 OK` and the body deserializes. Transport errors and
/// any other status are retried with a fixed delay up to `max_attempts`
/// total attempts; a `200` with an unparsable body fails at once.
pub struct CatalogClient {
    pub(super) client: Client,
    pub(super) connect_timeout: Duration,
    /// Total attempts per URL, including the first.
    pub(super) max_attempts: u32,
    /// Constant pause between two attempts.
    pub(super) retry_delay: Duration,
}

impl CatalogClient {
    /// Creates a `CatalogClient` with configured timeout, `User-Agent`, and retry policy.
    ///
    /// Connecting is bounded by the same `timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_attempts: u32,
        retry_delay: Duration,
    ) -> Result<Self, ScraperError> {
        Self::build(
            Duration::from_secs(timeout_secs),
            Duration::from_secs(timeout_secs),
            user_agent,
            max_attempts,
            retry_delay,
        )
    }

    /// Builds a client from the application config.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::new`].
    pub fn from_config(config: &wbscrape_core::AppConfig) -> Result<Self, ScraperError> {
        Self::build(
            Duration::from_secs(config.request_timeout_secs),
            Duration::from_secs(config.connect_timeout_secs),
            &config.user_agent,
            config.fetch_max_attempts,
            config.fetch_retry_delay(),
        )
    }

    fn build(
        timeout: Duration,
        connect_timeout: Duration,
        user_agent: &str,
        max_attempts: u32,
        retry_delay: Duration,
    ) -> Result<Self, ScraperError> {
        let connect_timeout = connect_timeout.min(timeout);
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            connect_timeout,
            max_attempts: max_attempts.max(1),
            retry_delay,
        })
    }

    /// Fetches `url` and deserializes the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Exhausted`]: every attempt hit a transport error or
    ///   a non-200 status. The last failure is kept as the source.
    /// - [`ScraperError::Malformed`]: a `200` response whose body is not the
    ///   expected JSON (not retried).
    pub async fn fetch_json<T>(&self, url: &str) -> Result<T, ScraperError>
    where
        T: DeserializeOwned,
    {
        let result = retry_with_delay(self.max_attempts, self.retry_delay, || async move {
            let response = self.client.get(url).send().await?;
            let status = response.status();

            if status != reqwest::StatusCode::OK {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            let body = response.text().await?;
            serde_json::from_str::<T>(&body).map_err(|e| ScraperError::Malformed {
                url: url.to_owned(),
                source: e,
            })
        })
        .await;

        result.map_err(|err| match err {
            ScraperError::Malformed { .. } => {
                tracing::warn!(url, error = %err, "catalog returned a malformed body");
                err
            }
            err if is_retriable(&err) => {
                tracing::error!(
                    url,
                    attempts = self.max_attempts,
                    error = %err,
                    "all catalog request attempts exhausted"
                );
                ScraperError::Exhausted {
                    url: url.to_owned(),
                    attempts: self.max_attempts,
                    last: Box::new(err),
                }
            }
            err => err,
        })
    }

    /// Fetches one catalog search page.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::fetch_json`].
    pub async fn fetch_page(&self, url: &str) -> Result<CatalogPage, ScraperError> {
        self.fetch_json::<CatalogPage>(url).await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
