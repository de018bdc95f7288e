//! Shared HTTP transport for the remote collaborators.
//!
//! Wraps a `reqwest::Client` with a small retry loop for throttling
//! responses. Callers decide what a failure means; this layer only
//! classifies it.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error calling {url}: {message}")]
    Network { url: String, message: String },
    #[error("{url} responded with {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Upper bound on any single wait between attempts.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// When to retry and how long to wait in between.
///
/// The wait before retry `n` (1-based) is the server's `Retry-After`
/// value if it sent one, otherwise `n * multiplier` seconds. Either way it
/// never exceeds [`MAX_RETRY_DELAY`].
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_on: Vec<u16>,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_on: vec![429, 503],
            multiplier: 1.5,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    fn should_retry(&self, status: StatusCode, attempt: u32) -> bool {
        attempt < self.max_retries && self.retry_on.contains(&status.as_u16())
    }

    fn delay(&self, attempt: u32, headers: &HeaderMap) -> Duration {
        let retry_after = headers
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        let delay = match retry_after {
            Some(seconds) => Duration::from_secs(seconds),
            None => Duration::try_from_secs_f64(f64::from(attempt) * self.multiplier)
                .unwrap_or(MAX_RETRY_DELAY),
        };
        delay.min(MAX_RETRY_DELAY)
    }
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    default_headers: HeaderMap,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn new(retry: RetryPolicy) -> Self {
        Self::with_headers(retry, HeaderMap::new())
    }

    pub fn with_headers(retry: RetryPolicy, default_headers: HeaderMap) -> Self {
        Self {
            http: Client::new(),
            default_headers,
            retry,
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, TransportError> {
        let body = self.get_text(url.clone()).await?;
        serde_json::from_str(&body).map_err(|err| TransportError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        })
    }

    pub async fn get_value(&self, url: Url) -> Result<serde_json::Value, TransportError> {
        self.get_json(url).await
    }

    async fn get_text(&self, url: Url) -> Result<String, TransportError> {
        let mut attempt = 0;
        loop {
            debug!(url = %url, attempt, "GET");
            let response = self
                .http
                .get(url.clone())
                .headers(self.default_headers.clone())
                .send()
                .await
                .map_err(|err| TransportError::Network {
                    url: url.to_string(),
                    message: err.to_string(),
                })?;

            let status = response.status();
            if status.is_success() {
                return response.text().await.map_err(|err| TransportError::Network {
                    url: url.to_string(),
                    message: err.to_string(),
                });
            }

            if self.retry.should_retry(status, attempt) {
                attempt += 1;
                let delay = self.retry.delay(attempt, response.headers());
                warn!(url = %url, %status, attempt, ?delay, "retrying throttled request");
                tokio::time::sleep(delay).await;
                continue;
            }

            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
    }
}
