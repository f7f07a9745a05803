//! HTTP plumbing shared by the upstream sources

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::{FETCH_TIMEOUT_MS, RETRY_ATTEMPTS, RETRY_BASE_DELAY_MS, RETRY_STATUS_CODES};
use crate::version::error::SourceError;

/// Builds the client every source uses
pub(crate) fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("version-proxy/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_millis(FETCH_TIMEOUT_MS))
        .build()
        .expect("Failed to create HTTP client")
}

/// GETs `url` and decodes the JSON body into `T`
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, SourceError> {
    let response = client.get(url).send().await?;
    decode(response, url).await
}

async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    url: &str,
) -> Result<T, SourceError> {
    let status = response.status();

    if !status.is_success() {
        warn!("Upstream returned status {}: {}", status, url);
        return Err(SourceError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    response.json().await.map_err(|e| {
        warn!("Failed to parse response from {}: {}", url, e);
        SourceError::InvalidResponse(e.to_string())
    })
}

/// Retry policy for idempotent GET requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on every further retry
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_ATTEMPTS,
            base_delay: Duration::from_millis(RETRY_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn should_retry_status(status: StatusCode) -> bool {
        RETRY_STATUS_CODES.contains(&status.as_u16())
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2_u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// [`get_json`] retried on transient statuses, timeouts and connection failures
pub(crate) async fn get_json_with_retry<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    policy: &RetryPolicy,
) -> Result<T, SourceError> {
    let mut attempt = 1;

    loop {
        let has_retries_left = attempt < policy.max_attempts;

        match client.get(url).send().await {
            Ok(response)
                if has_retries_left && RetryPolicy::should_retry_status(response.status()) =>
            {
                warn!(
                    "Attempt {}/{} for {} returned {}, retrying",
                    attempt,
                    policy.max_attempts,
                    url,
                    response.status()
                );
            }
            Ok(response) => return decode(response, url).await,
            Err(e) if has_retries_left && (e.is_timeout() || e.is_connect()) => {
                warn!(
                    "Attempt {}/{} for {} failed: {}, retrying",
                    attempt, policy.max_attempts, url, e
                );
            }
            Err(e) => return Err(e.into()),
        }

        tokio::time::sleep(policy.delay_for(attempt)).await;
        attempt += 1;
    }
}
