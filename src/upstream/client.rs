//! Outbound HTTP client.
//!
//! # Responsibilities
//! - Issue exactly one GET per relayed request
//! - Send the configured User-Agent
//! - Enforce the hard deadline over connect, headers and body
//! - Report failures as a typed [`FetchError`]

use std::time::Duration;

use axum::body::Bytes;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::config::UpstreamConfig;
use crate::upstream::error::{FetchError, UpstreamBuildError};

/// Payload of a successful upstream fetch.
#[derive(Debug)]
pub struct Fetched {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Client used for every outbound fetch.
///
/// Idle connections are never kept, so each fetch opens and closes its own
/// socket and nothing is shared between inbound requests.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamBuildError> {
        let timeout = Duration::from_secs(config.timeout_secs);

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(timeout)
            .pool_max_idle_per_host(0);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch `target` once and read the whole body.
    pub async fn fetch(&self, target: &str) -> Result<Fetched, FetchError> {
        let url = Url::parse(target).map_err(|e| FetchError::InvalidUrl(format!("{target}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "unsupported scheme `{}`",
                url.scheme()
            )));
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;

        Ok(Fetched { status, body })
    }
}
