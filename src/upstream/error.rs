//! Failure types for the outbound fetch.

use std::error::Error as StdError;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Why a single upstream fetch did not produce a payload.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The exchange did not finish within the configured deadline.
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The origin answered with a non-2xx status.
    #[error("HTTP Error {}: {}", .0.as_u16(), .0.canonical_reason().unwrap_or("Unknown"))]
    Status(StatusCode),

    /// The target could not be turned into a request.
    #[error("invalid target url: {0}")]
    InvalidUrl(String),

    /// DNS, connect, TLS, protocol or body read failure.
    #[error("{0}")]
    Transport(String),
}

impl FetchError {
    /// Classify a reqwest failure, keeping its cause chain in the message.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else if err.is_builder() {
            FetchError::InvalidUrl(describe(&err))
        } else {
            FetchError::Transport(describe(&err))
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout(_))
    }
}

/// Error building the shared outbound client.
#[derive(Debug, Error)]
#[error("failed to build upstream client: {0}")]
pub struct UpstreamBuildError(#[from] reqwest::Error);

fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // hyper and reqwest sometimes repeat the inner message verbatim
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
