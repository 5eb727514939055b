//! Response shaping.
//!
//! # Responsibilities
//! - Forward upstream payloads byte-for-byte
//! - Wrap failures in the `{"error": ...}` envelope
//! - Map relay errors to status codes per [`ErrorStatusPolicy`]
//!
//! CORS headers are not set here; the router adds them to every response.

use std::io;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use thiserror::Error;

use crate::config::ErrorStatusPolicy;
use crate::upstream::FetchError;

pub const ALLOW_ORIGIN: HeaderValue = HeaderValue::from_static("*");
pub const ALLOW_METHODS: HeaderValue = HeaderValue::from_static("GET, OPTIONS");
pub const ALLOW_HEADERS: HeaderValue = HeaderValue::from_static("Content-Type");
pub const APPLICATION_JSON: HeaderValue = HeaderValue::from_static("application/json");

/// Why a relay produced an error envelope instead of the upstream payload.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing url parameter")]
    MissingParameter,

    #[error(transparent)]
    Upstream(#[from] FetchError),
}

impl RelayError {
    pub fn status(&self, policy: ErrorStatusPolicy) -> StatusCode {
        match (policy, self) {
            (ErrorStatusPolicy::AlwaysOk, _) => StatusCode::OK,
            (ErrorStatusPolicy::Accurate, RelayError::MissingParameter) => StatusCode::BAD_REQUEST,
            (ErrorStatusPolicy::Accurate, RelayError::Upstream(e)) if e.is_timeout() => {
                StatusCode::GATEWAY_TIMEOUT
            }
            (ErrorStatusPolicy::Accurate, RelayError::Upstream(_)) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Metrics label for this failure.
    pub fn outcome(&self) -> &'static str {
        match self {
            RelayError::MissingParameter => "missing_url",
            RelayError::Upstream(FetchError::Timeout(_)) => "timeout",
            RelayError::Upstream(FetchError::Status(_)) => "upstream_status",
            RelayError::Upstream(FetchError::InvalidUrl(_)) => "invalid_url",
            RelayError::Upstream(FetchError::Transport(_)) => "upstream_error",
        }
    }
}

/// JSON body reporting a failure.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    error: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// Serialize with a space after `:` and `,`, e.g. `{"error": "..."}`.
    pub fn to_bytes(&self) -> Result<Bytes, serde_json::Error> {
        let mut buf = Vec::with_capacity(self.error.len() + 16);
        self.serialize(&mut Serializer::with_formatter(&mut buf, SpacedFormatter))?;
        Ok(Bytes::from(buf))
    }
}

struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Response carrying the upstream payload unmodified.
pub fn forwarded(body: Bytes) -> Response {
    json_response(StatusCode::OK, body)
}

/// Response carrying the error envelope for `err`.
pub fn failed(err: &RelayError, policy: ErrorStatusPolicy) -> Response {
    error_response(err.status(policy), &err.to_string())
}

/// Preflight answer: status only, CORS headers come from the router.
pub fn preflight() -> Response {
    StatusCode::OK.into_response()
}

pub fn method_not_allowed() -> Response {
    let mut response = error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    response.headers_mut().insert(header::ALLOW, ALLOW_METHODS);
    response
}

fn error_response(status: StatusCode, message: &str) -> Response {
    match ErrorEnvelope::new(message).to_bytes() {
        Ok(body) => json_response(status, body),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize error envelope");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn json_response(status: StatusCode, body: Bytes) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, APPLICATION_JSON)],
        Body::from(body),
    )
        .into_response()
}
