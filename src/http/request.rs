//! Request handling.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Extract the relay target from the query string
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The target is opaque: no validation beyond presence happens here

use axum::http::{HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use url::form_urlencoded;
use uuid::Uuid;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Query key naming the URL to relay.
pub const TARGET_PARAM: &str = "url";

/// The caller-supplied destination of the outbound fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl(String);

impl TargetUrl {
    /// Extract the target from a raw query string.
    ///
    /// Standard form-urlencoded unescaping applies. Blank values are
    /// ignored, and when the key repeats the first non-blank value wins.
    pub fn from_query(query: Option<&str>) -> Option<Self> {
        form_urlencoded::parse(query?.as_bytes())
            .find(|(key, value)| key == TARGET_PARAM && !value.is_empty())
            .map(|(_, value)| Self(value.into_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Generates UUID v4 request IDs for [`tower_http::request_id`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request ID set by the request-ID layer.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
