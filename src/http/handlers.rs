//! Relay endpoint handlers.

use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::Response,
};

use crate::http::request::{request_id, TargetUrl};
use crate::http::response::{self, RelayError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::Fetched;

/// GET on any path: fetch the `url` query parameter and return its bytes.
pub async fn relay_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers);

    match relay(&state, request_id, uri.query()).await {
        Ok(fetched) => {
            tracing::debug!(
                request_id = %request_id,
                status = %fetched.status,
                bytes = fetched.body.len(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Relayed upstream payload"
            );
            metrics::record_request("forwarded", start_time);
            response::forwarded(fetched.body)
        }
        Err(err) => {
            tracing::warn!(
                request_id = %request_id,
                error = %err,
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Relay failed"
            );
            metrics::record_request(err.outcome(), start_time);
            response::failed(&err, state.error_status)
        }
    }
}

async fn relay(
    state: &AppState,
    request_id: &str,
    query: Option<&str>,
) -> Result<Fetched, RelayError> {
    let target = TargetUrl::from_query(query).ok_or(RelayError::MissingParameter)?;

    tracing::info!(request_id = %request_id, target = %target.as_str(), "Proxying");

    Ok(state.upstream.fetch(target.as_str()).await?)
}

/// OPTIONS on any path: CORS preflight, never touches the upstream.
pub async fn preflight_handler(headers: HeaderMap) -> Response {
    let start_time = Instant::now();
    tracing::debug!(request_id = %request_id(&headers), "Preflight");
    metrics::record_request("preflight", start_time);
    response::preflight()
}

/// Any other method.
pub async fn method_not_allowed_handler(method: Method, headers: HeaderMap) -> Response {
    let start_time = Instant::now();
    tracing::debug!(
        request_id = %request_id(&headers),
        method = %method,
        "Method not allowed"
    );
    metrics::record_request("method_not_allowed", start_time);
    response::method_not_allowed()
}
