//! Upstream fetch subsystem.
//!
//! # Data Flow
//! ```text
//! TargetUrl (from the inbound query)
//!     → client.rs (single GET, User-Agent, hard deadline)
//!     → Ok(Fetched) | Err(FetchError)
//!     → relay handler picks the response body
//! ```
//!
//! # Design Decisions
//! - No retries: one attempt per inbound request
//! - No idle pooling, no caching
//! - Non-2xx origin status is a failure, like any other fetch error

pub mod client;
pub mod error;

pub use client::{Fetched, UpstreamClient};
pub use error::{FetchError, UpstreamBuildError};
