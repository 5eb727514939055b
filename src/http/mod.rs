//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, CORS header layers)
//!     → handlers.rs (dispatch by method)
//!     → request.rs (extract `url` target)
//!     → [upstream fetch]
//!     → response.rs (verbatim payload or error envelope)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{TargetUrl, UuidRequestId, X_REQUEST_ID};
pub use response::{ErrorEnvelope, RelayError};
pub use server::{AppState, RelayServer, ServerError};
