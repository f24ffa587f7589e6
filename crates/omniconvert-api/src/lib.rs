//! Omniconvert API
//!
//! The axum HTTP service: multipart conversion endpoints, the download
//! center, history, format listings, and the static web UI / PWA assets.
//! Exposed as a library so integration tests can build the full router.

pub mod api_doc;
pub mod cleanup;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod setup;
pub mod state;
pub mod telemetry;
