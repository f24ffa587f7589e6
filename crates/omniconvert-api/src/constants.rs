//! API constants
//!
//! Route paths are built from `API_PREFIX`; handler `utoipa` annotations
//! spell the full path out so the OpenAPI spec stays greppable.

/// Versioned API path prefix.
pub const API_PREFIX: &str = "/api/v0";
