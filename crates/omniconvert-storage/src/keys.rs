//! Shared key generation for the spool.
//!
//! Key format: `converted/{id}/{filename}`. The UUID segment makes keys
//! collision-free when two uploads share a filename.

use std::path::Path;
use uuid::Uuid;

/// Generate a storage key for a converted output.
///
/// Only the base name of `filename` is used; any path components an
/// attacker smuggled past upstream sanitization are stripped here.
pub fn generate_storage_key(id: Uuid, filename: &str) -> String {
    let base = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .unwrap_or("unnamed");
    format!("converted/{}/{}", id, base)
}
