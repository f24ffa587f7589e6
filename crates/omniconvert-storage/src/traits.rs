//! Storage abstraction trait
//!
//! This module defines the Storage trait the spool backend implements.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// **Key format:** `converted/{id}/{filename}` — see [`crate::keys`].
/// Filenames must already be sanitized by the caller; keys are still checked
/// against path traversal before touching the filesystem.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store a converted output and return its storage key.
    async fn upload(&self, id: Uuid, filename: &str, data: Vec<u8>) -> StorageResult<String>;

    /// Read a converted output by its storage key.
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete a converted output by its storage key.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if a converted output exists.
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Size in bytes of a stored output.
    async fn content_length(&self, storage_key: &str) -> StorageResult<u64>;

    /// Delete every spooled output older than `age`. Returns how many were
    /// removed. Used by the retention cleanup task.
    async fn purge_older_than(&self, age: Duration) -> StorageResult<usize>;
}
