//! Omniconvert Storage Library
//!
//! The spool for converted outputs. Converted files are ephemeral temporary
//! files: they live under a spool directory until downloaded, cleared, or
//! expired by the cleanup task. The `Storage` trait keeps the API crate
//! decoupled from the filesystem layout.

pub mod keys;
pub mod local;
pub mod traits;

pub use keys::generate_storage_key;
pub use local::LocalSpool;
pub use traits::{Storage, StorageError, StorageResult};
