//! Omniconvert Core Library
//!
//! This crate provides the domain models, format taxonomy, error types,
//! configuration, and filename validation shared across all Omniconvert
//! components.

pub mod config;
pub mod error;
pub mod formats;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, ConverterConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use formats::FileCategory;
pub use models::{ConversionRecord, ConversionStatus, ConvertedFile};
