use std::path::Path;

use omniconvert_core::formats::{mime_type_for, FileCategory};
use omniconvert_core::Config;

/// Common validation errors for uploaded files
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Missing file extension (filename: {0})")]
    MissingExtension(String),

    #[error("Empty file")]
    EmptyFile,
}

/// Uploaded file validator
///
/// Provides common validation logic for all media categories without
/// coupling to storage implementation details.
pub struct MediaValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
    allowed_content_types: Vec<String>,
}

impl MediaValidator {
    pub fn new(
        max_file_size: usize,
        allowed_extensions: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_extensions,
            allowed_content_types,
        }
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate file extension
    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| ValidationError::MissingExtension(filename.to_string()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(())
    }

    /// Validate declared content type
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = content_type.to_lowercase();

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Validate that Content-Type matches the file extension.
    /// This prevents Content-Type spoofing attacks where malicious files
    /// are uploaded with legitimate Content-Types.
    pub fn validate_extension_content_type_match(
        &self,
        filename: &str,
        content_type: &str,
    ) -> Result<(), ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| ValidationError::MissingExtension(filename.to_string()))?;

        let normalized_content_type = content_type.to_lowercase();

        // Browsers fall back to the generic type for containers they don't
        // recognize; the extension allowlist still applies.
        if normalized_content_type == "application/octet-stream" {
            return Ok(());
        }

        let expected_content_types: Vec<&str> = match extension.as_str() {
            // Images
            "jpg" | "jpeg" => vec!["image/jpeg"],
            "png" => vec!["image/png"],
            "gif" => vec!["image/gif"],
            "webp" => vec!["image/webp"],
            "bmp" => vec!["image/bmp"],
            "tiff" => vec!["image/tiff"],
            "svg" => vec!["image/svg+xml"],
            // Videos
            "mp4" => vec!["video/mp4"],
            "webm" => vec!["video/webm"],
            "mov" => vec!["video/quicktime"],
            "avi" => vec!["video/x-msvideo"],
            "mkv" => vec!["video/x-matroska"],
            // Audio
            "mp3" => vec!["audio/mpeg", "audio/mp3"],
            "wav" => vec!["audio/wav", "audio/wave", "audio/x-wav"],
            "ogg" => vec!["audio/ogg", "application/ogg"],
            "m4a" => vec!["audio/mp4", "audio/x-m4a"],
            "flac" => vec!["audio/flac", "audio/x-flac"],
            "aac" => vec!["audio/aac"],
            // Documents
            "pdf" => vec!["application/pdf"],
            "doc" => vec!["application/msword"],
            "docx" => {
                vec!["application/vnd.openxmlformats-officedocument.wordprocessingml.document"]
            }
            "txt" => vec!["text/plain"],
            "rtf" => vec!["application/rtf", "text/rtf"],
            _ => {
                // For unknown extensions, skip cross-validation.
                // The extension and content-type are still validated individually.
                tracing::debug!(
                    extension = %extension,
                    content_type = %content_type,
                    "Unknown extension, skipping Content-Type/extension cross-validation"
                );
                return Ok(());
            }
        };

        if !expected_content_types.iter().any(|ct| {
            normalized_content_type == *ct || normalized_content_type.starts_with(&format!("{};", ct))
        }) {
            return Err(ValidationError::InvalidContentType {
                content_type: format!(
                    "{} (does not match extension '{}'. Expected one of: {})",
                    content_type,
                    extension,
                    expected_content_types.join(", ")
                ),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Validate all aspects of a file, including Content-Type/extension matching
    pub fn validate_all(
        &self,
        filename: &str,
        content_type: &str,
        file_size: usize,
    ) -> Result<(), ValidationError> {
        self.validate_file_size(file_size)?;
        self.validate_extension(filename)?;
        self.validate_content_type(content_type)?;
        self.validate_extension_content_type_match(filename, content_type)?;
        Ok(())
    }
}

/// Create a validator for a given file category from configuration.
///
/// The allowed extension and content-type lists come from the category's
/// format taxonomy; only the size limit is configurable.
pub fn validator_for_category(config: &Config, category: FileCategory) -> MediaValidator {
    let extensions: Vec<String> = category
        .input_extensions()
        .iter()
        .map(|e| e.to_string())
        .collect();

    // Accept every MIME type any of the category's extensions maps to,
    // plus the generic fallback browsers send for unrecognized files.
    let mut content_types: Vec<String> = category
        .input_extensions()
        .iter()
        .map(|e| mime_type_for(e).to_string())
        .collect();
    content_types.push("application/octet-stream".to_string());
    content_types.sort();
    content_types.dedup();

    MediaValidator::new(config.max_file_size(category), extensions, content_types)
}
