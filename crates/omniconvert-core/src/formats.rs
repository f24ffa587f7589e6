//! Format taxonomy
//!
//! Maps file extensions to their media category, lists the output formats
//! each category can be converted to, and carries the MIME table used for
//! responses. Everything here operates on lowercase extensions without the
//! leading dot.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Media category of an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Document,
    Image,
    Audio,
    Video,
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileCategory::Document => "document",
            FileCategory::Image => "image",
            FileCategory::Audio => "audio",
            FileCategory::Video => "video",
        };
        f.write_str(s)
    }
}

/// Document extensions accepted for upload
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "rtf", "odt"];
/// Image extensions accepted for upload
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tiff", "svg"];
/// Audio extensions accepted for upload
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "ogg", "flac", "aac", "wma"];
/// Video extensions accepted for upload
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "webm", "flv", "wmv", "3gp"];

/// Output formats offered per category
pub const DOCUMENT_OUTPUTS: &[&str] = &["pdf", "docx", "txt"];
pub const IMAGE_OUTPUTS: &[&str] = &["jpg", "png", "gif", "webp", "bmp"];
pub const AUDIO_OUTPUTS: &[&str] = &["mp3", "wav", "m4a"];
pub const VIDEO_OUTPUTS: &[&str] = &["mp4", "avi", "mov"];

impl FileCategory {
    /// Categorize a lowercase extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
            Some(FileCategory::Document)
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(FileCategory::Image)
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            Some(FileCategory::Audio)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(FileCategory::Video)
        } else {
            None
        }
    }

    /// Categorize a filename by its extension.
    pub fn for_filename(filename: &str) -> Option<Self> {
        extension_of(filename).and_then(|ext| Self::from_extension(&ext))
    }

    /// Input extensions accepted for this category.
    pub fn input_extensions(&self) -> &'static [&'static str] {
        match self {
            FileCategory::Document => DOCUMENT_EXTENSIONS,
            FileCategory::Image => IMAGE_EXTENSIONS,
            FileCategory::Audio => AUDIO_EXTENSIONS,
            FileCategory::Video => VIDEO_EXTENSIONS,
        }
    }

    /// Output formats offered for this category.
    pub fn supported_outputs(&self) -> &'static [&'static str] {
        match self {
            FileCategory::Document => DOCUMENT_OUTPUTS,
            FileCategory::Image => IMAGE_OUTPUTS,
            FileCategory::Audio => AUDIO_OUTPUTS,
            FileCategory::Video => VIDEO_OUTPUTS,
        }
    }

    /// Whether the given target format is offered for this category.
    pub fn supports_output(&self, target: &str) -> bool {
        let target = target.to_lowercase();
        self.supported_outputs().contains(&target.as_str())
    }
}

/// Lowercase extension of a filename, without the leading dot.
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// MIME type for a file extension; `application/octet-stream` when unknown.
pub fn mime_type_for(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        // Documents
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "rtf" => "application/rtf",
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        // Video
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

/// Format a byte count in human readable form.
pub fn format_file_size(size_bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    const GB: u64 = 1024 * 1024 * 1024;

    if size_bytes < KB {
        format!("{} B", size_bytes)
    } else if size_bytes < MB {
        format!("{:.1} KB", size_bytes as f64 / KB as f64)
    } else if size_bytes < GB {
        format!("{:.1} MB", size_bytes as f64 / MB as f64)
    } else {
        format!("{:.1} GB", size_bytes as f64 / GB as f64)
    }
}
