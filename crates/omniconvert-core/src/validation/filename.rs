//! Filename security validation and sanitization.
//!
//! Uploaded filenames are attacker-controlled. They are checked before any
//! conversion work and sanitized before ever being used in a storage key,
//! an archive entry, or a Content-Disposition header.

use std::path::Path;

/// Maximum accepted filename length in characters.
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Maximum number of files per batch conversion request.
pub const MAX_BATCH_SIZE: usize = 10;

/// Substrings that are never legitimate in an uploaded filename.
const DANGEROUS_PATTERNS: &[&str] = &["../", ".\\", "<script", "<?php", "#!/"];

/// Windows reserved device names (checked against the uppercased stem).
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Filename validation failures
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FilenameError {
    #[error("Filename cannot be empty")]
    Empty,

    #[error("Filename is too long (max {MAX_FILENAME_LENGTH} characters)")]
    TooLong,

    #[error("Filename contains potentially dangerous pattern: {0}")]
    DangerousPattern(&'static str),

    #[error("Filename uses reserved name: {0}")]
    ReservedName(String),
}

/// Validate a filename for security and compatibility.
pub fn validate_filename(filename: &str) -> Result<(), FilenameError> {
    if filename.trim().is_empty() {
        return Err(FilenameError::Empty);
    }

    if filename.chars().count() > MAX_FILENAME_LENGTH {
        return Err(FilenameError::TooLong);
    }

    let lower = filename.to_lowercase();
    for pattern in DANGEROUS_PATTERNS {
        if lower.contains(pattern) {
            return Err(FilenameError::DangerousPattern(pattern));
        }
    }

    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_uppercase();
    if RESERVED_NAMES.contains(&stem.as_str()) {
        return Err(FilenameError::ReservedName(stem));
    }

    Ok(())
}

/// Replace characters that are invalid on common filesystems with `_`,
/// collapse runs of underscores, and trim leading/trailing `_` and spaces.
pub fn clean_filename(filename: &str) -> String {
    const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

    let mut clean: String = filename
        .chars()
        .map(|c| if INVALID_CHARS.contains(&c) { '_' } else { c })
        .collect();

    while clean.contains("__") {
        clean = clean.replace("__", "_");
    }

    clean.trim_matches(|c| c == '_' || c == ' ').to_string()
}

/// Validate a batch conversion size.
pub fn validate_batch_size(file_count: usize) -> Result<(), String> {
    if file_count > MAX_BATCH_SIZE {
        return Err(format!(
            "Batch size ({}) exceeds maximum allowed ({})",
            file_count, MAX_BATCH_SIZE
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_filename_ok() {
        assert!(validate_filename("report.pdf").is_ok());
        assert!(validate_filename("summer photos 2024.jpg").is_ok());
    }

    #[test]
    fn test_validate_filename_empty() {
        assert_eq!(validate_filename(""), Err(FilenameError::Empty));
        assert_eq!(validate_filename("   "), Err(FilenameError::Empty));
    }

    #[test]
    fn test_validate_filename_too_long() {
        let long = format!("{}.txt", "a".repeat(300));
        assert_eq!(validate_filename(&long), Err(FilenameError::TooLong));
    }

    #[test]
    fn test_validate_filename_dangerous_patterns() {
        assert!(matches!(
            validate_filename("../../etc/passwd"),
            Err(FilenameError::DangerousPattern("../"))
        ));
        assert!(matches!(
            validate_filename("evil<SCRIPT>.txt"),
            Err(FilenameError::DangerousPattern("<script"))
        ));
        assert!(matches!(
            validate_filename("shell#!/bin/sh"),
            Err(FilenameError::DangerousPattern("#!/"))
        ));
    }

    #[test]
    fn test_validate_filename_reserved_names() {
        assert_eq!(
            validate_filename("con.txt"),
            Err(FilenameError::ReservedName("CON".to_string()))
        );
        assert_eq!(
            validate_filename("LPT1.pdf"),
            Err(FilenameError::ReservedName("LPT1".to_string()))
        );
        // Reserved only as the full stem
        assert!(validate_filename("conference.txt").is_ok());
    }

    #[test]
    fn test_clean_filename() {
        assert_eq!(clean_filename("my:file?.txt"), "my_file_.txt");
        assert_eq!(clean_filename("a//b\\\\c.png"), "a_b_c.png");
        assert_eq!(clean_filename("__already__clean__ "), "already_clean");
        assert_eq!(clean_filename("normal.pdf"), "normal.pdf");
    }

    #[test]
    fn test_validate_batch_size() {
        assert!(validate_batch_size(1).is_ok());
        assert!(validate_batch_size(MAX_BATCH_SIZE).is_ok());
        assert!(validate_batch_size(MAX_BATCH_SIZE + 1).is_err());
    }
}
