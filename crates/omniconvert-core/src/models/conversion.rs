use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::formats::FileCategory;

/// Outcome of a conversion attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConversionStatus {
    Completed,
    Failed,
}

/// A converted file held in the download center.
///
/// Entries are ephemeral: the bytes live in the spool directory under
/// `storage_key` until the entry is deleted, cleared, or expired.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConvertedFile {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub file_size: u64,
    pub storage_key: String,
    pub created_at: DateTime<Utc>,
}

/// One line of the conversion history.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversionRecord {
    pub id: Uuid,
    pub original_filename: String,
    /// Output filename; `None` when the conversion failed.
    pub output_filename: Option<String>,
    pub source_format: String,
    pub target_format: String,
    pub category: FileCategory,
    pub status: ConversionStatus,
    /// Client-facing error message for failed conversions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
    pub created_at: DateTime<Utc>,
}

impl ConversionRecord {
    pub fn completed(
        original_filename: String,
        output_filename: String,
        source_format: String,
        target_format: String,
        category: FileCategory,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_filename,
            output_filename: Some(output_filename),
            source_format,
            target_format,
            category,
            status: ConversionStatus::Completed,
            error: None,
            duration_ms,
            created_at: Utc::now(),
        }
    }

    pub fn failed(
        original_filename: String,
        source_format: String,
        target_format: String,
        category: FileCategory,
        error: String,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_filename,
            output_filename: None,
            source_format,
            target_format,
            category,
            status: ConversionStatus::Failed,
            error: Some(error),
            duration_ms,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_record() {
        let rec = ConversionRecord::completed(
            "a.png".into(),
            "a.jpg".into(),
            "png".into(),
            "jpg".into(),
            FileCategory::Image,
            42,
        );
        assert_eq!(rec.status, ConversionStatus::Completed);
        assert_eq!(rec.output_filename.as_deref(), Some("a.jpg"));
        assert!(rec.error.is_none());
    }

    #[test]
    fn test_failed_record_serializes_error() {
        let rec = ConversionRecord::failed(
            "a.mp4".into(),
            "mp4".into(),
            "avi".into(),
            FileCategory::Video,
            "ffmpeg exited with status 1".into(),
            1000,
        );
        let json = serde_json::to_value(&rec).expect("serialize");
        assert_eq!(json["status"], "failed");
        assert!(json["error"].as_str().unwrap().contains("ffmpeg"));
        assert!(json.get("output_filename").unwrap().is_null());
    }
}
