//! Conversion dispatch.
//!
//! `ConversionService` owns one converter per media category and routes an
//! uploaded file to the right one based on its extension. Converters return
//! the converted bytes plus the output filename and MIME type.

pub mod audio;
pub mod document;
pub mod image;
pub mod video;

use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use omniconvert_core::formats::{extension_of, FileCategory};
use omniconvert_core::validation::clean_filename;
use omniconvert_core::AppError;

pub use audio::AudioConverter;
pub use document::DocumentConverter;
pub use image::ImageConverter;
pub use video::VideoConverter;

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConvertedOutput {
    pub data: Bytes,
    pub filename: String,
    pub content_type: &'static str,
}

/// Output filename: sanitized input stem plus the target extension.
pub fn output_filename(original_filename: &str, target_format: &str) -> String {
    let cleaned = clean_filename(original_filename);
    let stem = Path::new(&cleaned)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("converted");
    format!("{}.{}", stem, target_format.to_lowercase())
}

/// Normalize a requested target format: lowercase, no leading dot, and the
/// jpeg alias folded onto jpg.
pub fn normalize_target(target: &str) -> String {
    let t = target.trim().trim_start_matches('.').to_lowercase();
    if t == "jpeg" {
        "jpg".to_string()
    } else {
        t
    }
}

/// Routes uploads to the per-category converters.
pub struct ConversionService {
    image: ImageConverter,
    audio: AudioConverter,
    video: VideoConverter,
    document: DocumentConverter,
}

impl ConversionService {
    pub fn new(ffmpeg_path: String, ffmpeg_timeout: Duration) -> Result<Self, AppError> {
        Ok(Self {
            image: ImageConverter::new(),
            audio: AudioConverter::new(ffmpeg_path.clone(), ffmpeg_timeout)?,
            video: VideoConverter::new(ffmpeg_path, ffmpeg_timeout)?,
            document: DocumentConverter::new(),
        })
    }

    /// Convert `data` to `target_format`, returning the output and the
    /// detected category of the input.
    ///
    /// The caller is expected to have run filename and upload validation
    /// already; this re-derives the category and rejects target formats the
    /// category does not offer.
    pub async fn convert(
        &self,
        original_filename: &str,
        data: &[u8],
        target_format: &str,
    ) -> Result<(ConvertedOutput, FileCategory), AppError> {
        let extension = extension_of(original_filename).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Missing file extension (filename: {})",
                original_filename
            ))
        })?;

        let category = FileCategory::from_extension(&extension)
            .ok_or_else(|| AppError::UnsupportedFileType(format!("Unsupported file type: .{}", extension)))?;

        let target = normalize_target(target_format);
        if !category.supports_output(&target) {
            return Err(AppError::UnsupportedConversion {
                source_format: extension,
                target_format: target,
            });
        }

        let out_name = output_filename(original_filename, &target);

        let output = match category {
            FileCategory::Image => self.image.convert(data, &target, out_name).await?,
            FileCategory::Audio => {
                self.audio
                    .convert(data, &extension, &target, out_name)
                    .await?
            }
            FileCategory::Video => {
                self.video
                    .convert(data, &extension, &target, out_name)
                    .await?
            }
            FileCategory::Document => {
                self.document
                    .convert(data, &extension, &target, out_name)
                    .await?
            }
        };

        Ok((output, category))
    }

    /// ffmpeg availability, for the health endpoint.
    pub async fn ffmpeg_available(&self) -> bool {
        self.video.is_available().await
    }
}
