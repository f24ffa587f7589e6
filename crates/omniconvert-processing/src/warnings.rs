//! Conversion quality and compatibility warnings.
//!
//! Shown to the user alongside a successful conversion; never block one.

use omniconvert_core::formats::FileCategory;

/// Warnings about potential quality loss or compatibility issues for a
/// (source format, target format) pair.
pub fn conversion_warnings(
    source_format: &str,
    target_format: &str,
    category: FileCategory,
) -> Vec<String> {
    let source = source_format.to_lowercase();
    let target = target_format.to_lowercase();
    let mut warnings = Vec::new();

    match category {
        FileCategory::Image => {
            if matches!(source.as_str(), "png" | "gif") && matches!(target.as_str(), "jpg" | "jpeg")
            {
                warnings
                    .push("Converting from PNG/GIF to JPEG may lose transparency".to_string());
            }
            if source == "gif" && target != "gif" {
                warnings.push("Converting from animated GIF will lose animation".to_string());
            }
            if target == "gif" && source != "gif" {
                warnings
                    .push("Converting to GIF may reduce color quality (256 colors max)".to_string());
            }
        }
        FileCategory::Audio => {
            if matches!(source.as_str(), "flac" | "wav")
                && matches!(target.as_str(), "mp3" | "m4a" | "ogg")
            {
                warnings.push(
                    "Converting from lossless to lossy format will reduce quality".to_string(),
                );
            }
            if target == "wav" && source != "wav" {
                warnings.push("Converting to WAV will create larger file sizes".to_string());
            }
        }
        FileCategory::Video => {
            warnings.push("Video conversion may take several minutes".to_string());
            warnings.push("Video quality may be reduced to ensure compatibility".to_string());
        }
        FileCategory::Document => {
            if source == "pdf" && matches!(target.as_str(), "txt" | "docx") {
                warnings
                    .push("PDF text extraction may not preserve formatting".to_string());
            }
            if target == "txt" {
                warnings.push("Converting to TXT will lose all formatting".to_string());
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_to_jpeg_warns_transparency() {
        let warnings = conversion_warnings("png", "jpg", FileCategory::Image);
        assert!(warnings.iter().any(|w| w.contains("transparency")));
    }

    #[test]
    fn test_gif_to_png_warns_animation() {
        let warnings = conversion_warnings("gif", "png", FileCategory::Image);
        assert!(warnings.iter().any(|w| w.contains("animation")));
    }

    #[test]
    fn test_lossless_to_lossy_warns() {
        let warnings = conversion_warnings("flac", "mp3", FileCategory::Audio);
        assert!(warnings.iter().any(|w| w.contains("lossless")));
    }

    #[test]
    fn test_video_always_warns() {
        let warnings = conversion_warnings("mp4", "avi", FileCategory::Video);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_pdf_to_txt_warns_twice() {
        let warnings = conversion_warnings("pdf", "txt", FileCategory::Document);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_no_warnings_for_safe_conversion() {
        let warnings = conversion_warnings("jpg", "png", FileCategory::Image);
        assert!(warnings.is_empty());
    }
}
