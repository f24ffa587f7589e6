//! Video converter.
//!
//! Wraps ffmpeg with per-container argument tables. Video is the slowest
//! conversion path, so the runner's timeout matters most here.

use std::time::Duration;

use bytes::Bytes;
use omniconvert_core::formats::mime_type_for;
use omniconvert_core::AppError;

use super::ConvertedOutput;
use crate::ffmpeg::FfmpegRunner;

pub struct VideoConverter {
    runner: FfmpegRunner,
}

impl VideoConverter {
    pub fn new(ffmpeg_path: String, timeout: Duration) -> Result<Self, AppError> {
        Ok(Self {
            runner: FfmpegRunner::new(ffmpeg_path, timeout)?,
        })
    }

    pub async fn is_available(&self) -> bool {
        self.runner.is_available().await
    }

    pub async fn convert(
        &self,
        data: &[u8],
        source_ext: &str,
        target: &str,
        output_filename: String,
    ) -> Result<ConvertedOutput, AppError> {
        if !self.runner.is_available().await {
            return Err(AppError::FfmpegUnavailable(
                omniconvert_core::FileCategory::Video,
            ));
        }

        let input_temp = tempfile::Builder::new()
            .suffix(&format!(".{}", source_ext))
            .tempfile()?;
        tokio::fs::write(input_temp.path(), data).await?;

        let output_temp = tempfile::Builder::new()
            .suffix(&format!(".{}", target))
            .tempfile()?;

        let mut args = vec![
            "-i".to_string(),
            input_temp.path().to_string_lossy().to_string(),
            "-y".to_string(),
        ];
        args.extend(encode_args(target));
        args.push(output_temp.path().to_string_lossy().to_string());

        self.runner.run(&args).await?;

        let output_data = tokio::fs::read(output_temp.path()).await?;
        Ok(ConvertedOutput {
            data: Bytes::from(output_data),
            filename: output_filename,
            content_type: mime_type_for(target),
        })
    }
}

/// Encoder arguments per output container. Unknown containers get a generic
/// invocation and ffmpeg picks its defaults from the output suffix.
fn encode_args(target: &str) -> Vec<String> {
    let args: &[&str] = match target {
        // High compatibility MP4
        "mp4" => &[
            "-c:v",
            "libx264",
            "-c:a",
            "aac",
            "-preset",
            "medium",
            "-crf",
            "23",
            "-movflags",
            "+faststart",
        ],
        // Standard AVI
        "avi" => &[
            "-c:v",
            "libx264",
            "-c:a",
            "libmp3lame",
            "-preset",
            "medium",
            "-crf",
            "23",
        ],
        // QuickTime MOV
        "mov" => &[
            "-c:v",
            "libx264",
            "-c:a",
            "aac",
            "-preset",
            "medium",
            "-crf",
            "23",
        ],
        // WebM for web
        "webm" => &["-c:v", "libvpx-vp9", "-c:a", "libopus", "-crf", "30", "-b:v", "0"],
        // Matroska container
        "mkv" => &[
            "-c:v",
            "libx264",
            "-c:a",
            "aac",
            "-preset",
            "medium",
            "-crf",
            "23",
        ],
        _ => &[],
    };
    args.iter().map(|s| s.to_string()).collect()
}
