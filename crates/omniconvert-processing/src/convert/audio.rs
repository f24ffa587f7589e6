//! Audio converter.
//!
//! All audio work goes through ffmpeg: the input container is whatever
//! ffmpeg can demux, the output codec comes from a per-format table.

use std::time::Duration;

use bytes::Bytes;
use omniconvert_core::formats::mime_type_for;
use omniconvert_core::AppError;

use super::ConvertedOutput;
use crate::ffmpeg::FfmpegRunner;

pub struct AudioConverter {
    runner: FfmpegRunner,
}

impl AudioConverter {
    pub fn new(ffmpeg_path: String, timeout: Duration) -> Result<Self, AppError> {
        Ok(Self {
            runner: FfmpegRunner::new(ffmpeg_path, timeout)?,
        })
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
                omniconvert_core::FileCategory::Audio,
            ));
        }

        // The input suffix lets ffmpeg fall back to extension-based demuxer
        // detection for containers with weak magic (e.g. raw AAC).
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
            "-vn".to_string(),
        ];
        args.extend(encode_args(target)?);
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

/// Codec and muxer arguments per output format.
fn encode_args(target: &str) -> Result<Vec<String>, AppError> {
    let args: &[&str] = match target {
        "mp3" => &["-acodec", "libmp3lame", "-b:a", "192k", "-f", "mp3"],
        "wav" => &["-acodec", "pcm_s16le", "-f", "wav"],
        // ffmpeg's m4a muxer is "ipod"
        "m4a" => &["-acodec", "aac", "-f", "ipod"],
        "ogg" => &["-acodec", "libvorbis", "-f", "ogg"],
        "flac" => &["-acodec", "flac", "-f", "flac"],
        other => {
            return Err(AppError::UnsupportedConversion {
                source_format: "audio".to_string(),
                target_format: other.to_string(),
            })
        }
    };
    Ok(args.iter().map(|s| s.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_args_mp3() {
        let args = encode_args("mp3").unwrap();
        assert!(args.contains(&"libmp3lame".to_string()));
        assert!(args.contains(&"192k".to_string()));
    }

    #[test]
    fn test_encode_args_m4a_uses_ipod_muxer() {
        let args = encode_args("m4a").unwrap();
        assert!(args.contains(&"aac".to_string()));
        assert!(args.contains(&"ipod".to_string()));
    }

    #[test]
    fn test_encode_args_wav_is_pcm() {
        let args = encode_args("wav").unwrap();
        assert!(args.contains(&"pcm_s16le".to_string()));
    }

    #[test]
    fn test_encode_args_unknown_target() {
        assert!(matches!(
            encode_args("xyz"),
            Err(AppError::UnsupportedConversion { .. })
        ));
    }
}
