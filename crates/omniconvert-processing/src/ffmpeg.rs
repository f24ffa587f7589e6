//! FFmpeg subprocess runner.
//!
//! Audio and video conversions shell out to the `ffmpeg` binary. Every
//! invocation is bounded by a timeout; a child that overruns it is killed.

use std::process::Stdio;
use std::time::Duration;

use omniconvert_core::AppError;
use tokio::process::Command;

/// Timeout for the `-version` availability probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs ffmpeg with a bounded execution time.
#[derive(Debug, Clone)]
pub struct FfmpegRunner {
    ffmpeg_path: String,
    timeout: Duration,
}

impl FfmpegRunner {
    pub fn new(ffmpeg_path: String, timeout: Duration) -> Result<Self, AppError> {
        // The path ends up on a command line; refuse anything shell-ish.
        let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
        if ffmpeg_path.chars().any(|c| dangerous_chars.contains(&c)) {
            return Err(AppError::InvalidInput(
                "Invalid ffmpeg path: contains dangerous characters".to_string(),
            ));
        }

        Ok(Self {
            ffmpeg_path,
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check that the ffmpeg binary can be executed.
    pub async fn is_available(&self) -> bool {
        let probe = Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(PROBE_TIMEOUT, probe).await {
            Ok(Ok(output)) => output.status.success(),
            _ => false,
        }
    }

    /// Execute ffmpeg with the given arguments.
    ///
    /// The child is killed if it outlives the configured timeout. A non-zero
    /// exit surfaces ffmpeg's stderr as a conversion error.
    pub async fn run(&self, args: &[String]) -> Result<(), AppError> {
        tracing::debug!(ffmpeg = %self.ffmpeg_path, args = ?args, "Running ffmpeg");

        let output = Command::new(&self.ffmpeg_path)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, output).await {
            Ok(result) => result.map_err(|e| {
                AppError::Conversion(format!("Failed to execute ffmpeg: {}", e))
            })?,
            // Dropping the output future kills the child (kill_on_drop).
            Err(_) => {
                return Err(AppError::ConversionTimeout {
                    seconds: self.timeout.as_secs(),
                })
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // ffmpeg's stderr is verbose; the failure reason is in the tail.
            let tail: String = stderr
                .lines()
                .rev()
                .take(5)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<Vec<_>>()
                .join("\n");
            return Err(AppError::Conversion(format!(
                "FFmpeg conversion failed: {}",
                tail.trim()
            )));
        }

        Ok(())
    }
}
