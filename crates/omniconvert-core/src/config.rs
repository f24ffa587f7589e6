//! Configuration module
//!
//! This module provides the configuration structure for the converter
//! service: server settings, per-category upload limits, ffmpeg settings,
//! and spool retention.

use std::env;

use crate::formats;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_FILE_SIZE_MB: usize = 100;
const MAX_VIDEO_SIZE_MB: usize = 50;
const FFMPEG_TIMEOUT_SECS: u64 = 300;
const SPOOL_RETENTION_SECS: u64 = 3600;
const CLEANUP_INTERVAL_SECS: u64 = 60;
const HISTORY_LIMIT: usize = 100;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Converter service configuration
#[derive(Clone, Debug)]
pub struct ConverterConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    // Spool for converted outputs
    pub spool_dir: String,
    pub spool_retention_secs: u64,
    pub cleanup_interval_secs: u64,
    // Static web UI / PWA assets
    pub static_assets_dir: String,
    // FFmpeg configuration
    pub ffmpeg_path: String,
    pub ffmpeg_timeout_secs: u64,
    // Per-category upload limits
    pub document_max_file_size: usize,
    pub image_max_file_size: usize,
    pub audio_max_file_size: usize,
    pub video_max_file_size: usize,
    // History
    pub history_limit: usize,
    // HTTP
    pub http_concurrency_limit: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ConverterConfig>);

impl Config {
    fn inner(&self) -> &ConverterConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        Ok(Config(Box::new(ConverterConfig::from_env()?)))
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn spool_dir(&self) -> &str {
        &self.inner().spool_dir
    }

    pub fn spool_retention_secs(&self) -> u64 {
        self.inner().spool_retention_secs
    }

    pub fn cleanup_interval_secs(&self) -> u64 {
        self.inner().cleanup_interval_secs
    }

    pub fn static_assets_dir(&self) -> &str {
        &self.inner().static_assets_dir
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.inner().ffmpeg_path
    }

    pub fn ffmpeg_timeout_secs(&self) -> u64 {
        self.inner().ffmpeg_timeout_secs
    }

    pub fn document_max_file_size(&self) -> usize {
        self.inner().document_max_file_size
    }

    pub fn image_max_file_size(&self) -> usize {
        self.inner().image_max_file_size
    }

    pub fn audio_max_file_size(&self) -> usize {
        self.inner().audio_max_file_size
    }

    pub fn video_max_file_size(&self) -> usize {
        self.inner().video_max_file_size
    }

    /// Size limit for a given category.
    pub fn max_file_size(&self, category: formats::FileCategory) -> usize {
        match category {
            formats::FileCategory::Document => self.document_max_file_size(),
            formats::FileCategory::Image => self.image_max_file_size(),
            formats::FileCategory::Audio => self.audio_max_file_size(),
            formats::FileCategory::Video => self.video_max_file_size(),
        }
    }

    /// Largest configured size limit, for the request body cap.
    pub fn max_request_body_size(&self) -> usize {
        self.document_max_file_size()
            .max(self.image_max_file_size())
            .max(self.audio_max_file_size())
            .max(self.video_max_file_size())
    }

    pub fn history_limit(&self) -> usize {
        self.inner().history_limit
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().http_concurrency_limit
    }
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl ConverterConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        Ok(Self {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            spool_dir: env::var("SPOOL_DIR").unwrap_or_else(|_| "./data/converted".to_string()),
            spool_retention_secs: env_u64("SPOOL_RETENTION_SECS", SPOOL_RETENTION_SECS),
            cleanup_interval_secs: env_u64("CLEANUP_INTERVAL_SECS", CLEANUP_INTERVAL_SECS),
            static_assets_dir: env::var("STATIC_ASSETS_DIR")
                .unwrap_or_else(|_| "./assets".to_string()),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffmpeg_timeout_secs: env_u64("FFMPEG_TIMEOUT_SECS", FFMPEG_TIMEOUT_SECS),
            document_max_file_size: env_usize("MAX_DOCUMENT_SIZE_MB", MAX_FILE_SIZE_MB)
                * 1024
                * 1024,
            image_max_file_size: env_usize("MAX_IMAGE_SIZE_MB", MAX_FILE_SIZE_MB) * 1024 * 1024,
            audio_max_file_size: env_usize("MAX_AUDIO_SIZE_MB", MAX_FILE_SIZE_MB) * 1024 * 1024,
            video_max_file_size: env_usize("MAX_VIDEO_SIZE_MB", MAX_VIDEO_SIZE_MB) * 1024 * 1024,
            history_limit: env_usize("HISTORY_LIMIT", HISTORY_LIMIT),
            http_concurrency_limit: env_usize("HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT)
                .max(1),
        })
    }
}
