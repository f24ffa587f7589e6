//! Test helpers: build the app and router for integration tests.
//!
//! Run from workspace root: `cargo test -p omniconvert-api --test conversions_test`
//! or `cargo test -p omniconvert-api`. No external services are required;
//! the spool lives in a per-test temp directory.

pub mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use omniconvert_api::constants;
use omniconvert_api::setup::routes;
use omniconvert_api::state::{AppState, DownloadCenter, HistoryStore};
use omniconvert_core::{Config, ConverterConfig};
use omniconvert_processing::ConversionService;
use omniconvert_storage::{LocalSpool, Storage};
use tempfile::TempDir;

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

fn test_config(spool_dir: String, assets_dir: String) -> Config {
    Config(Box::new(ConverterConfig {
        server_port: 0,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        spool_dir,
        spool_retention_secs: 3600,
        cleanup_interval_secs: 60,
        static_assets_dir: assets_dir,
        ffmpeg_path: "ffmpeg".to_string(),
        ffmpeg_timeout_secs: 300,
        document_max_file_size: 100 * 1024 * 1024,
        image_max_file_size: 100 * 1024 * 1024,
        audio_max_file_size: 100 * 1024 * 1024,
        video_max_file_size: 50 * 1024 * 1024,
        history_limit: 100,
        http_concurrency_limit: 64,
    }))
}

/// Setup a test app with an isolated spool directory.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup a test app, letting the caller tweak the configuration first.
pub async fn setup_test_app_with(mutate: impl FnOnce(&mut ConverterConfig)) -> TestApp {
    let temp_dir = TempDir::new().expect("temp dir");
    let spool_dir = temp_dir.path().join("spool");
    let assets_dir = temp_dir.path().join("assets");
    std::fs::create_dir_all(&assets_dir).expect("assets dir");
    std::fs::write(assets_dir.join("index.html"), "<html></html>").expect("index.html");

    let mut config = test_config(
        spool_dir.to_string_lossy().to_string(),
        assets_dir.to_string_lossy().to_string(),
    );
    mutate(&mut config.0);

    let spool: Arc<dyn Storage> = Arc::new(
        LocalSpool::new(config.spool_dir())
            .await
            .expect("spool setup"),
    );
    let converter = ConversionService::new(
        config.ffmpeg_path().to_string(),
        Duration::from_secs(config.ffmpeg_timeout_secs()),
    )
    .expect("conversion service");

    let state = Arc::new(AppState {
        downloads: DownloadCenter::default(),
        history: HistoryStore::new(config.history_limit()),
        config: config.clone(),
        converter,
        spool,
    });

    let router = routes::setup_routes(&config, state).expect("router setup");
    let server = TestServer::new(router).expect("test server");

    TestApp {
        server,
        _temp_dir: temp_dir,
    }
}
