//! Application initialization: spool, conversion service, state, routes.

pub mod routes;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use omniconvert_core::Config;
use omniconvert_processing::ConversionService;
use omniconvert_storage::{LocalSpool, Storage};

use crate::state::{AppState, DownloadCenter, HistoryStore};

/// Build the application state and router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router), anyhow::Error> {
    let spool: Arc<dyn Storage> = Arc::new(LocalSpool::new(config.spool_dir()).await?);

    let converter = ConversionService::new(
        config.ffmpeg_path().to_string(),
        Duration::from_secs(config.ffmpeg_timeout_secs()),
    )?;

    let state = Arc::new(AppState {
        downloads: DownloadCenter::default(),
        history: HistoryStore::new(config.history_limit()),
        config: config.clone(),
        converter,
        spool,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
