//! Route configuration and setup.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Json, Router,
};
use omniconvert_core::Config;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::api_doc::ApiDoc;
use crate::constants;
use crate::handlers::{archive, batch, convert, download, formats, health, history};
use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

// Multipart framing overhead on top of the largest accepted file.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let api = Router::new()
        .route(
            "/conversions",
            post(convert::create_conversion)
                .get(download::list_conversions)
                .delete(download::clear_conversions),
        )
        .route("/conversions/batch", post(batch::create_batch_conversion))
        .route("/conversions/archive", get(archive::download_archive))
        .route("/conversions/{id}", delete(download::delete_conversion))
        .route("/conversions/{id}/file", get(download::download_file))
        .route("/formats", get(formats::list_formats))
        .route("/history", get(history::list_history));

    let assets_dir = PathBuf::from(config.static_assets_dir());
    let static_service =
        ServeDir::new(&assets_dir).fallback(ServeFile::new(assets_dir.join("index.html")));

    let app = Router::new()
        .nest(constants::API_PREFIX, api)
        .route("/health", get(health::health))
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .with_state(state)
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .nest_service("/static", ServeDir::new(&assets_dir))
        .fallback_service(static_service)
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit()))
        .layer(RequestBodyLimitLayer::new(
            config.max_request_body_size() + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn(security_headers_middleware));

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins().iter().map(|o| o.parse()).collect();
        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
