//! "Download all as ZIP" endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use omniconvert_core::AppError;
use omniconvert_processing::archive::create_zip_archive;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Download every converted file as a single ZIP archive.
#[utoipa::path(
    get,
    path = "/api/v0/conversions/archive",
    tag = "conversions",
    responses(
        (status = 200, description = "ZIP archive of all converted files", content_type = "application/zip"),
        (status = 404, description = "No converted files available", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn download_archive(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let files = state.downloads.list().await;
    if files.is_empty() {
        return Err(AppError::NotFound("No converted files available".to_string()).into());
    }

    let items = files
        .into_iter()
        .map(|f| (f.id, f.storage_key, f.filename))
        .collect::<Vec<_>>();
    let count = items.len();

    let archive = create_zip_archive(state.spool.clone(), items)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build ZIP archive");
            HttpAppError::from(e)
        })?;

    let filename = format!("converted_files_{}.zip", Utc::now().timestamp());
    tracing::info!(files = count, archive_bytes = archive.len(), "Serving ZIP archive");

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(archive))
        .map_err(|e| HttpAppError(AppError::Internal(e.to_string())))?;

    Ok(response)
}
