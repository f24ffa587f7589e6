//! Download center endpoints: list, fetch, delete, clear.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use omniconvert_core::{AppError, ConvertedFile};
use omniconvert_storage::StorageError;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// List the converted files ready for download, newest first.
#[utoipa::path(
    get,
    path = "/api/v0/conversions",
    tag = "conversions",
    responses(
        (status = 200, description = "Download center listing", body = [ConvertedFile])
    )
)]
pub async fn list_conversions(State(state): State<Arc<AppState>>) -> Json<Vec<ConvertedFile>> {
    Json(state.downloads.list().await)
}

/// Download a converted file.
#[utoipa::path(
    get,
    path = "/api/v0/conversions/{id}/file",
    tag = "conversions",
    params(
        ("id" = Uuid, Path, description = "Conversion ID")
    ),
    responses(
        (status = 200, description = "Converted file", content_type = "application/octet-stream"),
        (status = 404, description = "Converted file not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn download_file(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = state
        .downloads
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound("Converted file not found".to_string()))?;

    tracing::debug!(conversion_id = %id, storage_key = %file.storage_key, "Serving converted file");

    let data = state.spool.download(&file.storage_key).await.map_err(|e| {
        tracing::error!(error = %e, storage_key = %file.storage_key, "Failed to read spooled file");
        HttpAppError::from(e)
    })?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, file.content_type.as_str())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&file.filename),
        )
        .body(Body::from(data))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError(AppError::Internal(e.to_string()))
        })?;

    Ok(response)
}

/// Delete one converted file from the download center and the spool.
#[utoipa::path(
    delete,
    path = "/api/v0/conversions/{id}",
    tag = "conversions",
    params(
        ("id" = Uuid, Path, description = "Conversion ID")
    ),
    responses(
        (status = 204, description = "Converted file deleted"),
        (status = 404, description = "Converted file not found", body = ErrorResponse)
    )
)]
pub async fn delete_conversion(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, HttpAppError> {
    let file = state
        .downloads
        .remove(id)
        .await
        .ok_or_else(|| AppError::NotFound("Converted file not found".to_string()))?;

    remove_spooled(&state, &file).await;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearResponse {
    pub cleared: usize,
}

/// Clear the download center ("Clear Downloads").
#[utoipa::path(
    delete,
    path = "/api/v0/conversions",
    tag = "conversions",
    responses(
        (status = 200, description = "Download center cleared", body = ClearResponse)
    )
)]
pub async fn clear_conversions(State(state): State<Arc<AppState>>) -> Json<ClearResponse> {
    let drained = state.downloads.drain().await;
    let cleared = drained.len();

    for file in &drained {
        remove_spooled(&state, file).await;
    }

    tracing::info!(cleared, "Download center cleared");
    Json(ClearResponse { cleared })
}

/// Best-effort spool deletion; a missing file just means cleanup got there first.
async fn remove_spooled(state: &AppState, file: &ConvertedFile) {
    match state.spool.delete(&file.storage_key).await {
        Ok(()) | Err(StorageError::NotFound(_)) => {}
        Err(e) => {
            tracing::warn!(storage_key = %file.storage_key, error = %e, "Failed to delete spooled file");
        }
    }
}

/// `attachment` disposition with both the plain and RFC 5987 encoded name.
fn content_disposition(filename: &str) -> String {
    let encoded = utf8_percent_encode(filename, NON_ALPHANUMERIC);
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        filename.replace('"', "_"),
        encoded
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_plain() {
        let header = content_disposition("report.pdf");
        assert!(header.starts_with("attachment; filename=\"report.pdf\""));
        assert!(header.contains("filename*=UTF-8''report%2Epdf"));
    }

    #[test]
    fn test_content_disposition_escapes_quotes() {
        let header = content_disposition("we\"ird.txt");
        assert!(header.contains("filename=\"we_ird.txt\""));
    }
}
