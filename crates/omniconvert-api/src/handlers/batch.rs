//! Batch conversion endpoint.
//!
//! Up to `MAX_BATCH_SIZE` files per request, each file part preceded by a
//! `target_format` text field. Items are converted in order; one item
//! failing never aborts its siblings, the failure is reported in that
//! item's slot instead.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use omniconvert_core::validation::validate_batch_size;
use omniconvert_core::{AppError, ConversionStatus, ErrorMetadata};
use serde::Serialize;
use utoipa::ToSchema;

use super::convert::{convert_and_spool, ConversionResponse, UploadedFile};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Outcome of one file in a batch.
#[derive(Debug, Serialize, ToSchema)]
pub struct BatchItemResult {
    pub original_filename: String,
    pub target_format: String,
    pub status: ConversionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion: Option<ConversionResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchResponse {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<BatchItemResult>,
}

/// Upload and convert up to ten files in one request.
#[utoipa::path(
    post,
    path = "/api/v0/conversions/batch",
    tag = "conversions",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Batch processed; per-item status inside", body = BatchResponse),
        (status = 400, description = "Invalid batch request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "create_batch_conversion"))]
pub async fn create_batch_conversion(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<BatchResponse>, HttpAppError> {
    let jobs = read_batch_upload(multipart).await?;

    if jobs.is_empty() {
        return Err(AppError::BadRequest("No files in batch request".to_string()).into());
    }
    validate_batch_size(jobs.len()).map_err(AppError::BadRequest)?;

    let total = jobs.len();
    let mut results = Vec::with_capacity(total);
    let mut succeeded = 0usize;

    for (file, target_format) in jobs {
        let original_filename = file.filename.clone();
        match convert_and_spool(&state, file, &target_format).await {
            Ok(conversion) => {
                succeeded += 1;
                results.push(BatchItemResult {
                    original_filename,
                    target_format: target_format.to_lowercase(),
                    status: ConversionStatus::Completed,
                    conversion: Some(conversion),
                    error: None,
                    code: None,
                });
            }
            Err(err) => {
                tracing::warn!(
                    filename = %original_filename,
                    target_format = %target_format,
                    error = %err,
                    "Batch item failed"
                );
                results.push(BatchItemResult {
                    original_filename,
                    target_format: target_format.to_lowercase(),
                    status: ConversionStatus::Failed,
                    conversion: None,
                    error: Some(err.client_message()),
                    code: Some(err.error_code().to_string()),
                });
            }
        }
    }

    Ok(Json(BatchResponse {
        total,
        succeeded,
        failed: total - succeeded,
        results,
    }))
}

/// Parse a batch multipart form into (file, target format) pairs.
///
/// Each `file` part consumes the most recent `target_format` field, so the
/// form is a sequence of target/file pairs.
async fn read_batch_upload(
    mut multipart: Multipart,
) -> Result<Vec<(UploadedFile, String)>, HttpAppError> {
    let mut jobs = Vec::new();
    let mut pending_target: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart request: {}", e)))?
    {
        match field.name() {
            Some("target_format") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read field: {}", e)))?;
                pending_target = Some(value);
            }
            Some("file") => {
                let target = pending_target.take().ok_or_else(|| {
                    AppError::BadRequest(
                        "Each 'file' part must be preceded by a 'target_format' field".to_string(),
                    )
                })?;
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| AppError::BadRequest("File part has no filename".to_string()))?;
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?;
                jobs.push((
                    UploadedFile {
                        filename,
                        content_type,
                        data,
                    },
                    target,
                ));
            }
            _ => {}
        }
    }

    Ok(jobs)
}
