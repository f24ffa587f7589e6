//! Single-file conversion endpoint.
//!
//! `POST /api/v0/conversions` takes a multipart form with a `target_format`
//! text field and a `file` part, runs validation and conversion, spools the
//! output, and records the attempt in the history.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use omniconvert_core::formats::{extension_of, FileCategory};
use omniconvert_core::validation::validate_filename;
use omniconvert_core::{AppError, ConversionRecord, ConvertedFile, ErrorMetadata};
use omniconvert_processing::convert::normalize_target;
use omniconvert_processing::{conversion_warnings, validator_for_category};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::constants::API_PREFIX;
use crate::error::{validation_error_to_app, ErrorResponse, HttpAppError};
use crate::state::AppState;

/// A file pulled out of a multipart request.
pub(crate) struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Result of a successful conversion, as returned to the client.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversionResponse {
    pub id: Uuid,
    pub original_filename: String,
    pub output_filename: String,
    pub content_type: String,
    pub file_size: u64,
    pub category: FileCategory,
    pub source_format: String,
    pub target_format: String,
    pub warnings: Vec<String>,
    pub duration_ms: u64,
    pub download_url: String,
}

/// Upload and convert a single file.
///
/// # Errors
/// - `AppError::InvalidInput` - Invalid file, filename, or parameters
/// - `AppError::PayloadTooLarge` - File exceeds the category size limit
/// - `AppError::UnsupportedConversion` - Target format not offered for the category
/// - `AppError::Conversion` - The underlying library/ffmpeg call failed
#[utoipa::path(
    post,
    path = "/api/v0/conversions",
    tag = "conversions",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File converted successfully", body = ConversionResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 422, description = "Conversion failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "create_conversion"))]
pub async fn create_conversion(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ConversionResponse>), HttpAppError> {
    let (file, target_format) = read_single_upload(multipart).await?;

    let response = convert_and_spool(&state, file, &target_format)
        .await
        .map_err(HttpAppError::from)?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Pull the `file` part and `target_format` field out of a multipart form.
pub(crate) async fn read_single_upload(
    mut multipart: Multipart,
) -> Result<(UploadedFile, String), HttpAppError> {
    let mut file: Option<UploadedFile> = None;
    let mut target_format: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart request: {}", e)))?
    {
        match field.name() {
            Some("file") => {
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
                file = Some(UploadedFile {
                    filename,
                    content_type,
                    data,
                });
            }
            Some("target_format") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read field: {}", e)))?;
                target_format = Some(value);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::BadRequest("Missing 'file' part".to_string()))?;
    let target_format = target_format
        .ok_or_else(|| AppError::BadRequest("Missing 'target_format' field".to_string()))?;

    Ok((file, target_format))
}

/// The shared conversion pipeline: validate, convert, spool, record.
///
/// Used by the single-file endpoint and per item by the batch endpoint.
pub(crate) async fn convert_and_spool(
    state: &AppState,
    file: UploadedFile,
    target_format: &str,
) -> Result<ConversionResponse, AppError> {
    let started = Instant::now();
    let target_format = normalize_target(target_format);

    validate_filename(&file.filename).map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let source_format = extension_of(&file.filename).ok_or_else(|| {
        AppError::InvalidInput(format!("Missing file extension (filename: {})", file.filename))
    })?;
    let category = FileCategory::from_extension(&source_format).ok_or_else(|| {
        AppError::UnsupportedFileType(format!("Unsupported file type: .{}", source_format))
    })?;

    let validator = validator_for_category(&state.config, category);
    validator
        .validate_all(&file.filename, &file.content_type, file.data.len())
        .map_err(validation_error_to_app)?;

    tracing::info!(
        filename = %file.filename,
        category = %category,
        source_format = %source_format,
        target_format = %target_format,
        file_size = file.data.len(),
        "Starting conversion"
    );

    let (output, category) = match state
        .converter
        .convert(&file.filename, &file.data, &target_format)
        .await
    {
        Ok(result) => result,
        Err(err) => {
            let duration_ms = started.elapsed().as_millis() as u64;
            state
                .history
                .record(ConversionRecord::failed(
                    file.filename.clone(),
                    source_format.clone(),
                    target_format.clone(),
                    category,
                    err.client_message(),
                    duration_ms,
                ))
                .await;
            return Err(err);
        }
    };

    let id = Uuid::new_v4();
    let file_size = output.data.len() as u64;
    let storage_key = state
        .spool
        .upload(id, &output.filename, output.data.to_vec())
        .await
        .map_err(crate::error::storage_error_to_app)?;

    let converted = ConvertedFile {
        id,
        filename: output.filename.clone(),
        content_type: output.content_type.to_string(),
        file_size,
        storage_key,
        created_at: Utc::now(),
    };
    state.downloads.insert(converted).await;

    let duration_ms = started.elapsed().as_millis() as u64;
    state
        .history
        .record(ConversionRecord::completed(
            file.filename.clone(),
            output.filename.clone(),
            source_format.clone(),
            target_format.clone(),
            category,
            duration_ms,
        ))
        .await;

    tracing::info!(
        conversion_id = %id,
        output_filename = %output.filename,
        duration_ms,
        "Conversion completed"
    );

    let warnings = conversion_warnings(&source_format, &target_format, category);

    Ok(ConversionResponse {
        id,
        original_filename: file.filename,
        output_filename: output.filename,
        content_type: output.content_type.to_string(),
        file_size,
        category,
        source_format,
        target_format,
        warnings,
        duration_ms,
        download_url: format!("{}/conversions/{}/file", API_PREFIX, id),
    })
}
