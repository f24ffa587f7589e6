//! Supported-formats listing (the UI sidebar content).

use std::sync::Arc;

use axum::{extract::State, Json};
use omniconvert_core::formats::{format_file_size, FileCategory};
use omniconvert_core::validation::MAX_BATCH_SIZE;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryFormats {
    pub category: FileCategory,
    pub input_formats: Vec<String>,
    pub output_formats: Vec<String>,
    pub max_file_size_bytes: u64,
    /// Human readable size limit (e.g. "100.0 MB")
    pub max_file_size: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FormatsResponse {
    pub categories: Vec<CategoryFormats>,
    pub max_batch_size: usize,
}

/// List supported input/output formats and limits per category.
#[utoipa::path(
    get,
    path = "/api/v0/formats",
    tag = "formats",
    responses(
        (status = 200, description = "Supported formats and limits", body = FormatsResponse)
    )
)]
pub async fn list_formats(State(state): State<Arc<AppState>>) -> Json<FormatsResponse> {
    let categories = [
        FileCategory::Document,
        FileCategory::Image,
        FileCategory::Audio,
        FileCategory::Video,
    ]
    .into_iter()
    .map(|category| {
        let max = state.config.max_file_size(category) as u64;
        CategoryFormats {
            category,
            input_formats: category
                .input_extensions()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            output_formats: category
                .supported_outputs()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_size_bytes: max,
            max_file_size: format_file_size(max),
        }
    })
    .collect();

    Json(FormatsResponse {
        categories,
        max_batch_size: MAX_BATCH_SIZE,
    })
}
