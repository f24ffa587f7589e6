//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use omniconvert_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Omniconvert API",
        version = "0.1.0",
        description = "Universal file converter: upload a document, image, audio, or video file, pick a target format, download the converted result. All conversion endpoints are versioned under /api/v0/."
    ),
    paths(
        // Conversions
        handlers::convert::create_conversion,
        handlers::batch::create_batch_conversion,
        handlers::download::list_conversions,
        handlers::download::download_file,
        handlers::download::delete_conversion,
        handlers::download::clear_conversions,
        handlers::archive::download_archive,
        // Metadata
        handlers::formats::list_formats,
        handlers::history::list_history,
        handlers::health::health,
    ),
    components(schemas(
        handlers::convert::ConversionResponse,
        handlers::batch::BatchItemResult,
        handlers::batch::BatchResponse,
        handlers::download::ClearResponse,
        handlers::formats::CategoryFormats,
        handlers::formats::FormatsResponse,
        handlers::health::HealthResponse,
        models::ConversionRecord,
        models::ConversionStatus,
        models::ConvertedFile,
        omniconvert_core::formats::FileCategory,
        error::ErrorResponse,
    )),
    tags(
        (name = "conversions", description = "Upload, convert, and download files"),
        (name = "formats", description = "Supported formats and limits"),
        (name = "history", description = "Conversion history"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_contains_conversion_paths() {
        let spec = ApiDoc::openapi();
        assert!(spec.paths.paths.contains_key("/api/v0/conversions"));
        assert!(spec.paths.paths.contains_key("/api/v0/conversions/batch"));
        assert!(spec.paths.paths.contains_key("/api/v0/formats"));
        assert!(spec.paths.paths.contains_key("/health"));
    }
}
