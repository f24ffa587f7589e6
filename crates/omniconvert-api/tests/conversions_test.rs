//! Conversion API integration tests.
//!
//! Run with: `cargo test -p omniconvert-api --test conversions_test`
//! Image and document conversions only; nothing here needs ffmpeg.

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{api_path, setup_test_app};
use serde_json::Value;

fn png_upload(target: &str) -> MultipartForm {
    MultipartForm::new().add_text("target_format", target).add_part(
        "file",
        Part::bytes(helpers::fixtures::create_test_png())
            .file_name("photo.png")
            .mime_type("image/png"),
    )
}

#[tokio::test]
async fn test_convert_png_to_jpeg() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post(&api_path("/conversions"))
        .multipart(png_upload("jpg"))
        .await;

    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    assert_eq!(body["output_filename"], "photo.jpg");
    assert_eq!(body["content_type"], "image/jpeg");
    assert_eq!(body["category"], "image");
    assert_eq!(body["source_format"], "png");
    assert_eq!(body["target_format"], "jpg");
    assert!(body["file_size"].as_u64().unwrap() > 0);
    assert!(body["download_url"].as_str().unwrap().ends_with("/file"));
}

#[tokio::test]
async fn test_converted_file_download() {
    let app = setup_test_app().await;
    let client = app.client();

    let created: Value = client
        .post(&api_path("/conversions"))
        .multipart(png_upload("jpg"))
        .await
        .json();

    let download_url = created["download_url"].as_str().unwrap().to_string();
    let response = client.get(&download_url).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.header("content-type").to_str().unwrap(),
        "image/jpeg"
    );
    let disposition = response.header("content-disposition");
    assert!(disposition
        .to_str()
        .unwrap()
        .contains("attachment; filename=\"photo.jpg\""));
    // JPEG SOI marker
    let bytes = response.as_bytes();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}

#[tokio::test]
async fn test_convert_txt_to_pdf() {
    let app = setup_test_app().await;
    let client = app.client();

    let form = MultipartForm::new().add_text("target_format", "pdf").add_part(
        "file",
        Part::bytes(b"hello converter\nsecond line".to_vec())
            .file_name("notes.txt")
            .mime_type("text/plain"),
    );

    let response = client.post(&api_path("/conversions")).multipart(form).await;
    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    assert_eq!(body["output_filename"], "notes.pdf");

    let download = client
        .get(body["download_url"].as_str().unwrap())
        .await;
    assert_eq!(&download.as_bytes()[..5], b"%PDF-");
}

#[tokio::test]
async fn test_conversion_includes_warnings() {
    let app = setup_test_app().await;
    let client = app.client();

    // PNG -> JPEG warns about transparency loss
    let response = client
        .post(&api_path("/conversions"))
        .multipart(png_upload("jpg"))
        .await;
    let body: Value = response.json();
    let warnings = body["warnings"].as_array().unwrap();
    assert!(warnings
        .iter()
        .any(|w| w.as_str().unwrap().contains("transparency")));
}

#[tokio::test]
async fn test_download_center_list_and_clear() {
    let app = setup_test_app().await;
    let client = app.client();

    client
        .post(&api_path("/conversions"))
        .multipart(png_upload("bmp"))
        .await;
    client
        .post(&api_path("/conversions"))
        .multipart(png_upload("webp"))
        .await;

    let listing: Value = client.get(&api_path("/conversions")).await.json();
    assert_eq!(listing.as_array().unwrap().len(), 2);
    // Newest first
    assert_eq!(listing[0]["filename"], "photo.webp");

    let cleared: Value = client.delete(&api_path("/conversions")).await.json();
    assert_eq!(cleared["cleared"], 2);

    let listing: Value = client.get(&api_path("/conversions")).await.json();
    assert!(listing.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_single_conversion() {
    let app = setup_test_app().await;
    let client = app.client();

    let created: Value = client
        .post(&api_path("/conversions"))
        .multipart(png_upload("jpg"))
        .await
        .json();
    let id = created["id"].as_str().unwrap().to_string();

    let response = client
        .delete(&api_path(&format!("/conversions/{}", id)))
        .await;
    assert_eq!(response.status_code(), 204);

    // Gone from the listing and the spool
    let response = client
        .get(&api_path(&format!("/conversions/{}/file", id)))
        .await;
    assert_eq!(response.status_code(), 404);

    let response = client
        .delete(&api_path(&format!("/conversions/{}", id)))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_batch_conversion_mixed_results() {
    let app = setup_test_app().await;
    let client = app.client();

    let form = MultipartForm::new()
        .add_text("target_format", "jpg")
        .add_part(
            "file",
            Part::bytes(helpers::fixtures::create_test_png())
                .file_name("good.png")
                .mime_type("image/png"),
        )
        .add_text("target_format", "jpg")
        .add_part(
            "file",
            Part::bytes(b"this is not an image".to_vec())
                .file_name("broken.png")
                .mime_type("image/png"),
        );

    let response = client
        .post(&api_path("/conversions/batch"))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["total"], 2);
    assert_eq!(body["succeeded"], 1);
    assert_eq!(body["failed"], 1);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["status"], "completed");
    assert_eq!(results[0]["conversion"]["output_filename"], "good.jpg");
    assert_eq!(results[1]["status"], "failed");
    assert!(results[1]["error"].as_str().unwrap().len() > 0);
}

#[tokio::test]
async fn test_archive_download() {
    let app = setup_test_app().await;
    let client = app.client();

    // Empty download center -> 404
    let response = client.get(&api_path("/conversions/archive")).await;
    assert_eq!(response.status_code(), 404);

    client
        .post(&api_path("/conversions"))
        .multipart(png_upload("jpg"))
        .await;
    client
        .post(&api_path("/conversions"))
        .multipart(png_upload("bmp"))
        .await;

    let response = client.get(&api_path("/conversions/archive")).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.header("content-type").to_str().unwrap(),
        "application/zip"
    );
    assert!(response
        .header("content-disposition")
        .to_str()
        .unwrap()
        .contains("converted_files_"));
    assert_eq!(&response.as_bytes()[..2], b"PK");
}

#[tokio::test]
async fn test_history_records_success_and_failure() {
    let app = setup_test_app().await;
    let client = app.client();

    client
        .post(&api_path("/conversions"))
        .multipart(png_upload("jpg"))
        .await;

    // Valid extension and content type but corrupt data: fails in conversion
    let form = MultipartForm::new().add_text("target_format", "jpg").add_part(
        "file",
        Part::bytes(b"garbage".to_vec())
            .file_name("corrupt.png")
            .mime_type("image/png"),
    );
    let response = client.post(&api_path("/conversions")).multipart(form).await;
    assert_eq!(response.status_code(), 422);

    let history: Value = client.get(&api_path("/history")).await.json();
    let records = history.as_array().unwrap();
    assert_eq!(records.len(), 2);
    // Newest first
    assert_eq!(records[0]["status"], "failed");
    assert_eq!(records[0]["original_filename"], "corrupt.png");
    assert!(records[0]["error"].as_str().unwrap().len() > 0);
    assert_eq!(records[1]["status"], "completed");
    assert_eq!(records[1]["output_filename"], "photo.jpg");
}

#[tokio::test]
async fn test_formats_listing() {
    let app = setup_test_app().await;
    let client = app.client();

    let body: Value = client.get(&api_path("/formats")).await.json();
    assert_eq!(body["max_batch_size"], 10);

    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 4);

    let image = categories
        .iter()
        .find(|c| c["category"] == "image")
        .unwrap();
    assert!(image["output_formats"]
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f == "jpg"));
    assert_eq!(image["max_file_size"], "100.0 MB");

    let video = categories
        .iter()
        .find(|c| c["category"] == "video")
        .unwrap();
    assert_eq!(video["max_file_size"], "50.0 MB");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client.get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["ffmpeg_available"].is_boolean());
}

#[tokio::test]
async fn test_openapi_spec_served() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client.get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["paths"]["/api/v0/conversions"].is_object());
}
