//! Upload validation integration tests.
//!
//! Run with: `cargo test -p omniconvert-api --test validation_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{api_path, setup_test_app, setup_test_app_with};
use serde_json::Value;

#[tokio::test]
async fn test_rejects_unsupported_file_type() {
    let app = setup_test_app().await;
    let client = app.client();

    let form = MultipartForm::new().add_text("target_format", "png").add_part(
        "file",
        Part::bytes(b"MZ\x90\x00".to_vec())
            .file_name("malware.exe")
            .mime_type("application/octet-stream"),
    );

    let response = client.post(&api_path("/conversions")).multipart(form).await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNSUPPORTED_FILE_TYPE");
}

#[tokio::test]
async fn test_rejects_oversized_file() {
    let app = setup_test_app_with(|cfg| {
        cfg.image_max_file_size = 1024; // 1 KB
    })
    .await;
    let client = app.client();

    let form = MultipartForm::new().add_text("target_format", "jpg").add_part(
        "file",
        Part::bytes(vec![0u8; 4096])
            .file_name("big.png")
            .mime_type("image/png"),
    );

    let response = client.post(&api_path("/conversions")).multipart(form).await;
    assert_eq!(response.status_code(), 413);
    let body: Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_rejects_empty_file() {
    let app = setup_test_app().await;
    let client = app.client();

    let form = MultipartForm::new().add_text("target_format", "jpg").add_part(
        "file",
        Part::bytes(Vec::new())
            .file_name("empty.png")
            .mime_type("image/png"),
    );

    let response = client.post(&api_path("/conversions")).multipart(form).await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_rejects_traversal_filename() {
    let app = setup_test_app().await;
    let client = app.client();

    let form = MultipartForm::new().add_text("target_format", "jpg").add_part(
        "file",
        Part::bytes(helpers::fixtures::create_test_png())
            .file_name("../../etc/shadow.png")
            .mime_type("image/png"),
    );

    let response = client.post(&api_path("/conversions")).multipart(form).await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("dangerous"));
}

#[tokio::test]
async fn test_rejects_reserved_filename() {
    let app = setup_test_app().await;
    let client = app.client();

    let form = MultipartForm::new().add_text("target_format", "pdf").add_part(
        "file",
        Part::bytes(b"some text".to_vec())
            .file_name("CON.txt")
            .mime_type("text/plain"),
    );

    let response = client.post(&api_path("/conversions")).multipart(form).await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("reserved"));
}

#[tokio::test]
async fn test_rejects_content_type_spoofing() {
    let app = setup_test_app().await;
    let client = app.client();

    // Declared PNG content type on a .jpg name
    let form = MultipartForm::new().add_text("target_format", "png").add_part(
        "file",
        Part::bytes(helpers::fixtures::create_test_png())
            .file_name("photo.jpg")
            .mime_type("image/png"),
    );

    let response = client.post(&api_path("/conversions")).multipart(form).await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_rejects_cross_category_target() {
    let app = setup_test_app().await;
    let client = app.client();

    let form = MultipartForm::new().add_text("target_format", "mp3").add_part(
        "file",
        Part::bytes(helpers::fixtures::create_test_png())
            .file_name("photo.png")
            .mime_type("image/png"),
    );

    let response = client.post(&api_path("/conversions")).multipart(form).await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNSUPPORTED_CONVERSION");
}

#[tokio::test]
async fn test_rejects_missing_target_format() {
    let app = setup_test_app().await;
    let client = app.client();

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(helpers::fixtures::create_test_png())
            .file_name("photo.png")
            .mime_type("image/png"),
    );

    let response = client.post(&api_path("/conversions")).multipart(form).await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("target_format"));
}

#[tokio::test]
async fn test_rejects_missing_file() {
    let app = setup_test_app().await;
    let client = app.client();

    let form = MultipartForm::new().add_text("target_format", "jpg");

    let response = client.post(&api_path("/conversions")).multipart(form).await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_rejects_oversized_batch() {
    let app = setup_test_app().await;
    let client = app.client();

    let mut form = MultipartForm::new();
    for i in 0..11 {
        form = form.add_text("target_format", "jpg").add_part(
            "file",
            Part::bytes(helpers::fixtures::create_test_png())
                .file_name(format!("photo_{}.png", i))
                .mime_type("image/png"),
        );
    }

    let response = client
        .post(&api_path("/conversions/batch"))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Batch size"));
}

#[tokio::test]
async fn test_batch_requires_target_before_file() {
    let app = setup_test_app().await;
    let client = app.client();

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(helpers::fixtures::create_test_png())
            .file_name("photo.png")
            .mime_type("image/png"),
    );

    let response = client
        .post(&api_path("/conversions/batch"))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("target_format"));
}

#[tokio::test]
async fn test_validation_failures_do_not_reach_history() {
    let app = setup_test_app().await;
    let client = app.client();

    let form = MultipartForm::new().add_text("target_format", "png").add_part(
        "file",
        Part::bytes(b"x".to_vec())
            .file_name("nope.exe")
            .mime_type("application/octet-stream"),
    );
    client.post(&api_path("/conversions")).multipart(form).await;

    let history: Value = client.get(&api_path("/history")).await.json();
    assert!(history.as_array().unwrap().is_empty());
}
