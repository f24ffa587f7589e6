use anyhow::{Context, Result};
use omniconvert_storage::Storage;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Sanitize a filename for an archive entry to prevent path traversal.
/// Extracts only the base name (strips path components like `../`).
fn sanitize_archive_filename(filename: &str, fallback: &str) -> String {
    Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .unwrap_or(fallback)
        .to_string()
}

/// Create a ZIP archive from spooled outputs
pub async fn create_zip_archive(
    storage: Arc<dyn Storage>,
    items: Vec<(uuid::Uuid, String, String)>, // (id, storage_key, filename)
) -> Result<Vec<u8>> {
    use zip::write::{FileOptions, ZipWriter};
    use zip::CompressionMethod;

    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(std::io::Cursor::new(&mut buffer));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        for (id, storage_key, filename) in items {
            let file_data = storage
                .download(&storage_key)
                .await
                .with_context(|| format!("Failed to read spooled file: {}", storage_key))?;

            let safe_filename = sanitize_archive_filename(&filename, &format!("unnamed_{}", id));

            zip.start_file(&safe_filename, options)
                .with_context(|| format!("Failed to add file to ZIP: {}", safe_filename))?;
            zip.write_all(&file_data)
                .with_context(|| format!("Failed to write file data to ZIP: {}", safe_filename))?;
        }

        zip.finish().context("Failed to finalize ZIP archive")?;
    }

    Ok(buffer)
}
