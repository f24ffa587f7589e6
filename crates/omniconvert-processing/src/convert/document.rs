//! Document converter.
//!
//! Text extraction and container generation are all delegated: PDF text via
//! `pdf-extract`, DOCX read/write via `docx-rs`, text-to-PDF rendering via
//! `printpdf`. Same-format targets pass the input through untouched.

use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use omniconvert_core::formats::mime_type_for;
use omniconvert_core::AppError;

use super::ConvertedOutput;

// US Letter in millimeters, with the wrapping geometry for text rendering.
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const PAGE_MARGIN_MM: f32 = 15.0;
const LINE_HEIGHT_MM: f32 = 5.0;
const FONT_SIZE_PT: f32 = 11.0;
const WRAP_COLUMNS: usize = 95;

pub struct DocumentConverter;

impl Default for DocumentConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentConverter {
    pub fn new() -> Self {
        Self
    }

    pub async fn convert(
        &self,
        data: &[u8],
        source_ext: &str,
        target: &str,
        output_filename: String,
    ) -> Result<ConvertedOutput, AppError> {
        // Same-format requests are a passthrough; no reason to re-render.
        if source_ext == target {
            return Ok(ConvertedOutput {
                data: Bytes::copy_from_slice(data),
                filename: output_filename,
                content_type: mime_type_for(target),
            });
        }

        let text = match source_ext {
            "txt" => String::from_utf8_lossy(data).into_owned(),
            "pdf" => extract_pdf_text(data)
                .map_err(|e| AppError::Conversion(format!("Failed to extract text from PDF: {}", e)))?,
            "docx" => extract_docx_text(data)
                .map_err(|e| AppError::Conversion(format!("Failed to extract text from DOCX: {}", e)))?,
            // Legacy and rich-text inputs are recognized for upload but have
            // no extraction path here.
            other => {
                return Err(AppError::UnsupportedConversion {
                    source_format: other.to_string(),
                    target_format: target.to_string(),
                })
            }
        };

        let converted = match target {
            "txt" => text.into_bytes(),
            "pdf" => text_to_pdf(&text)
                .map_err(|e| AppError::Conversion(format!("Failed to convert to PDF: {}", e)))?,
            "docx" => text_to_docx(&text)
                .map_err(|e| AppError::Conversion(format!("Failed to convert to DOCX: {}", e)))?,
            other => {
                return Err(AppError::UnsupportedConversion {
                    source_format: source_ext.to_string(),
                    target_format: other.to_string(),
                })
            }
        };

        Ok(ConvertedOutput {
            data: Bytes::from(converted),
            filename: output_filename,
            content_type: mime_type_for(target),
        })
    }
}

fn extract_pdf_text(data: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(data).context("PDF text extraction failed")?;
    Ok(text)
}

fn extract_docx_text(data: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(data).map_err(|e| anyhow!("DOCX parsing failed: {:?}", e))?;

    let mut text = String::new();
    for child in &docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            for pc in &paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = pc {
                    for rc in &run.children {
                        if let docx_rs::RunChild::Text(t) = rc {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

/// Render plain text as a paginated PDF (Helvetica, US Letter).
fn text_to_pdf(text: &str) -> Result<Vec<u8>> {
    use printpdf::{BuiltinFont, Mm, PdfDocument};

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Converted document",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "text",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("PDF font setup failed: {}", e))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - PAGE_MARGIN_MM;

    for line in wrap_lines(text, WRAP_COLUMNS) {
        if y < PAGE_MARGIN_MM {
            let (page, layer_idx) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "text");
            layer = doc.get_page(page).get_layer(layer_idx);
            y = PAGE_HEIGHT_MM - PAGE_MARGIN_MM;
        }
        if !line.is_empty() {
            layer.use_text(line, FONT_SIZE_PT, Mm(PAGE_MARGIN_MM), Mm(y), &font);
        }
        y -= LINE_HEIGHT_MM;
    }

    let mut buffer = Vec::new();
    doc.save(&mut std::io::BufWriter::new(&mut buffer))
        .map_err(|e| anyhow!("PDF rendering failed: {}", e))?;
    Ok(buffer)
}

/// One paragraph per input line.
fn text_to_docx(text: &str) -> Result<Vec<u8>> {
    use docx_rs::{Docx, Paragraph, Run};

    let mut docx = Docx::new();
    for line in text.split('\n') {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }

    let mut buffer = std::io::Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| anyhow!("DOCX packing failed: {}", e))?;
    Ok(buffer.into_inner())
}

/// Word-wrap text to a column limit, preserving existing line breaks.
fn wrap_lines(text: &str, columns: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.split('\n') {
        let line = line.trim_end_matches('\r');
        if line.chars().count() <= columns {
            out.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        for word in line.split(' ') {
            let candidate_len = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if candidate_len > columns && !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            out.push(current);
        }
    }
    out
}
