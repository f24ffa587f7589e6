//! Image converter.
//!
//! Decoding goes through `image` with format guessing; encoding is
//! per-target: mozjpeg for JPEG, the `webp` encoder for WebP, and `image`'s
//! own encoders for PNG, GIF, and BMP. Formats without an alpha channel get
//! the source flattened onto a white background first.

use anyhow::{anyhow, Result};
use bytes::Bytes;
use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::{AnimationDecoder, DynamicImage, Frame, GenericImageView, ImageFormat, ImageReader, RgbImage, RgbaImage};
use omniconvert_core::formats::mime_type_for;
use omniconvert_core::AppError;
use std::io::Cursor;

use super::ConvertedOutput;

const JPEG_QUALITY: f32 = 95.0;
const WEBP_QUALITY: f32 = 90.0;

pub struct ImageConverter;

impl Default for ImageConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageConverter {
    pub fn new() -> Self {
        Self
    }

    pub async fn convert(
        &self,
        data: &[u8],
        target: &str,
        output_filename: String,
    ) -> Result<ConvertedOutput, AppError> {
        let converted = self
            .encode(data, target)
            .map_err(|e| AppError::Conversion(format!("Failed to convert image: {}", e)))?;

        Ok(ConvertedOutput {
            data: Bytes::from(converted),
            filename: output_filename,
            content_type: mime_type_for(target),
        })
    }

    fn encode(&self, data: &[u8], target: &str) -> Result<Vec<u8>> {
        // GIF output may need the full frame sequence, not a single decode.
        if target == "gif" {
            return self.to_gif(data);
        }

        let img = decode(data)?;

        match target {
            "jpg" => self.to_jpeg(&img),
            "png" => self.to_png(&img),
            "webp" => self.to_webp(&img),
            "bmp" => self.to_bmp(&img),
            other => Err(anyhow!("Unsupported output format: {}", other)),
        }
    }

    fn to_jpeg(&self, img: &DynamicImage) -> Result<Vec<u8>> {
        let rgb = flatten_onto_white(img);
        let (width, height) = rgb.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(JPEG_QUALITY);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(&rgb)?;
        let jpeg_data = comp.finish()?;

        Ok(jpeg_data)
    }

    fn to_png(&self, img: &DynamicImage) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
        Ok(buffer)
    }

    fn to_webp(&self, img: &DynamicImage) -> Result<Vec<u8>> {
        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(&rgba, width, height);
        let webp_data = encoder.encode(WEBP_QUALITY);

        Ok(webp_data.to_vec())
    }

    fn to_bmp(&self, img: &DynamicImage) -> Result<Vec<u8>> {
        let rgb = flatten_onto_white(img);
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(rgb).write_to(&mut Cursor::new(&mut buffer), ImageFormat::Bmp)?;
        Ok(buffer)
    }

    /// GIF output. An animated GIF source keeps its frames and looping;
    /// anything else becomes a single quantized frame.
    fn to_gif(&self, data: &[u8]) -> Result<Vec<u8>> {
        if let Some(frames) = animated_gif_frames(data) {
            let mut buffer = Vec::new();
            {
                let mut encoder = GifEncoder::new(&mut buffer);
                encoder.set_repeat(Repeat::Infinite)?;
                encoder.encode_frames(frames)?;
            }
            return Ok(buffer);
        }

        let img = decode(data)?;
        let rgb = flatten_onto_white(&img);
        let rgba = DynamicImage::ImageRgb8(rgb).to_rgba8();

        let mut buffer = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut buffer);
            encoder.encode_frame(Frame::new(rgba))?;
        }
        Ok(buffer)
    }
}

fn decode(data: &[u8]) -> Result<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    Ok(reader.decode()?)
}

/// Frames of an animated GIF, or `None` for non-GIF and single-frame inputs.
fn animated_gif_frames(data: &[u8]) -> Option<Vec<Frame>> {
    let decoder = GifDecoder::new(Cursor::new(data)).ok()?;
    let frames = decoder.into_frames().collect_frames().ok()?;
    if frames.len() > 1 {
        Some(frames)
    } else {
        None
    }
}

/// Composite an image onto a white background, dropping the alpha channel.
fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    let rgba: RgbaImage = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut out = RgbImage::new(width, height);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = pixel[3] as u32;
        let blend = |c: u8| -> u8 { ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8 };
        out.put_pixel(x, y, image::Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
    }
    out
}
