//! Test file fixtures.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

/// A small valid PNG.
pub fn create_test_png() -> Vec<u8> {
    let img = RgbaImage::from_pixel(16, 16, Rgba([200, 30, 30, 255]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .expect("encode png");
    buffer
}
