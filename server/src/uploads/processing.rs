//! Image optimization for profile uploads.
//!
//! Every upload is re-encoded as a JPEG no wider than 1200px, lowering the
//! quality until the result fits in 1 MiB or the quality floor is reached.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{GenericImageView, ImageFormat, ImageReader, Limits, RgbImage};
use thiserror::Error;

/// Widest output image; narrower images are never enlarged.
pub const MAX_WIDTH: u32 = 1200;

/// Target size of the encoded output.
pub const TARGET_BYTES: usize = 1024 * 1024;

const START_QUALITY: u8 = 80;
const QUALITY_STEP: u8 = 10;
const MIN_QUALITY: u8 = 10;

/// Maximum image dimension (width or height) to prevent decompression bombs.
const MAX_IMAGE_DIMENSION: u32 = 16384;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Unsupported image format. Supported types: jpeg, png, webp.")]
    UnsupportedFormat,
    #[error("Image decode failed: {0}")]
    DecodeFailed(String),
    #[error("Image encoding failed: {0}")]
    EncodeFailed(String),
}

/// An optimized image ready for upload.
#[derive(Debug)]
pub struct OptimizedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub quality: u8,
}

impl OptimizedImage {
    pub const CONTENT_TYPE: &'static str = "image/jpeg";
}

/// Formats accepted for upload, detected from the content itself.
pub fn sniff_format(data: &[u8]) -> Result<ImageFormat, ProcessingError> {
    match image::guess_format(data) {
        Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP)) => Ok(format),
        _ => Err(ProcessingError::UnsupportedFormat),
    }
}

/// Resize and re-encode an uploaded image.
///
/// CPU-bound; call inside `spawn_blocking`.
pub fn optimize_image(data: &[u8]) -> Result<OptimizedImage, ProcessingError> {
    let format = sniff_format(data)?;

    let mut reader = ImageReader::with_format(Cursor::new(data), format);
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_IMAGE_DIMENSION);
    limits.max_image_height = Some(MAX_IMAGE_DIMENSION);
    reader.limits(limits);

    let img = reader
        .decode()
        .map_err(|e| ProcessingError::DecodeFailed(e.to_string()))?;

    let img = if img.width() > MAX_WIDTH {
        img.resize(MAX_WIDTH, u32::MAX, FilterType::Lanczos3)
    } else {
        img
    };
    let (width, height) = img.dimensions();
    // JPEG has no alpha channel
    let rgb = img.to_rgb8();

    let mut quality = START_QUALITY;
    let mut encoded = encode_jpeg(&rgb, quality)?;
    while encoded.len() > TARGET_BYTES && quality > MIN_QUALITY {
        quality -= QUALITY_STEP;
        encoded = encode_jpeg(&rgb, quality)?;
    }

    Ok(OptimizedImage {
        data: encoded,
        width,
        height,
        quality,
    })
}

fn encode_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>, ProcessingError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode_image(img)
        .map_err(|e| ProcessingError::EncodeFailed(e.to_string()))?;
    Ok(buf)
}
