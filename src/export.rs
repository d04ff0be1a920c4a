//! Export pipeline: rasterize the composed buffer at the requested
//! resolution and encode it as PNG or JPEG.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::PixelBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportSize {
    /// Keep the composed buffer's native resolution.
    Native,
    /// Resize to an exact target before encoding.
    Exact { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub format: ExportFormat,
    /// Encoding quality in `[0, 1]`. Only meaningful for JPEG.
    pub quality: f32,
    pub size: ExportSize,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: 0.9,
            size: ExportSize::Native,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("target resolution {width}x{height} is empty")]
    EmptyTarget { width: u32, height: u32 },
    #[error("failed to encode output image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// Encode `buffer` per the request and return the output byte stream.
/// Saving the bytes anywhere is the caller's concern.
pub fn encode(buffer: &PixelBuffer, request: &ExportRequest) -> ExportResult<Vec<u8>> {
    let image = rasterize(buffer, request.size)?;

    let mut bytes = Vec::new();
    match request.format {
        ExportFormat::Png => {
            DynamicImage::ImageRgba8(image)
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        }
        ExportFormat::Jpeg => {
            // JPEG has no alpha channel; flatten before encoding.
            let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
            let mut encoder =
                JpegEncoder::new_with_quality(&mut bytes, jpeg_quality(request.quality));
            encoder.encode_image(&rgb)?;
        }
    }

    tracing::info!(
        format = ?request.format,
        bytes = bytes.len(),
        "composed image encoded"
    );
    Ok(bytes)
}

/// Timestamped output name derived from the source file stem, e.g.
/// `photo_redacted_20240131T142233.png`.
pub fn suggested_filename(stem: &str, format: ExportFormat) -> String {
    let timestamp = chrono::Local::now().format("%Y%m%dT%H%M%S");
    filename_with_timestamp(stem, format, &timestamp.to_string())
}

fn filename_with_timestamp(stem: &str, format: ExportFormat, timestamp: &str) -> String {
    format!("{stem}_redacted_{timestamp}.{}", format.extension())
}

fn rasterize(buffer: &PixelBuffer, size: ExportSize) -> ExportResult<RgbaImage> {
    let image = buffer.clone().into_rgba_image();
    match size {
        ExportSize::Native => Ok(image),
        ExportSize::Exact { width, height } => {
            if width == 0 || height == 0 {
                return Err(ExportError::EmptyTarget { width, height });
            }
            if (width, height) == (image.width(), image.height()) {
                return Ok(image);
            }
            Ok(imageops::resize(
                &image,
                width,
                height,
                imageops::FilterType::Triangle,
            ))
        }
    }
}

/// Map the `[0, 1]` request quality onto the encoder's 1-100 scale.
fn jpeg_quality(quality: f32) -> u8 {
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}
