//! Source image loading and validation.
//!
//! The redaction core only ever consumes a decoded [`PixelBuffer`];
//! this module is the boundary that produces one. It enforces the
//! accepted source formats (JPEG, PNG, WebP) and the 10 MB source
//! ceiling, and surfaces decode failures as recoverable errors with a
//! reason. It never retries.

use std::io;
use std::path::Path;

use image::ImageFormat;
use thiserror::Error;

use crate::buffer::PixelBuffer;

pub const MAX_SOURCE_BYTES: usize = 10 * 1024 * 1024;

const ACCEPTED_FORMATS: &[ImageFormat] =
    &[ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP];

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("unsupported source format {format}; accepted formats are JPEG, PNG, and WebP")]
    UnsupportedFormat { format: String },
    #[error("source is {size} bytes, above the {limit} byte limit")]
    SourceTooLarge { size: usize, limit: usize },
    #[error("failed to decode source image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type LoaderResult<T> = std::result::Result<T, LoaderError>;

pub fn load_from_path<P: AsRef<Path>>(path: P) -> LoaderResult<PixelBuffer> {
    let bytes = std::fs::read(path.as_ref())?;
    load_from_bytes(&bytes)
}

pub fn load_from_bytes(bytes: &[u8]) -> LoaderResult<PixelBuffer> {
    if bytes.len() > MAX_SOURCE_BYTES {
        return Err(LoaderError::SourceTooLarge {
            size: bytes.len(),
            limit: MAX_SOURCE_BYTES,
        });
    }

    let format = image::guess_format(bytes)?;
    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(LoaderError::UnsupportedFormat {
            format: format.to_mime_type().to_string(),
        });
    }

    let decoded = image::load_from_memory_with_format(bytes, format)?;
    let buffer = PixelBuffer::from_rgba_image(decoded.to_rgba8());
    tracing::info!(
        width = buffer.width(),
        height = buffer.height(),
        ?format,
        "source image decoded"
    );
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encoded_fixture(format: ImageFormat) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(8, 6, image::Rgba([10, 200, 30, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), format)
            .expect("fixture should encode");
        bytes
    }

    #[test]
    fn png_source_decodes_to_a_matching_buffer() {
        let buffer =
            load_from_bytes(&encoded_fixture(ImageFormat::Png)).expect("png should load");
        assert_eq!((buffer.width(), buffer.height()), (8, 6));
        assert_eq!(buffer.pixel(3, 3), [10, 200, 30, 255]);
    }

    #[test]
    fn bmp_source_is_rejected_as_unsupported() {
        let err = load_from_bytes(&encoded_fixture(ImageFormat::Bmp))
            .expect_err("bmp is not an accepted source format");
        assert!(matches!(err, LoaderError::UnsupportedFormat { .. }));
    }

    #[test]
    fn oversized_source_is_rejected_before_decoding() {
        let bytes = vec![0u8; MAX_SOURCE_BYTES + 1];
        let err = load_from_bytes(&bytes).expect_err("oversized source must fail");
        assert!(matches!(
            err,
            LoaderError::SourceTooLarge {
                size,
                limit: MAX_SOURCE_BYTES,
            } if size == MAX_SOURCE_BYTES + 1
        ));
    }

    #[test]
    fn garbage_bytes_surface_a_decode_error() {
        let err = load_from_bytes(&[0u8; 64]).expect_err("garbage must not decode");
        assert!(matches!(err, LoaderError::Decode(_)));
    }
}
