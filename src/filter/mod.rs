//! Pixel-level redaction filters.
//!
//! Both filters operate on a rectangular region of a [`PixelBuffer`],
//! clamped to the buffer before any pixel is touched; a region fully
//! outside the buffer is a no-op. Pixels outside the clamped region
//! are left byte-identical.

pub mod blur;
pub mod mosaic;

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::geometry::Region;

/// Supported envelope for the mosaic block size. The core does not
/// reject values outside this range; the external control surface is
/// expected to keep its inputs within it.
pub const MOSAIC_BLOCK_SIZE_MIN: u32 = 2;
pub const MOSAIC_BLOCK_SIZE_MAX: u32 = 20;

/// Supported envelope for the blur radius, same caveat as above.
pub const BLUR_RADIUS_MIN: u32 = 1;
pub const BLUR_RADIUS_MAX: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Mosaic,
    Blur,
}

/// Active effect plus parameters for both kinds, so switching between
/// them never loses the inactive parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectConfig {
    pub kind: EffectKind,
    pub mosaic_block_size: u32,
    pub blur_radius: u32,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            kind: EffectKind::Mosaic,
            mosaic_block_size: 10,
            blur_radius: 5,
        }
    }
}

/// Apply the configured effect to one region, in place.
pub fn apply(buffer: &mut PixelBuffer, region: Region, config: &EffectConfig) {
    tracing::debug!(kind = ?config.kind, ?region, "filter pass");
    match config.kind {
        EffectKind::Mosaic => mosaic::apply(buffer, region, config.mosaic_block_size),
        EffectKind::Blur => blur::apply(buffer, region, config.blur_radius),
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::buffer::PixelBuffer;

    /// Deterministic RGB gradient used across the filter tests:
    /// `R = x/width*255`, `G = y/height*255`, `B = 128`, opaque alpha.
    pub(crate) fn gradient_buffer(width: u32, height: u32) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let r = (f64::from(x) / f64::from(width) * 255.0).round() as u8;
                let g = (f64::from(y) / f64::from(height) * 255.0).round() as u8;
                buffer.set_pixel(x, y, [r, g, 128, 255]);
            }
        }
        buffer
    }
}
