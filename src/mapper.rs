//! View-space to image-space coordinate mapping.
//!
//! The on-screen canvas shows the image scaled down to fit the
//! available display area; pointer events arrive in view space and the
//! selection model works in image space. A single scale factor drives
//! both directions.

use crate::geometry::{ImagePoint, ViewPoint};

/// Ratio of view space to image space, always in `(0, 1]` — the view
/// never upscales past native resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleState {
    scale: f32,
}

impl Default for ScaleState {
    fn default() -> Self {
        Self::identity()
    }
}

impl ScaleState {
    pub const fn identity() -> Self {
        Self { scale: 1.0 }
    }

    /// Fit an image into a display area:
    /// `min(view_w/image_w, view_h/image_h, 1.0)`.
    ///
    /// Degenerate image or view dimensions fall back to the identity
    /// scale so the mapper stays total.
    pub fn fit(image_width: u32, image_height: u32, view_width: f32, view_height: f32) -> Self {
        if image_width == 0 || image_height == 0 || view_width <= 0.0 || view_height <= 0.0 {
            return Self::identity();
        }

        let scale_x = view_width / image_width as f32;
        let scale_y = view_height / image_height as f32;
        Self {
            scale: scale_x.min(scale_y).min(1.0),
        }
    }

    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Map a view-space point onto the original pixel grid, rounding
    /// to the nearest pixel.
    pub fn to_image_space(&self, point: ViewPoint) -> ImagePoint {
        ImagePoint::new(
            (point.x / self.scale).round() as i32,
            (point.y / self.scale).round() as i32,
        )
    }

    /// Map an image-space point back into view space. No rounding —
    /// overlay rendering is fine with sub-pixel coordinates.
    pub fn to_view_space(&self, point: ImagePoint) -> ViewPoint {
        ViewPoint::new(point.x as f32 * self.scale, point.y as f32 * self.scale)
    }
}
