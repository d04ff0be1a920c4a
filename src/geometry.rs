/// Shared geometric primitives used across the selection, filter, and
/// session modules.
///
/// Two coordinate systems exist: *view space* (the scaled on-screen
/// representation, fractional pixels) and *image space* (the original
/// raster, integer pixels). `ViewPoint` and `ImagePoint` keep the two
/// from being mixed up silently.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPoint {
    pub x: f32,
    pub y: f32,
}

impl ViewPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePoint {
    pub x: i32,
    pub y: i32,
}

impl ImagePoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Self) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle in image space. The origin may lie outside
/// the buffer; filters clamp before touching pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, point: ImagePoint) -> bool {
        let right = i64::from(self.x) + i64::from(self.width);
        let bottom = i64::from(self.y) + i64::from(self.height);
        i64::from(point.x) >= i64::from(self.x)
            && i64::from(point.x) < right
            && i64::from(point.y) >= i64::from(self.y)
            && i64::from(point.y) < bottom
    }

    /// Intersect with `[0, bounds.width) x [0, bounds.height)`.
    /// Returns `None` when nothing of the region survives.
    pub fn clamped_to(&self, bounds: ImageBounds) -> Option<Self> {
        if self.is_empty() || bounds.width <= 0 || bounds.height <= 0 {
            return None;
        }

        let left = i64::from(self.x).max(0);
        let top = i64::from(self.y).max(0);
        let right = (i64::from(self.x) + i64::from(self.width)).min(i64::from(bounds.width));
        let bottom = (i64::from(self.y) + i64::from(self.height)).min(i64::from(bounds.height));

        if right <= left || bottom <= top {
            return None;
        }

        Some(Self {
            x: i32::try_from(left).ok()?,
            y: i32::try_from(top).ok()?,
            width: u32::try_from(right - left).ok()?,
            height: u32::try_from(bottom - top).ok()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBounds {
    pub width: i32,
    pub height: i32,
}

impl ImageBounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_contains_is_half_open() {
        let region = Region::new(10, 10, 20, 20);
        assert!(region.contains(ImagePoint::new(10, 10)));
        assert!(region.contains(ImagePoint::new(29, 29)));
        assert!(!region.contains(ImagePoint::new(30, 10)));
        assert!(!region.contains(ImagePoint::new(10, 30)));
        assert!(!region.contains(ImagePoint::new(9, 10)));
    }

    #[test]
    fn clamped_to_trims_negative_origin_and_overhang() {
        let region = Region::new(-5, -10, 200, 120);
        let clamped = region
            .clamped_to(ImageBounds::new(64, 48))
            .expect("region overlaps the buffer");
        assert_eq!(clamped, Region::new(0, 0, 64, 48));
    }

    #[test]
    fn clamped_to_rejects_fully_outside_region() {
        let region = Region::new(100, 100, 10, 10);
        assert!(region.clamped_to(ImageBounds::new(64, 48)).is_none());
    }

    #[test]
    fn clamped_to_rejects_empty_region() {
        assert!(Region::new(5, 5, 0, 10)
            .clamped_to(ImageBounds::new(64, 48))
            .is_none());
    }

    #[test]
    fn distance_is_euclidean() {
        let a = ImagePoint::new(0, 0);
        let b = ImagePoint::new(3, 4);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-9);
    }
}
