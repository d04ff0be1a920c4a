//! Owned RGBA pixel storage shared by the filter and export pipelines.

use image::RgbaImage;

use crate::geometry::ImageBounds;

pub const CHANNELS: usize = 4;

/// Contiguous interleaved RGBA8 samples with integer dimensions.
///
/// Invariant: `samples.len() == width * height * 4`. The buffer has a
/// single owner at a time; pipeline stages hand it over by value, and
/// filters mutate it in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a zero-filled buffer (transparent black).
    pub fn new(width: u32, height: u32) -> Self {
        let len = sample_len(width, height);
        Self {
            width,
            height,
            samples: vec![0; len],
        }
    }

    /// Wrap an existing sample array. Returns `None` when the length
    /// does not match `width * height * 4`.
    pub fn from_samples(width: u32, height: u32, samples: Vec<u8>) -> Option<Self> {
        if samples.len() != sample_len(width, height) {
            return None;
        }
        Some(Self {
            width,
            height,
            samples,
        })
    }

    pub fn from_rgba_image(image: RgbaImage) -> Self {
        let width = image.width();
        let height = image.height();
        Self {
            width,
            height,
            samples: image.into_raw(),
        }
    }

    pub fn into_rgba_image(self) -> RgbaImage {
        RgbaImage::from_raw(self.width, self.height, self.samples)
            .expect("sample length invariant guarantees a valid image")
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> ImageBounds {
        ImageBounds::new(
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        )
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    /// Byte offset of the pixel at `(x, y)`. Callers stay within
    /// clamped regions, so the multiply cannot overflow usize here.
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let at = self.offset(x, y);
        [
            self.samples[at],
            self.samples[at + 1],
            self.samples[at + 2],
            self.samples[at + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: [u8; 4]) {
        let at = self.offset(x, y);
        self.samples[at..at + CHANNELS].copy_from_slice(&pixel);
    }
}

fn sample_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}
