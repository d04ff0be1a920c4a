//! Gaussian blur filter.
//!
//! A square kernel of side `2*radius + 1` with `sigma = radius / 3`.
//! Taps that fall outside the image buffer are excluded and the result
//! renormalized by the weight actually used, so pixels near the border
//! are neither darkened nor lightened. Sampling always reads a
//! snapshot taken before the pass writes anything.

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::geometry::Region;

pub fn apply(buffer: &mut PixelBuffer, region: Region, radius: u32) {
    let Some(region) = region.clamped_to(buffer.bounds()) else {
        return;
    };

    let radius = radius.max(1);
    let kernel = gaussian_kernel(radius);
    let side = (2 * radius + 1) as usize;
    let reach = radius as i64;

    let image_width = i64::from(buffer.width());
    let image_height = i64::from(buffer.height());

    // The pass must never read its own output.
    let source = buffer.clone();

    let x0 = region.x as u32;
    let y0 = region.y as u32;
    for py in y0..y0 + region.height {
        for px in x0..x0 + region.width {
            let mut acc = [0.0f64; CHANNELS];
            let mut used_weight = 0.0f64;

            for ky in 0..side {
                let sample_y = i64::from(py) + ky as i64 - reach;
                if sample_y < 0 || sample_y >= image_height {
                    continue;
                }
                for kx in 0..side {
                    let sample_x = i64::from(px) + kx as i64 - reach;
                    if sample_x < 0 || sample_x >= image_width {
                        continue;
                    }

                    let weight = kernel[ky * side + kx];
                    let pixel = source.pixel(sample_x as u32, sample_y as u32);
                    for (slot, sample) in acc.iter_mut().zip(pixel) {
                        *slot += f64::from(sample) * weight;
                    }
                    used_weight += weight;
                }
            }

            assert!(
                used_weight > 0.0,
                "blur kernel must overlap the image buffer"
            );

            let mut result = [0u8; CHANNELS];
            for (slot, value) in result.iter_mut().zip(acc) {
                *slot = (value / used_weight).round().clamp(0.0, 255.0) as u8;
            }
            buffer.set_pixel(px, py, result);
        }
    }
}

/// Row-major `(2r+1)^2` Gaussian weights, normalized so the full
/// support sums to 1.
fn gaussian_kernel(radius: u32) -> Vec<f64> {
    let sigma = f64::from(radius) / 3.0;
    let two_sigma_square = 2.0 * sigma * sigma;
    let side = (2 * radius + 1) as usize;
    let reach = radius as i64;

    let mut weights = Vec::with_capacity(side * side);
    let mut sum = 0.0f64;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let weight = (-((dx * dx + dy * dy) as f64) / two_sigma_square).exp();
            weights.push(weight);
            sum += weight;
        }
    }
    for weight in &mut weights {
        *weight /= sum;
    }
    weights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::testutil::gradient_buffer;

    #[test]
    fn kernel_weights_sum_to_one() {
        for radius in [1, 3, 5, 15] {
            let sum: f64 = gaussian_kernel(radius).iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "radius {radius} sum {sum}");
        }
    }

    #[test]
    fn kernel_peak_is_at_the_center() {
        let radius = 4;
        let side = (2 * radius + 1) as usize;
        let kernel = gaussian_kernel(radius);
        let center = kernel[(side / 2) * side + side / 2];
        assert!(kernel.iter().all(|&w| w <= center));
    }

    #[test]
    fn blur_executes_and_changes_the_selection_interior() {
        // A symmetric kernel preserves a perfectly linear ramp, so on a
        // rounded gradient the visible effect is the smoothing of the
        // rounding steps; some interior pixels must still change.
        let source = gradient_buffer(100, 100);
        let mut treated = source.clone();
        apply(&mut treated, Region::new(20, 20, 60, 60), 5);

        let mut changed = 0usize;
        for y in 25..75 {
            for x in 25..75 {
                if treated.pixel(x, y) != source.pixel(x, y) {
                    changed += 1;
                }
            }
        }
        assert!(changed > 0, "blur did not change the selection interior");
    }

    #[test]
    fn blur_of_a_sharp_edge_produces_intermediate_values() {
        let mut buffer = PixelBuffer::new(40, 40);
        for y in 0..40 {
            for x in 0..40 {
                let value = if x < 20 { 0 } else { 255 };
                buffer.set_pixel(x, y, [value, value, value, 255]);
            }
        }

        apply(&mut buffer, Region::new(0, 0, 40, 40), 5);
        let edge = buffer.pixel(20, 20)[0];
        assert!(edge > 0 && edge < 255, "edge should soften, got {edge}");
    }

    #[test]
    fn pixels_outside_the_region_stay_byte_identical() {
        let source = gradient_buffer(100, 100);
        let mut treated = source.clone();
        apply(&mut treated, Region::new(20, 20, 60, 60), 5);

        for y in 0..100 {
            for x in 0..100 {
                if x < 20 || x >= 80 || y < 20 || y >= 80 {
                    assert_eq!(treated.pixel(x, y), source.pixel(x, y));
                }
            }
        }
    }

    #[test]
    fn border_pixels_are_renormalized_not_darkened() {
        // Uniform white: excluded out-of-bounds taps must not pull the
        // border toward black.
        let mut buffer = PixelBuffer::new(30, 30);
        for y in 0..30 {
            for x in 0..30 {
                buffer.set_pixel(x, y, [255, 255, 255, 255]);
            }
        }

        apply(&mut buffer, Region::new(0, 0, 30, 30), 5);
        for y in 0..30 {
            for x in 0..30 {
                assert_eq!(buffer.pixel(x, y), [255, 255, 255, 255]);
            }
        }
    }

    #[test]
    fn pass_reads_the_snapshot_not_its_own_output() {
        // A single bright pixel: if the pass read freshly-written
        // values, energy would smear asymmetrically to the right/down.
        let mut buffer = PixelBuffer::new(21, 21);
        buffer.set_pixel(10, 10, [255, 0, 0, 255]);
        apply(&mut buffer, Region::new(0, 0, 21, 21), 3);

        for offset in 1..=3u32 {
            assert_eq!(
                buffer.pixel(10 - offset, 10)[0],
                buffer.pixel(10 + offset, 10)[0],
                "response is not symmetric at offset {offset}"
            );
        }
    }

    #[test]
    fn region_fully_outside_the_buffer_is_a_no_op() {
        let source = gradient_buffer(40, 40);
        let mut treated = source.clone();
        apply(&mut treated, Region::new(-100, -100, 20, 20), 5);
        assert_eq!(treated, source);
    }
}
