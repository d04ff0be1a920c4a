//! Mosaic (block-average) filter.
//!
//! The clamped region is partitioned into non-overlapping blocks of
//! `block_size` pixels per side, anchored at the region origin; edge
//! blocks truncate at the region boundary. Every pixel of a block is
//! replaced by the block's per-channel arithmetic mean, which makes a
//! second pass with the same geometry a no-op.

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::geometry::Region;

pub fn apply(buffer: &mut PixelBuffer, region: Region, block_size: u32) {
    let Some(region) = region.clamped_to(buffer.bounds()) else {
        return;
    };

    // Clamped regions have a non-negative origin.
    let x0 = region.x as u32;
    let y0 = region.y as u32;
    let x_end = x0 + region.width;
    let y_end = y0 + region.height;
    let block = block_size.max(1);

    let mut py = y0;
    while py < y_end {
        let block_height = block.min(y_end - py);
        let mut px = x0;
        while px < x_end {
            let block_width = block.min(x_end - px);
            flatten_block(buffer, px, py, block_width, block_height);
            px += block;
        }
        py += block;
    }
}

/// Average the block's channels and write the mean back into every
/// pixel of the block. Rounds to nearest, ties away from zero.
fn flatten_block(buffer: &mut PixelBuffer, x: u32, y: u32, width: u32, height: u32) {
    let count = u64::from(width) * u64::from(height);
    assert!(count > 0, "mosaic block must contain at least one pixel");

    let mut sums = [0u64; CHANNELS];
    for by in y..y + height {
        for bx in x..x + width {
            let pixel = buffer.pixel(bx, by);
            for (sum, sample) in sums.iter_mut().zip(pixel) {
                *sum += u64::from(sample);
            }
        }
    }

    let mut mean = [0u8; CHANNELS];
    for (slot, sum) in mean.iter_mut().zip(sums) {
        *slot = ((sum + count / 2) / count) as u8;
    }

    for by in y..y + height {
        for bx in x..x + width {
            buffer.set_pixel(bx, by, mean);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::testutil::gradient_buffer;

    #[test]
    fn pixels_outside_the_region_stay_byte_identical() {
        let source = gradient_buffer(100, 100);
        let mut treated = source.clone();
        apply(&mut treated, Region::new(20, 20, 60, 60), 10);

        for y in 0..100 {
            for x in 0..100 {
                if x < 20 || x >= 80 || y < 20 || y >= 80 {
                    assert_eq!(
                        treated.pixel(x, y),
                        source.pixel(x, y),
                        "untouched pixel changed at ({x}, {y})"
                    );
                }
            }
        }
    }

    #[test]
    fn every_full_block_becomes_uniform() {
        let mut buffer = gradient_buffer(100, 100);
        apply(&mut buffer, Region::new(20, 20, 60, 60), 10);

        for block_y in (20..80).step_by(10) {
            for block_x in (20..80).step_by(10) {
                let reference = buffer.pixel(block_x, block_y);
                for y in block_y..block_y + 10 {
                    for x in block_x..block_x + 10 {
                        assert_eq!(
                            buffer.pixel(x, y),
                            reference,
                            "block at ({block_x}, {block_y}) is not uniform"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn reapplying_with_the_same_geometry_is_idempotent() {
        let mut once = gradient_buffer(100, 100);
        apply(&mut once, Region::new(20, 20, 60, 60), 10);

        let mut twice = once.clone();
        apply(&mut twice, Region::new(20, 20, 60, 60), 10);

        assert_eq!(once, twice);
    }

    #[test]
    fn truncated_edge_blocks_average_only_their_own_pixels() {
        // 7-wide region with block size 3: blocks of width 3, 3, 1.
        let mut buffer = gradient_buffer(10, 10);
        let source = buffer.clone();
        apply(&mut buffer, Region::new(0, 0, 7, 3), 3);

        // The final 1x3 column block averages exactly three pixels.
        let expected_r = {
            let sum: u64 = (0..3).map(|y| u64::from(source.pixel(6, y)[0])).sum();
            ((sum + 1) / 3) as u8
        };
        assert_eq!(buffer.pixel(6, 0)[0], expected_r);
        assert_eq!(buffer.pixel(6, 2)[0], expected_r);

        // Pixels right of the region are untouched.
        assert_eq!(buffer.pixel(7, 0), source.pixel(7, 0));
    }

    #[test]
    fn region_fully_outside_the_buffer_is_a_no_op() {
        let source = gradient_buffer(50, 50);
        let mut treated = source.clone();
        apply(&mut treated, Region::new(200, 200, 30, 30), 10);
        assert_eq!(treated, source);
    }

    #[test]
    fn region_overhanging_the_border_is_clamped_not_rejected() {
        let source = gradient_buffer(50, 50);
        let mut treated = source.clone();
        apply(&mut treated, Region::new(40, 40, 30, 30), 5);

        assert_ne!(treated.pixel(45, 45), source.pixel(45, 45));
        assert_eq!(treated.pixel(39, 39), source.pixel(39, 39));
    }
}
