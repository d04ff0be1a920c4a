//! Brush stroke interpolation.
//!
//! Pointer-move events arrive at whatever rate the input layer samples
//! them; a fast stroke can move many pixels between samples. To keep
//! the painted trail gap-free, each new sample emits a run of dabs
//! along the straight line from the previous sample, spaced at a
//! fraction of the brush diameter.

use super::{Selection, SelectionSet};
use crate::geometry::ImagePoint;

/// Tracks per-stroke state: the brush size and the last sampled point.
/// Create one at gesture start and drop it at gesture end.
#[derive(Debug)]
pub struct StrokeState {
    diameter: u32,
    last: Option<ImagePoint>,
}

impl StrokeState {
    pub fn new(diameter: u32) -> Self {
        Self {
            diameter: diameter.max(1),
            last: None,
        }
    }

    /// Distance between interpolated dabs: `max(1, diameter / 4)`.
    pub const fn spacing(&self) -> u32 {
        let quarter = self.diameter / 4;
        if quarter == 0 {
            1
        } else {
            quarter
        }
    }

    /// Radius of each emitted dab: `max(1, diameter / 2)`.
    pub const fn dab_radius(&self) -> u32 {
        let half = self.diameter / 2;
        if half == 0 {
            1
        } else {
            half
        }
    }

    /// Feed one input sample. Dabs are appended to `out` immediately
    /// (not merged); the number appended is returned.
    ///
    /// The first sample of a stroke emits a single dab. Every later
    /// sample emits `steps = max(1, ceil(d / spacing))` segments worth
    /// of dabs at `t = i/steps` for `i in 0..=steps`, which guarantees
    /// at least `d / spacing` dabs for any pointer speed.
    pub fn add_sample(&mut self, point: ImagePoint, out: &mut SelectionSet) -> usize {
        let radius = self.dab_radius();

        let Some(previous) = self.last else {
            self.last = Some(point);
            out.push(dab_at(point, radius));
            return 1;
        };

        if previous == point {
            return 0;
        }

        let distance = previous.distance_to(point);
        let steps = ((distance / f64::from(self.spacing())).ceil() as u32).max(1);

        for i in 0..=steps {
            let t = f64::from(i) / f64::from(steps);
            let x = f64::from(previous.x) + (f64::from(point.x) - f64::from(previous.x)) * t;
            let y = f64::from(previous.y) + (f64::from(point.y) - f64::from(previous.y)) * t;
            out.push(dab_at(
                ImagePoint::new(x.round() as i32, y.round() as i32),
                radius,
            ));
        }

        self.last = Some(point);
        steps as usize + 1
    }

    pub fn end(&mut self) {
        self.last = None;
    }
}

fn dab_at(point: ImagePoint, radius: u32) -> Selection {
    Selection::Brush {
        cx: point.x,
        cy: point.y,
        r: radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_emits_exactly_one_dab() {
        let mut stroke = StrokeState::new(20);
        let mut set = SelectionSet::new();
        assert_eq!(stroke.add_sample(ImagePoint::new(10, 10), &mut set), 1);
        assert_eq!(set.as_slice(), &[Selection::Brush { cx: 10, cy: 10, r: 10 }]);
    }

    #[test]
    fn stationary_sample_emits_nothing() {
        let mut stroke = StrokeState::new(20);
        let mut set = SelectionSet::new();
        stroke.add_sample(ImagePoint::new(10, 10), &mut set);
        assert_eq!(stroke.add_sample(ImagePoint::new(10, 10), &mut set), 0);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn fast_segment_emits_enough_dabs_to_stay_gap_free() {
        let mut stroke = StrokeState::new(20);
        let mut set = SelectionSet::new();
        stroke.add_sample(ImagePoint::new(0, 0), &mut set);

        // d = 100, spacing = 5, so at least 20 dabs must land on the segment.
        let emitted = stroke.add_sample(ImagePoint::new(100, 0), &mut set);
        assert!(emitted >= 100 / 5);
        assert_eq!(emitted, 21);
    }

    #[test]
    fn emitted_dabs_span_the_full_segment() {
        let mut stroke = StrokeState::new(8);
        let mut set = SelectionSet::new();
        stroke.add_sample(ImagePoint::new(0, 0), &mut set);
        stroke.add_sample(ImagePoint::new(10, 10), &mut set);

        let dabs = set.as_slice();
        assert_eq!(dabs[1], Selection::Brush { cx: 0, cy: 0, r: 4 });
        assert_eq!(
            *dabs.last().expect("stroke emitted dabs"),
            Selection::Brush { cx: 10, cy: 10, r: 4 }
        );
    }

    #[test]
    fn tiny_brush_clamps_spacing_and_radius_to_one() {
        let stroke = StrokeState::new(1);
        assert_eq!(stroke.spacing(), 1);
        assert_eq!(stroke.dab_radius(), 1);
    }

    #[test]
    fn slow_movement_still_emits_at_least_one_segment() {
        let mut stroke = StrokeState::new(40);
        let mut set = SelectionSet::new();
        stroke.add_sample(ImagePoint::new(0, 0), &mut set);

        // d = 1 with spacing 10 gives steps = 1, dabs at both endpoints.
        let emitted = stroke.add_sample(ImagePoint::new(1, 0), &mut set);
        assert_eq!(emitted, 2);
    }
}
