//! Selection geometry: the regions a user has marked for redaction.
//!
//! A selection is either an axis-aligned rectangle from a drag gesture
//! or a single circular brush dab; a stroke contributes many dabs (see
//! [`stroke`]). All coordinates are image space.

pub mod stroke;

use serde::{Deserialize, Serialize};

use crate::geometry::{ImagePoint, Region};

/// Drags at or below this edge length (image-space pixels) are treated
/// as accidental clicks and discarded instead of committed.
pub const MIN_RECTANGLE_COMMIT_SIZE: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Selection {
    Rectangle {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    Brush {
        cx: i32,
        cy: i32,
        r: u32,
    },
}

impl Selection {
    /// Axis-aligned bounding region the filter engine operates on.
    /// A brush dab becomes the bounding box of its circle.
    pub fn bounding_region(&self) -> Region {
        match *self {
            Self::Rectangle {
                x,
                y,
                width,
                height,
            } => Region::new(x, y, width, height),
            Self::Brush { cx, cy, r } => {
                let r = i64::from(r);
                let side = u32::try_from(r * 2).unwrap_or(u32::MAX);
                Region::new(
                    i32::try_from(i64::from(cx) - r).unwrap_or(i32::MIN),
                    i32::try_from(i64::from(cy) - r).unwrap_or(i32::MIN),
                    side,
                    side,
                )
            }
        }
    }

    /// Point hit test used for deletion. Only rectangles respond;
    /// brush dabs are not individually deletable by point.
    pub fn hit_by(&self, point: ImagePoint) -> bool {
        match self {
            Self::Rectangle { .. } => self.bounding_region().contains(point),
            Self::Brush { .. } => false,
        }
    }
}

/// Normalize a drag into a top-left-origin region. With the square
/// constraint active the vertical delta is replaced by the horizontal
/// one *before* sign normalization, matching the gesture's feel when
/// dragging up-left.
pub fn drag_region(start: ImagePoint, end: ImagePoint, constrain_square: bool) -> Region {
    let dx = i64::from(end.x) - i64::from(start.x);
    let dy = if constrain_square {
        dx
    } else {
        i64::from(end.y) - i64::from(start.y)
    };

    let x = if dx < 0 { i64::from(start.x) + dx } else { i64::from(start.x) };
    let y = if dy < 0 { i64::from(start.y) + dy } else { i64::from(start.y) };

    Region::new(
        i32::try_from(x).unwrap_or(i32::MIN),
        i32::try_from(y).unwrap_or(i32::MIN),
        u32::try_from(dx.abs()).unwrap_or(u32::MAX),
        u32::try_from(dy.abs()).unwrap_or(u32::MAX),
    )
}

/// Build the committable rectangle for a finished drag. Returns `None`
/// for drags at or below the accidental-click threshold.
pub fn rectangle_from_drag(
    start: ImagePoint,
    end: ImagePoint,
    constrain_square: bool,
) -> Option<Selection> {
    let region = drag_region(start, end, constrain_square);
    if region.width <= MIN_RECTANGLE_COMMIT_SIZE || region.height <= MIN_RECTANGLE_COMMIT_SIZE {
        return None;
    }
    Some(Selection::Rectangle {
        x: region.x,
        y: region.y,
        width: region.width,
        height: region.height,
    })
}

/// Ordered collection of selections. Append order is render order;
/// this is also the unit the history manager snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    entries: Vec<Selection>,
}

impl SelectionSet {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, selection: Selection) {
        self.entries.push(selection);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Selection] {
        &self.entries
    }

    /// Remove the topmost (most recently added) selection containing
    /// `point`, if any. Returns the removed selection.
    pub fn remove_hit(&mut self, point: ImagePoint) -> Option<Selection> {
        let index = self
            .entries
            .iter()
            .rposition(|selection| selection.hit_by(point))?;
        Some(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl FromIterator<Selection> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = Selection>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
