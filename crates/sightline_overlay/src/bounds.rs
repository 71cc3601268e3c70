//! Layout bounds and safe-area readouts
//!
//! The bounds overlay outlines a view's frame and the part of it inside the
//! safe area. The coordinate readout shows where a dragged probe sits.

use serde::{Deserialize, Serialize};
use sightline_core::{EdgeInsets, Point, Rect, Size, Vec2};

/// Geometry of one inspected view
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundsReport {
    pub frame: Rect,
    pub safe_area: EdgeInsets,
}

impl BoundsReport {
    pub fn new(frame: Rect, safe_area: EdgeInsets) -> Self {
        Self { frame, safe_area }
    }

    pub fn origin(&self) -> Point {
        self.frame.origin
    }

    pub fn size(&self) -> Size {
        self.frame.size
    }

    pub fn has_safe_area(&self) -> bool {
        !self.safe_area.is_zero()
    }

    /// The frame minus its safe-area insets
    pub fn safe_rect(&self) -> Rect {
        self.frame.inset_by(self.safe_area)
    }

    /// Where the frame's origin ends up after being dragged by `offset`
    pub fn drag_readout(&self, offset: Vec2) -> Point {
        self.frame.origin.translate(offset)
    }
}
