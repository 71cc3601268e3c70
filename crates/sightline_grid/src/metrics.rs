//! Grid tiling results

use serde::{Deserialize, Serialize};
use sightline_core::{FitMode, Point, Rect, Size};

use crate::fit::FIT_TOLERANCE;

/// A square-grid tiling of a container
///
/// Produced fresh by [`compute_grid`](crate::compute_grid) for every container
/// size; never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridMetrics {
    /// Side length of one cell
    pub square_size: f32,
    pub columns: u32,
    pub rows: u32,
    /// Top-left corner of the grid inside the container
    pub origin_offset: Point,
    /// Area covered by the cells (`square_size * columns` x `square_size * rows`)
    pub content_size: Size,
    /// The policy that produced this tiling
    pub fit_mode: FitMode,
    /// The container the tiling was computed for
    pub container_size: Size,
}

impl GridMetrics {
    /// Container space not covered by cells, clamped at zero
    pub fn remainder(&self) -> Size {
        Size::new(
            (self.container_size.width - self.content_size.width).max(0.0),
            (self.container_size.height - self.content_size.height).max(0.0),
        )
    }

    /// True when the cells cover the container on both axes
    pub fn is_perfect_fit(&self) -> bool {
        let remainder = self.remainder();
        remainder.width <= FIT_TOLERANCE && remainder.height <= FIT_TOLERANCE
    }

    pub fn cell_count(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }

    /// X positions of the column boundaries, left to right (`columns + 1` values)
    pub fn vertical_lines(&self) -> impl Iterator<Item = f32> + '_ {
        (0..=self.columns).map(move |i| self.origin_offset.x + self.square_size * i as f32)
    }

    /// Y positions of the row boundaries, top to bottom (`rows + 1` values)
    pub fn horizontal_lines(&self) -> impl Iterator<Item = f32> + '_ {
        (0..=self.rows).map(move |i| self.origin_offset.y + self.square_size * i as f32)
    }

    /// Rectangle of the cell at (`column`, `row`), zero-based
    pub fn cell_rect(&self, column: u32, row: u32) -> Option<Rect> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        Some(Rect::new(
            self.origin_offset.x + self.square_size * column as f32,
            self.origin_offset.y + self.square_size * row as f32,
            self.square_size,
            self.square_size,
        ))
    }
}
