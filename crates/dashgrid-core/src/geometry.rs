#![forbid(unsafe_code)]

//! Pointer-space geometry reported by the host during gestures.
//!
//! The engine never measures the screen itself. During a drag or resize the
//! host hands over a [`Surface`]: the grid's horizontal extent plus the
//! vertical band each rendered row occupies. Bands are `Option` because a
//! row whose cells are all off-screen (or not yet laid out) has no measured
//! extent.

use serde::{Deserialize, Serialize};

use crate::span::GRID_COLUMNS;

/// A pointer sample in host (CSS pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Vertical extent of one rendered row: the union of its cells' boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowBand {
    pub top: f64,
    pub bottom: f64,
}

impl RowBand {
    #[must_use]
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Whether a pointer y-coordinate falls inside this band (inclusive).
    #[must_use]
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y <= self.bottom
    }
}

/// The grid's measured extent at gesture time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Surface {
    /// Left edge of the grid in pointer coordinates.
    pub left: f64,
    /// Full grid width in pointer coordinates.
    pub width: f64,
    /// Bottom edge of the grid, used when the last row has no band.
    pub bottom: f64,
    /// Per-row vertical bands, indexed like the grid's rows.
    pub bands: Vec<Option<RowBand>>,
}

impl Surface {
    /// Width of one column.
    #[must_use]
    pub fn column_width(&self) -> f64 {
        self.width / GRID_COLUMNS as f64
    }

    /// The column under a pointer x-coordinate, clamped to the grid.
    #[must_use]
    pub fn column_at(&self, x: f64) -> usize {
        if self.width <= 0.0 {
            return 0;
        }
        let col = ((x - self.left) / self.column_width()).floor();
        let max = (GRID_COLUMNS - 1) as f64;
        col.clamp(0.0, max) as usize
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
