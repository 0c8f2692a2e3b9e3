#![forbid(unsafe_code)]

//! First-fit shelf packing of an ordered widget sequence.
//!
//! Widgets are placed in input order, each into the first row (top to
//! bottom) with a leftmost slot wide enough for its span, opening a new row
//! when none admits it. Widgets are never reordered to improve density.

use dashgrid_core::GRID_COLUMNS;

use crate::grid::{Grid, LayoutItem, Placement};

/// Lay out a widget sequence from scratch.
///
/// Produces one placement per item, no overlaps, and per-row span totals of
/// at most [`GRID_COLUMNS`]. Items with a span outside `1..=GRID_COLUMNS`
/// are skipped.
#[must_use]
pub fn pack(items: &[LayoutItem]) -> Grid {
    let mut grid = Grid::new();
    for item in items {
        place_first_fit(&mut grid, item);
    }
    grid
}

/// Place one item into the first row that admits it, appending a new row
/// when none does. Returns the placement, or `None` for a degenerate span.
pub(crate) fn place_first_fit(grid: &mut Grid, item: &LayoutItem) -> Option<Placement> {
    if item.span == 0 || item.span > GRID_COLUMNS {
        return None;
    }
    for r in 0..grid.rows.len() {
        if let Some(col) = grid.rows[r].first_fit(item.span) {
            return Some(occupy(grid, item, r, col));
        }
    }
    let r = grid.push_empty_row();
    Some(occupy(grid, item, r, 0))
}

fn occupy(grid: &mut Grid, item: &LayoutItem, row: usize, col: usize) -> Placement {
    grid.rows[row].fill(col, item.span, &item.id);
    let placement = Placement::new(row, col, item.span);
    grid.placements.insert(item.id.clone(), placement);
    placement
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
