#![forbid(unsafe_code)]

//! Post-mutation cleanup: row compaction, empty-row policy, authoritative
//! placement re-derivation, and trailing empty-tile computation.
//!
//! Every mutation path (reconcile, span change, drag commit) must be
//! followed by [`normalize`] before the grid is read for rendering.
//!
//! # Algorithm
//!
//! 1. Compact every non-empty row: its widgets are reassigned contiguously
//!    from column 0 in first-appearance order, each keeping its span.
//! 2. Empty-row policy: if no compacted row has leftover gaps and the very
//!    last row is fully empty, exactly that one trailing empty row is kept
//!    as the end-of-grid drop zone; every other fully-empty row is dropped
//!    and remaining rows re-index densely from 0.
//! 3. The placement table is rebuilt from final row contents
//!    ([`placements_from_rows`]) — rows are the single source of truth, so
//!    the table can never disagree with them.
//! 4. Each row with free space after its last occupied cell yields one
//!    [`EmptyTile`] reaching to the right edge. A fully empty row yields
//!    none: the row itself is the affordance.
//!
//! # Invariants
//!
//! 1. Idempotent: normalizing a normalized grid changes nothing.
//! 2. After normalization the placement table equals
//!    `placements_from_rows(rows)` exactly.
//! 3. At most one trailing fully-empty row survives, and only when no
//!    other row has a gap.

use dashgrid_core::GRID_COLUMNS;

use crate::grid::{EmptyTile, Grid, Row, placements_from_rows};

/// Reassign one row's widgets contiguously from column 0, preserving their
/// left-to-right order and spans. Ids without a placement entry drop out of
/// the row.
pub fn compact_row(grid: &mut Grid, row_idx: usize) {
    let Some(row) = grid.rows.get(row_idx) else {
        return;
    };
    let ids = row.widget_ids();
    let mut compacted = Row::new();
    let mut col = 0;
    for id in ids {
        let Some(placement) = grid.placements.get_mut(&id) else {
            continue;
        };
        compacted.fill(col, placement.span, &id);
        placement.row = row_idx;
        placement.col = col;
        col += placement.span;
    }
    grid.rows[row_idx] = compacted;
}

/// Compact rows, apply the empty-row policy, rebuild placements from the
/// final rows, and report the trailing empty tiles.
pub fn normalize(grid: &mut Grid) -> Vec<EmptyTile> {
    let mut has_gap = false;
    for idx in 0..grid.rows.len() {
        if grid.rows[idx].is_empty() {
            continue;
        }
        compact_row(grid, idx);
        if grid.rows[idx].has_gap() {
            has_gap = true;
        }
    }

    let keep_trailing_empty = !has_gap && grid.rows.last().is_some_and(Row::is_empty);
    let last_idx = grid.rows.len().checked_sub(1);
    let mut final_rows = Vec::with_capacity(grid.rows.len());
    for (idx, row) in grid.rows.drain(..).enumerate() {
        if row.is_empty() && !(keep_trailing_empty && Some(idx) == last_idx) {
            continue;
        }
        final_rows.push(row);
    }
    grid.rows = final_rows;

    grid.placements = placements_from_rows(&grid.rows);

    let mut tiles = Vec::new();
    for (r, row) in grid.rows.iter().enumerate() {
        let Some(last_occupied) = row.last_occupied() else {
            continue;
        };
        let occupied = last_occupied + 1;
        if occupied < GRID_COLUMNS {
            tiles.push(EmptyTile {
                row: r,
                col: occupied,
                span: GRID_COLUMNS - occupied,
            });
        }
    }
    tiles
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{LayoutItem, Placement};
    use crate::pack::pack;
    use crate::reconcile::reconcile;
    use dashgrid_core::WidgetId;

    fn id(raw: &str) -> WidgetId {
        WidgetId::new(raw)
    }

    fn items(spans: &[(&str, usize)]) -> Vec<LayoutItem> {
        spans
            .iter()
            .map(|&(i, span)| LayoutItem::new(i, span))
            .collect()
    }

    #[test]
    fn hidden_neighbor_compacts_and_reports_the_tile() {
        let mut grid = pack(&items(&[("a", 6), ("b", 6)]));
        reconcile(&mut grid, &items(&[("b", 6)]));

        let tiles = normalize(&mut grid);

        assert_eq!(grid.placement(&id("b")), Some(Placement::new(0, 0, 6)));
        assert_eq!(tiles, vec![EmptyTile { row: 0, col: 6, span: 6 }]);
        assert_eq!(grid.validate(), Ok(()));
    }

    #[test]
    fn compaction_preserves_left_to_right_order() {
        let mut grid = Grid::new();
        grid.push_empty_row();
        grid.rows[0].fill(3, 3, &id("a"));
        grid.rows[0].fill(8, 4, &id("b"));
        grid.placements.insert(id("a"), Placement::new(0, 3, 3));
        grid.placements.insert(id("b"), Placement::new(0, 8, 4));

        compact_row(&mut grid, 0);

        assert_eq!(grid.placement(&id("a")), Some(Placement::new(0, 0, 3)));
        assert_eq!(grid.placement(&id("b")), Some(Placement::new(0, 3, 4)));
        assert_eq!(grid.validate(), Ok(()));
    }

    #[test]
    fn compact_row_drops_ids_without_placements() {
        let mut grid = Grid::new();
        grid.push_empty_row();
        grid.rows[0].fill(0, 3, &id("ghost"));
        grid.rows[0].fill(6, 3, &id("a"));
        grid.placements.insert(id("a"), Placement::new(0, 6, 3));

        compact_row(&mut grid, 0);

        assert_eq!(grid.rows()[0].get(0), Some(&id("a")));
        assert!(grid.rows()[0].widget_ids() == vec![id("a")]);
    }

    #[test]
    fn interior_empty_rows_are_always_dropped() {
        let mut grid = pack(&items(&[("a", 12), ("b", 12)]));
        reconcile(&mut grid, &items(&[("b", 12)]));
        // Row 0 is now empty, row 1 holds b.
        normalize(&mut grid);

        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.placement(&id("b")), Some(Placement::new(0, 0, 12)));
    }

    #[test]
    fn trailing_empty_row_survives_when_no_row_has_gaps() {
        let mut grid = pack(&items(&[("a", 6), ("b", 6)]));
        grid.push_empty_row();

        let tiles = normalize(&mut grid);

        assert_eq!(grid.row_count(), 2);
        assert!(grid.rows()[1].is_empty());
        // The kept drop-zone row reports no tile; row 0 is full.
        assert!(tiles.is_empty());
    }

    #[test]
    fn trailing_empty_row_is_dropped_when_a_gap_exists() {
        let mut grid = pack(&items(&[("a", 6)]));
        grid.push_empty_row();

        let tiles = normalize(&mut grid);

        assert_eq!(grid.row_count(), 1);
        assert_eq!(tiles, vec![EmptyTile { row: 0, col: 6, span: 6 }]);
    }

    #[test]
    fn placements_match_rows_after_normalize() {
        let mut grid = pack(&items(&[("a", 3), ("b", 4), ("c", 6), ("d", 3)]));
        reconcile(&mut grid, &items(&[("b", 4), ("c", 6), ("d", 3)]));
        normalize(&mut grid);

        let rebuilt = placements_from_rows(grid.rows());
        assert_eq!(rebuilt, grid.placements);
        assert_eq!(grid.validate(), Ok(()));
    }

    #[test]
    fn normalize_is_idempotent() {
        let mut grid = pack(&items(&[("a", 3), ("b", 6), ("c", 8), ("d", 4)]));
        reconcile(&mut grid, &items(&[("a", 3), ("c", 8), ("d", 4)]));

        let tiles_first = normalize(&mut grid);
        let snapshot = grid.clone();
        let tiles_second = normalize(&mut grid);

        assert_eq!(grid, snapshot);
        assert_eq!(tiles_first, tiles_second);
    }

    #[test]
    fn full_rows_report_no_tiles() {
        let mut grid = pack(&items(&[("a", 6), ("b", 6)]));
        let tiles = normalize(&mut grid);
        assert!(tiles.is_empty());
    }

    #[test]
    fn one_tile_per_gapped_row() {
        let mut grid = pack(&items(&[("a", 8), ("b", 9), ("c", 4)]));
        // Rows: a(8)+c(4) fill row 0, b(9) alone in row 1.
        let tiles = normalize(&mut grid);
        assert_eq!(tiles, vec![EmptyTile { row: 1, col: 9, span: 3 }]);
    }
}
