#![forbid(unsafe_code)]

//! Incremental reconciliation against a changed visible-widget set.
//!
//! [`reconcile`] adapts an existing grid when widgets are hidden, shown, or
//! added, without disturbing the placements of widgets that stay visible.
//! Vacated cells are only cleared, never compacted — gaps remain until the
//! normalizer runs.
//!
//! # Invariants
//!
//! 1. A widget visible before and after keeps its placement bit-identical.
//! 2. Departed widgets lose both their cells and their placement entry.
//! 3. Newly visible widgets are placed by the same first-fit scan the
//!    packer uses, over the current row set.

use std::collections::BTreeSet;

use dashgrid_core::WidgetId;

use crate::grid::{Grid, LayoutItem};
use crate::pack::place_first_fit;

/// Update `grid` so its placements cover exactly the `visible` items.
pub fn reconcile(grid: &mut Grid, visible: &[LayoutItem]) {
    let keep: BTreeSet<&WidgetId> = visible.iter().map(|i| &i.id).collect();

    let departed: Vec<_> = grid
        .placements
        .keys()
        .filter(|id| !keep.contains(id))
        .cloned()
        .collect();
    for id in &departed {
        if let Some(placement) = grid.placements.remove(id) {
            if let Some(row) = grid.rows.get_mut(placement.row) {
                row.clear_widget(id);
            }
        }
    }

    for item in visible {
        if !grid.contains(&item.id) {
            place_first_fit(grid, item);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Placement;
    use crate::pack::pack;
    use dashgrid_core::WidgetId;

    fn items(spans: &[(&str, usize)]) -> Vec<LayoutItem> {
        spans
            .iter()
            .map(|&(id, span)| LayoutItem::new(id, span))
            .collect()
    }

    #[test]
    fn hiding_a_widget_leaves_a_gap() {
        let mut grid = pack(&items(&[("a", 6), ("b", 6)]));
        reconcile(&mut grid, &items(&[("b", 6)]));

        assert!(!grid.contains(&WidgetId::new("a")));
        // b is untouched; the vacated cells stay empty until normalize.
        assert_eq!(grid.placement(&WidgetId::new("b")), Some(Placement::new(0, 6, 6)));
        assert_eq!(grid.rows()[0].get(0), None);
        assert_eq!(grid.validate(), Ok(()));
    }

    #[test]
    fn surviving_placements_are_bit_identical() {
        let mut grid = pack(&items(&[("a", 3), ("b", 4), ("c", 6), ("d", 3)]));
        let before: Vec<_> = ["b", "d"]
            .iter()
            .map(|id| grid.placement(&WidgetId::new(*id)).unwrap())
            .collect();

        reconcile(&mut grid, &items(&[("b", 4), ("d", 3)]));

        let after: Vec<_> = ["b", "d"]
            .iter()
            .map(|id| grid.placement(&WidgetId::new(*id)).unwrap())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn new_widget_fills_the_earliest_gap() {
        let mut grid = pack(&items(&[("a", 6), ("b", 6), ("c", 6)]));
        // Hide a: row 0 now has a span-6 hole at column 0.
        reconcile(&mut grid, &items(&[("b", 6), ("c", 6)]));
        // Show d: it takes the hole rather than opening a new row.
        reconcile(&mut grid, &items(&[("b", 6), ("c", 6), ("d", 6)]));

        assert_eq!(grid.placement(&WidgetId::new("d")), Some(Placement::new(0, 0, 6)));
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.validate(), Ok(()));
    }

    #[test]
    fn new_widget_appends_a_row_when_nothing_fits() {
        let mut grid = pack(&items(&[("a", 6), ("b", 6)]));
        reconcile(&mut grid, &items(&[("a", 6), ("b", 6), ("c", 8)]));

        assert_eq!(grid.placement(&WidgetId::new("c")), Some(Placement::new(1, 0, 8)));
        assert_eq!(grid.validate(), Ok(()));
    }

    #[test]
    fn empty_visible_set_clears_the_grid() {
        let mut grid = pack(&items(&[("a", 6), ("b", 6)]));
        reconcile(&mut grid, &[]);

        assert!(grid.is_empty());
        // Rows persist (now empty) until normalize drops them.
        assert_eq!(grid.row_count(), 1);
        assert!(grid.rows()[0].is_empty());
    }

    #[test]
    fn reconcile_is_stable_when_nothing_changed() {
        let visible = items(&[("a", 3), ("b", 4)]);
        let mut grid = pack(&visible);
        let snapshot = grid.clone();
        reconcile(&mut grid, &visible);
        assert_eq!(grid, snapshot);
    }
}
