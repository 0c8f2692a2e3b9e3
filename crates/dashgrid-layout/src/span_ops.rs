#![forbid(unsafe_code)]

//! Discrete span changes with row-capacity validation.
//!
//! [`set_span`] jumps to an arbitrary member of the widget's allowed span
//! set; [`adjust_span`] steps to the neighboring member. Both are silent
//! no-ops when the request is invalid or the row cannot absorb the change,
//! and both re-compact the affected row so neighbors reflow immediately.
//! The allowed set itself comes from the caller (resolved via
//! `SpanRules`) — this module never consults policy.
//!
//! # Failure Modes
//!
//! All rejections are no-ops signalled through the return value: missing
//! placement, target outside the allowed set, target equal to the current
//! span, or `row total − current + target > GRID_COLUMNS`.

use dashgrid_core::{GRID_COLUMNS, WidgetId};
use serde::{Deserialize, Serialize};

use crate::grid::{Grid, Placement};
use crate::normalize::compact_row;

/// Direction for stepped span adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanStep {
    Expand,
    Contract,
}

/// Set a widget's span to `target`, re-compacting its row.
///
/// Returns whether the change was applied.
pub fn set_span(grid: &mut Grid, id: &WidgetId, target: usize, allowed: &[usize]) -> bool {
    let Some(placement) = grid.placement(id) else {
        return false;
    };
    if !allowed.contains(&target) || target == placement.span {
        return false;
    }
    if !fits_row(grid, placement, target) {
        return false;
    }
    apply_span(grid, id, placement, target);
    true
}

/// Step a widget's span to the next (or previous) allowed value.
///
/// Returns the applied span, or `None` when already at the boundary, when
/// the next step would not fit the row, or when the current span is not a
/// member of the allowed set.
pub fn adjust_span(
    grid: &mut Grid,
    id: &WidgetId,
    step: SpanStep,
    allowed: &[usize],
) -> Option<usize> {
    let placement = grid.placement(id)?;
    let idx = allowed.iter().position(|&s| s == placement.span)?;
    let target = match step {
        SpanStep::Expand => {
            let next = *allowed.get(idx + 1)?;
            if !fits_row(grid, placement, next) {
                return None;
            }
            next
        }
        SpanStep::Contract => {
            let prev = idx.checked_sub(1)?;
            allowed[prev]
        }
    };
    apply_span(grid, id, placement, target);
    Some(target)
}

/// Whether the widget can step up to its next allowed span within the row.
#[must_use]
pub fn can_expand(grid: &Grid, id: &WidgetId, allowed: &[usize]) -> bool {
    let Some(placement) = grid.placement(id) else {
        return false;
    };
    let Some(idx) = allowed.iter().position(|&s| s == placement.span) else {
        return false;
    };
    match allowed.get(idx + 1) {
        Some(&next) => fits_row(grid, placement, next),
        None => false,
    }
}

/// Whether the widget can step down to its previous allowed span.
#[must_use]
pub fn can_contract(grid: &Grid, id: &WidgetId, allowed: &[usize]) -> bool {
    grid.placement(id)
        .and_then(|p| allowed.iter().position(|&s| s == p.span))
        .is_some_and(|idx| idx > 0)
}

/// The allowed spans that fit the widget's row alongside its neighbors.
///
/// Empty when the widget has no placement.
#[must_use]
pub fn feasible_spans(grid: &Grid, id: &WidgetId, allowed: &[usize]) -> Vec<usize> {
    let Some(placement) = grid.placement(id) else {
        return Vec::new();
    };
    let other = grid.row_total_span(placement.row) - placement.span;
    allowed
        .iter()
        .copied()
        .filter(|&s| s <= GRID_COLUMNS - other)
        .collect()
}

fn fits_row(grid: &Grid, placement: Placement, target: usize) -> bool {
    let total = grid.row_total_span(placement.row);
    total - placement.span + target <= GRID_COLUMNS
}

fn apply_span(grid: &mut Grid, id: &WidgetId, placement: Placement, target: usize) {
    if let Some(row) = grid.rows.get_mut(placement.row) {
        row.clear_widget(id);
        // One placeholder cell keeps the widget discoverable by the row
        // scan; compaction rebuilds the full extent from the new span.
        row.fill(placement.col, 1, id);
    }
    if let Some(p) = grid.placements.get_mut(id) {
        p.span = target;
    }
    compact_row(grid, placement.row);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::LayoutItem;
    use crate::pack::pack;
    use dashgrid_core::WidgetId;

    const SMALL: &[usize] = &[3, 4, 6];
    const LARGE: &[usize] = &[6, 8, 9, 12];

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
    fn grow_rejected_when_row_cannot_absorb_it() {
        let mut grid = pack(&items(&[("a", 6), ("b", 6)]));

        // 12 - 6 + 9 = 15 > 12.
        assert!(!set_span(&mut grid, &id("a"), 9, LARGE));
        assert_eq!(grid.placement(&id("a")).unwrap().span, 6);
        assert_eq!(grid.validate(), Ok(()));
    }

    #[test]
    fn grow_applies_and_reflows_neighbors() {
        let mut grid = pack(&items(&[("a", 3), ("b", 4)]));

        assert!(set_span(&mut grid, &id("a"), 6, SMALL));

        let a = grid.placement(&id("a")).unwrap();
        let b = grid.placement(&id("b")).unwrap();
        assert_eq!((a.col, a.span), (0, 6));
        assert_eq!((b.col, b.span), (6, 4));
        assert_eq!(grid.validate(), Ok(()));
    }

    #[test]
    fn shrink_compacts_the_row() {
        let mut grid = pack(&items(&[("a", 6), ("b", 6)]));

        assert!(set_span(&mut grid, &id("a"), 3, SMALL));

        let b = grid.placement(&id("b")).unwrap();
        assert_eq!(b.col, 3);
        assert_eq!(grid.validate(), Ok(()));
    }

    #[test]
    fn target_outside_allowed_set_is_a_noop() {
        let mut grid = pack(&items(&[("a", 3)]));
        assert!(!set_span(&mut grid, &id("a"), 5, SMALL));
        assert!(!set_span(&mut grid, &id("a"), 3, SMALL)); // unchanged target
        assert!(!set_span(&mut grid, &id("missing"), 4, SMALL));
    }

    #[test]
    fn expand_walks_the_allowed_set() {
        let mut grid = pack(&items(&[("a", 3)]));
        assert_eq!(adjust_span(&mut grid, &id("a"), SpanStep::Expand, SMALL), Some(4));
        assert_eq!(adjust_span(&mut grid, &id("a"), SpanStep::Expand, SMALL), Some(6));
        assert_eq!(adjust_span(&mut grid, &id("a"), SpanStep::Expand, SMALL), None);
    }

    #[test]
    fn expand_blocked_by_a_full_row() {
        let mut grid = pack(&items(&[("a", 6), ("b", 6)]));
        assert!(!can_expand(&grid, &id("a"), LARGE));
        assert_eq!(adjust_span(&mut grid, &id("a"), SpanStep::Expand, LARGE), None);
    }

    #[test]
    fn contract_stops_at_the_minimum() {
        let mut grid = pack(&items(&[("a", 4)]));
        assert!(can_contract(&grid, &id("a"), SMALL));
        assert_eq!(adjust_span(&mut grid, &id("a"), SpanStep::Contract, SMALL), Some(3));
        assert!(!can_contract(&grid, &id("a"), SMALL));
        assert_eq!(adjust_span(&mut grid, &id("a"), SpanStep::Contract, SMALL), None);
    }

    #[test]
    fn stepping_from_a_stale_span_is_a_noop() {
        // Span 5 is not a member of the small set.
        let mut grid = pack(&items(&[("a", 5)]));
        assert_eq!(adjust_span(&mut grid, &id("a"), SpanStep::Expand, SMALL), None);
        assert!(!can_expand(&grid, &id("a"), SMALL));
    }

    #[test]
    fn feasible_spans_respect_neighbors() {
        let grid = pack(&items(&[("a", 6), ("b", 6)]));
        assert_eq!(feasible_spans(&grid, &id("a"), LARGE), vec![6]);

        let alone = pack(&items(&[("a", 6)]));
        assert_eq!(feasible_spans(&alone, &id("a"), LARGE), vec![6, 8, 9, 12]);
        assert!(feasible_spans(&alone, &id("zz"), LARGE).is_empty());
    }
}
