#![forbid(unsafe_code)]

//! Row/column occupancy model for one layout surface.
//!
//! A [`Grid`] is an ordered list of 12-cell [`Row`]s plus a [`Placement`]
//! table keyed by widget id. Rows are the ground truth: a placement exists
//! for a widget iff that widget occupies cells, and
//! [`placements_from_rows`] re-derives the whole table from row contents.
//!
//! # Invariants
//!
//! 1. A widget's cells within its row are contiguous and equal its
//!    placement's `col..col + span` range.
//! 2. Distinct widgets in a row never overlap (a cell holds one id), and
//!    their spans sum to at most [`GRID_COLUMNS`].
//! 3. `col + span <= GRID_COLUMNS` for every placement.
//! 4. Every occupied cell is claimed by exactly one placement.
//!
//! [`Grid::validate`] checks all of these; mutation paths in this crate
//! preserve them between operations.
//!
//! # Failure Modes
//!
//! None at this layer — slot queries return `Option` and validation returns
//! a [`GridInvariantError`] describing the first violation found.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use dashgrid_core::{GRID_COLUMNS, WidgetId};

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One grid row: a fixed-size array of optional widget ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: [Option<WidgetId>; GRID_COLUMNS],
}

impl Row {
    /// An all-empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw cells.
    #[must_use]
    pub fn cells(&self) -> &[Option<WidgetId>] {
        &self.cells
    }

    /// The id occupying a column, if any.
    #[must_use]
    pub fn get(&self, col: usize) -> Option<&WidgetId> {
        self.cells.get(col).and_then(Option::as_ref)
    }

    /// Whether no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Whether any cell is free.
    #[must_use]
    pub fn has_gap(&self) -> bool {
        self.cells.iter().any(Option::is_none)
    }

    /// Distinct widget ids in order of first appearance, left to right.
    #[must_use]
    pub fn widget_ids(&self) -> Vec<WidgetId> {
        let mut ordered = Vec::new();
        for id in self.cells.iter().flatten() {
            if !ordered.contains(id) {
                ordered.push(id.clone());
            }
        }
        ordered
    }

    /// Index of the last occupied cell.
    #[must_use]
    pub fn last_occupied(&self) -> Option<usize> {
        self.cells.iter().rposition(Option::is_some)
    }

    /// Leftmost start column of `span` contiguous free cells.
    ///
    /// A full-width span only fits an entirely empty row.
    #[must_use]
    pub fn first_fit(&self, span: usize) -> Option<usize> {
        if span == 0 || span > GRID_COLUMNS {
            return None;
        }
        if span == GRID_COLUMNS {
            return self.is_empty().then_some(0);
        }
        (0..=GRID_COLUMNS - span).find(|&c| self.is_free(c, span))
    }

    /// Start column of the free `span`-slot nearest `col_guess`.
    ///
    /// Ties resolve to the lower column (first found scanning left to
    /// right).
    #[must_use]
    pub fn nearest_fit(&self, span: usize, col_guess: usize) -> Option<usize> {
        if span == 0 || span > GRID_COLUMNS {
            return None;
        }
        let mut best = None;
        let mut best_dist = usize::MAX;
        for c in 0..=GRID_COLUMNS - span {
            if !self.is_free(c, span) {
                continue;
            }
            let dist = c.abs_diff(col_guess);
            if dist < best_dist {
                best_dist = dist;
                best = Some(c);
            }
        }
        best
    }

    /// Write `id` into `col..col + span`.
    pub fn fill(&mut self, col: usize, span: usize, id: &WidgetId) {
        let end = (col + span).min(GRID_COLUMNS);
        for cell in &mut self.cells[col.min(GRID_COLUMNS)..end] {
            *cell = Some(id.clone());
        }
    }

    /// Clear every cell holding `id`.
    pub fn clear_widget(&mut self, id: &WidgetId) {
        for cell in &mut self.cells {
            if cell.as_ref() == Some(id) {
                *cell = None;
            }
        }
    }

    fn is_free(&self, col: usize, span: usize) -> bool {
        self.cells[col..col + span].iter().all(Option::is_none)
    }
}

// ---------------------------------------------------------------------------
// Placement and derived types
// ---------------------------------------------------------------------------

/// A widget's resolved position: row index, start column, and span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub span: usize,
}

impl Placement {
    #[must_use]
    pub const fn new(row: usize, col: usize, span: usize) -> Self {
        Self { row, col, span }
    }
}

/// A widget together with its resolved span, ready for placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutItem {
    pub id: WidgetId,
    pub span: usize,
}

impl LayoutItem {
    #[must_use]
    pub fn new(id: impl Into<WidgetId>, span: usize) -> Self {
        Self {
            id: id.into(),
            span,
        }
    }
}

/// A trailing free region in a row, offered to the UI as an insertion
/// affordance. Derived by normalization, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyTile {
    pub row: usize,
    pub col: usize,
    pub span: usize,
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Occupancy rows plus the placement table for one section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub(crate) rows: Vec<Row>,
    pub(crate) placements: BTreeMap<WidgetId, Placement>,
}

impl Grid {
    /// An empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The rows, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The placement for a widget, if it is currently laid out.
    #[must_use]
    pub fn placement(&self, id: &WidgetId) -> Option<Placement> {
        self.placements.get(id).copied()
    }

    /// Whether a widget is currently laid out.
    #[must_use]
    pub fn contains(&self, id: &WidgetId) -> bool {
        self.placements.contains_key(id)
    }

    /// All placements in deterministic id order.
    pub fn placements(&self) -> impl Iterator<Item = (&WidgetId, Placement)> {
        self.placements.iter().map(|(id, p)| (id, *p))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Append an all-empty row, returning its index.
    pub(crate) fn push_empty_row(&mut self) -> usize {
        self.rows.push(Row::new());
        self.rows.len() - 1
    }

    /// Total span of the distinct placed widgets in one row.
    #[must_use]
    pub fn row_total_span(&self, row_idx: usize) -> usize {
        let Some(row) = self.rows.get(row_idx) else {
            return 0;
        };
        row.widget_ids()
            .iter()
            .filter_map(|id| self.placements.get(id))
            .map(|p| p.span)
            .sum()
    }

    /// Check the structural invariants, returning the first violation.
    pub fn validate(&self) -> Result<(), GridInvariantError> {
        for (id, p) in &self.placements {
            if p.span == 0 || p.col + p.span > GRID_COLUMNS || p.row >= self.rows.len() {
                return Err(GridInvariantError::PlacementOutOfBounds {
                    id: id.clone(),
                    placement: *p,
                });
            }
            let row = &self.rows[p.row];
            for col in p.col..p.col + p.span {
                if row.get(col) != Some(id) {
                    return Err(GridInvariantError::CellMismatch {
                        id: id.clone(),
                        row: p.row,
                        col,
                    });
                }
            }
        }
        for (r, row) in self.rows.iter().enumerate() {
            for (c, cell) in row.cells().iter().enumerate() {
                let Some(id) = cell else { continue };
                let claimed = self.placements.get(id).is_some_and(|p| {
                    p.row == r && (p.col..p.col + p.span).contains(&c)
                });
                if !claimed {
                    return Err(GridInvariantError::OrphanCell {
                        id: id.clone(),
                        row: r,
                        col: c,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Re-derive the placement table from row contents.
///
/// Scans each row left to right, grouping contiguous runs of equal ids into
/// spans. The first run of an id wins if a later duplicate exists. This is
/// the authoritative reconstruction normalization ends with: the result can
/// never disagree with the rows it was read from.
#[must_use]
pub fn placements_from_rows(rows: &[Row]) -> BTreeMap<WidgetId, Placement> {
    let mut rebuilt = BTreeMap::new();
    for (r, row) in rows.iter().enumerate() {
        let mut c = 0;
        while c < GRID_COLUMNS {
            let Some(id) = row.get(c) else {
                c += 1;
                continue;
            };
            let mut span = 1;
            while c + span < GRID_COLUMNS && row.get(c + span) == Some(id) {
                span += 1;
            }
            rebuilt
                .entry(id.clone())
                .or_insert(Placement::new(r, c, span));
            c += span;
        }
    }
    rebuilt
}

/// Structural invariant violations reported by [`Grid::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridInvariantError {
    PlacementOutOfBounds { id: WidgetId, placement: Placement },
    CellMismatch { id: WidgetId, row: usize, col: usize },
    OrphanCell { id: WidgetId, row: usize, col: usize },
}

impl fmt::Display for GridInvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlacementOutOfBounds { id, placement } => write!(
                f,
                "placement for {id} is out of bounds (row {}, col {}, span {})",
                placement.row, placement.col, placement.span
            ),
            Self::CellMismatch { id, row, col } => write!(
                f,
                "cell ({row}, {col}) does not hold {id} claimed by its placement"
            ),
            Self::OrphanCell { id, row, col } => write!(
                f,
                "cell ({row}, {col}) holds {id} outside any placement claim"
            ),
        }
    }
}

impl std::error::Error for GridInvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
