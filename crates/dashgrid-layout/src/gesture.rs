#![forbid(unsafe_code)]

//! Pointer-driven drag and resize gestures over a grid.
//!
//! [`Gesture`] is an explicit state machine: `Idle`, `Dragging`, or
//! `Resizing`. Starting either gesture while the other is active is a
//! no-op, so drag/resize mutual exclusion is carried by the type rather
//! than by flags.
//!
//! # State Machine
//!
//! - **start** captures the widget's span and source placement and
//!   initializes the tracked target to the source slot (drag) or current
//!   span (resize). Requires `Idle` and an existing placement.
//! - **pointer_moved** only records the sample; rapid moves coalesce
//!   latest-wins.
//! - **frame** consumes the pending sample once per animation frame and
//!   retargets. A sample that resolves to no valid slot is ignored and the
//!   previous target is retained.
//! - **end** commits the tracked target into the grid and returns to
//!   `Idle`. There is no cancel path: releasing outside a valid target
//!   commits the last valid one, which starts out as the source slot.
//!
//! The caller must run the normalizer after `end` before the grid is read
//! for rendering.
//!
//! # Invariants
//!
//! 1. At most one gesture is active at a time.
//! 2. The tracked drag target is always a valid, non-overlapping slot for
//!    the dragged span (the source slot until a move says otherwise).
//! 3. The tracked resize target is always a member of the allowed set that
//!    fits the row.
//! 4. A gesture either leaves the grid unchanged or relocates/resizes
//!    exactly one widget.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use dashgrid_core::{GRID_COLUMNS, PointerPosition, Surface, WidgetId};

use crate::grid::{EmptyTile, Grid, Placement};
use crate::span_ops::set_span;

// ---------------------------------------------------------------------------
// Contexts
// ---------------------------------------------------------------------------

/// Live state of a drag gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragContext {
    widget: WidgetId,
    span: usize,
    source: Placement,
    target_row: usize,
    target_col: usize,
    pending: Option<PointerPosition>,
}

impl DragContext {
    /// The currently tracked drop slot.
    #[must_use]
    pub fn target(&self) -> (usize, usize) {
        (self.target_row, self.target_col)
    }

    /// The placement the widget was dragged out of.
    #[must_use]
    pub fn source(&self) -> Placement {
        self.source
    }

    /// The span being dragged.
    #[must_use]
    pub fn span(&self) -> usize {
        self.span
    }
}

/// Live state of a resize gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeContext {
    widget: WidgetId,
    start_x: f64,
    start_span: usize,
    surface_width: f64,
    allowed: Vec<usize>,
    target_span: usize,
    pending: Option<PointerPosition>,
}

impl ResizeContext {
    /// The currently tracked target span.
    #[must_use]
    pub fn target_span(&self) -> usize {
        self.target_span
    }

    /// The span the gesture started from.
    #[must_use]
    pub fn start_span(&self) -> usize {
        self.start_span
    }
}

/// Row occupancy under the tracked resize target, for live placeholder and
/// empty-tile adjustment in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizePreview {
    pub row: usize,
    pub occupied: usize,
    /// The trailing free region the row would have, if any.
    pub empty: Option<EmptyTile>,
}

/// What a finished gesture did.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEnd {
    Drag {
        widget: WidgetId,
        target: Placement,
    },
    Resize {
        widget: WidgetId,
        span: usize,
        /// False when the span matched the starting span or the row
        /// rejected it; the grid is unchanged in that case.
        applied: bool,
    },
}

// ---------------------------------------------------------------------------
// Gesture
// ---------------------------------------------------------------------------

/// Drag/resize gesture state over one grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(DragContext),
    Resizing(ResizeContext),
}

impl Gesture {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    #[must_use]
    pub fn is_resizing(&self) -> bool {
        matches!(self, Self::Resizing(_))
    }

    /// Begin dragging a widget. No-op unless idle and the widget is placed.
    pub fn start_drag(&mut self, grid: &Grid, id: &WidgetId) -> bool {
        if !self.is_idle() {
            return false;
        }
        let Some(source) = grid.placement(id) else {
            return false;
        };
        debug!(widget = %id, row = source.row, col = source.col, "drag start");
        *self = Self::Dragging(DragContext {
            widget: id.clone(),
            span: source.span,
            source,
            target_row: source.row,
            target_col: source.col,
            pending: None,
        });
        true
    }

    /// Begin resizing a widget. No-op unless idle and the widget is placed.
    ///
    /// Captures the starting pointer x, the surface width, and the allowed
    /// span set; the feasible subset is re-derived from the grid each
    /// frame.
    pub fn start_resize(
        &mut self,
        grid: &Grid,
        id: &WidgetId,
        pointer: PointerPosition,
        surface: &Surface,
        allowed: &[usize],
    ) -> bool {
        if !self.is_idle() {
            return false;
        }
        let Some(placement) = grid.placement(id) else {
            return false;
        };
        debug!(widget = %id, span = placement.span, "resize start");
        *self = Self::Resizing(ResizeContext {
            widget: id.clone(),
            start_x: pointer.x,
            start_span: placement.span,
            surface_width: surface.width,
            allowed: allowed.to_vec(),
            target_span: placement.span,
            pending: None,
        });
        true
    }

    /// Record a pointer sample. Rapid samples coalesce; only the latest is
    /// consumed by the next [`frame`](Self::frame).
    pub fn pointer_moved(&mut self, pos: PointerPosition) {
        match self {
            Self::Idle => {}
            Self::Dragging(ctx) => ctx.pending = Some(pos),
            Self::Resizing(ctx) => ctx.pending = Some(pos),
        }
    }

    /// Consume the pending pointer sample and retarget.
    ///
    /// Called once per animation frame while a gesture is active. Without a
    /// pending sample this does nothing.
    pub fn frame(&mut self, grid: &Grid, surface: &Surface) {
        match self {
            Self::Idle => {}
            Self::Dragging(ctx) => {
                if let Some(pos) = ctx.pending.take() {
                    drag_frame(ctx, grid, surface, pos);
                }
            }
            Self::Resizing(ctx) => {
                if let Some(pos) = ctx.pending.take() {
                    resize_frame(ctx, grid, pos);
                }
            }
        }
    }

    /// The drag context, while dragging.
    #[must_use]
    pub fn dragging(&self) -> Option<&DragContext> {
        match self {
            Self::Dragging(ctx) => Some(ctx),
            _ => None,
        }
    }

    /// The resize context, while resizing.
    #[must_use]
    pub fn resizing(&self) -> Option<&ResizeContext> {
        match self {
            Self::Resizing(ctx) => Some(ctx),
            _ => None,
        }
    }

    /// Row occupancy under the tracked resize target.
    #[must_use]
    pub fn resize_preview(&self, grid: &Grid) -> Option<ResizePreview> {
        let ctx = self.resizing()?;
        let placement = grid.placement(&ctx.widget)?;
        let row = grid.rows().get(placement.row)?;
        let occupied: usize = row
            .widget_ids()
            .iter()
            .filter_map(|id| {
                if id == &ctx.widget {
                    Some(ctx.target_span)
                } else {
                    grid.placement(id).map(|p| p.span)
                }
            })
            .sum();
        let empty = (occupied < GRID_COLUMNS).then(|| EmptyTile {
            row: placement.row,
            col: occupied,
            span: GRID_COLUMNS - occupied,
        });
        Some(ResizePreview {
            row: placement.row,
            occupied,
            empty,
        })
    }

    /// Commit the gesture and return to idle.
    ///
    /// Dragging writes the widget into the tracked slot (appending a row
    /// when the target lies beyond the last). Resizing applies the tracked
    /// span through the span mutator, which may still reject it silently.
    /// Returns `None` when idle or when the dragged widget vanished
    /// mid-gesture.
    pub fn end(&mut self, grid: &mut Grid) -> Option<GestureEnd> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::Dragging(ctx) => commit_drag(ctx, grid),
            Self::Resizing(ctx) => {
                let applied = set_span(grid, &ctx.widget, ctx.target_span, &ctx.allowed);
                debug!(widget = %ctx.widget, span = ctx.target_span, applied, "resize end");
                Some(GestureEnd::Resize {
                    widget: ctx.widget,
                    span: ctx.target_span,
                    applied,
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Drag resolution
// ---------------------------------------------------------------------------

fn drag_frame(ctx: &mut DragContext, grid: &Grid, surface: &Surface, pos: PointerPosition) {
    let target_row = resolve_target_row(surface, pos.y);
    if target_row < grid.rows().len() {
        // The widget may be dragged within its own row: its cells do not
        // block the slot search.
        let mut row = grid.rows()[target_row].clone();
        row.clear_widget(&ctx.widget);
        let guess = surface.column_at(pos.x);
        match row.nearest_fit(ctx.span, guess) {
            Some(col) => {
                ctx.target_row = target_row;
                ctx.target_col = col;
                trace!(row = target_row, col, "drag retarget");
            }
            None => {
                // No room in the hovered row; the previous target stands.
            }
        }
    } else {
        ctx.target_row = target_row;
        ctx.target_col = 0;
        trace!(row = target_row, "drag retarget to appended row");
    }
}

/// The row whose vertical band contains `y`; below every band resolves to
/// one past the last row (an appended row), above every band to row 0.
fn resolve_target_row(surface: &Surface, y: f64) -> usize {
    for (idx, band) in surface.bands.iter().enumerate() {
        if band.is_some_and(|b| b.contains(y)) {
            return idx;
        }
    }
    let last_bottom = surface
        .bands
        .last()
        .copied()
        .flatten()
        .map_or(surface.bottom, |b| b.bottom);
    if surface.bands.is_empty() || y > last_bottom {
        surface.bands.len()
    } else {
        0
    }
}

fn commit_drag(ctx: DragContext, grid: &mut Grid) -> Option<GestureEnd> {
    let Some(mut placement) = grid.placement(&ctx.widget) else {
        return None;
    };
    if let Some(row) = grid.rows.get_mut(placement.row) {
        row.clear_widget(&ctx.widget);
    }
    let target_row = if ctx.target_row >= grid.rows.len() {
        grid.push_empty_row()
    } else {
        ctx.target_row
    };
    grid.rows[target_row].fill(ctx.target_col, ctx.span, &ctx.widget);
    placement.row = target_row;
    placement.col = ctx.target_col;
    grid.placements.insert(ctx.widget.clone(), placement);
    debug!(widget = %ctx.widget, row = target_row, col = ctx.target_col, "drag end");
    Some(GestureEnd::Drag {
        widget: ctx.widget,
        target: placement,
    })
}

// ---------------------------------------------------------------------------
// Resize resolution
// ---------------------------------------------------------------------------

fn resize_frame(ctx: &mut ResizeContext, grid: &Grid, pos: PointerPosition) {
    let Some(placement) = grid.placement(&ctx.widget) else {
        return;
    };
    let other = grid.row_total_span(placement.row) - placement.span;
    let max_by_row = GRID_COLUMNS - other;
    let feasible: Vec<usize> = ctx
        .allowed
        .iter()
        .copied()
        .filter(|&s| s <= max_by_row)
        .collect();
    let Some(&max_feasible) = feasible.last() else {
        return;
    };

    let pct = |span: usize| span as f64 / GRID_COLUMNS as f64 * 100.0;
    let delta_pct = if ctx.surface_width > 0.0 {
        (pos.x - ctx.start_x) / ctx.surface_width * 100.0
    } else {
        0.0
    };
    let desired = (pct(ctx.start_span) + delta_pct)
        .min(pct(max_feasible))
        .max(pct(ctx.allowed[0]));

    let mut target = feasible[0];
    let mut best_dist = f64::INFINITY;
    for &span in &feasible {
        let dist = (pct(span) - desired).abs();
        if dist < best_dist {
            best_dist = dist;
            target = span;
        }
    }
    if target != ctx.target_span {
        trace!(span = target, "resize retarget");
    }
    ctx.target_span = target;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
