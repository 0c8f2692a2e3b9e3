#![forbid(unsafe_code)]

//! Row-based 12-column packing and layout maintenance for dashboard widget
//! grids.
//!
//! The engine keeps one [`Grid`] per section: a list of 12-cell rows plus a
//! placement table. [`pack`] lays a widget sequence out from scratch with
//! first-fit shelf packing; [`reconcile`] adapts an existing grid to a
//! changed visible-widget set without disturbing survivors; [`normalize`]
//! compacts rows, applies the empty-row policy, re-derives placements from
//! row contents, and reports trailing [`EmptyTile`]s; [`set_span`] /
//! [`adjust_span`] change a widget's column span in place; [`Gesture`]
//! tracks drag relocation and resize snapping over pointer input. The
//! [`LayoutStore`] facade owns the grids and runs the
//! pack/reconcile/normalize pipeline per section.
//!
//! Every mutation must be followed by [`normalize`] before the grid is read
//! for rendering; the store and gesture commit paths do this themselves.

pub use dashgrid_core::{
    GRID_COLUMNS, PointerPosition, RowBand, SizeClass, SpanRules, SpanRulesError, Surface,
    WidgetDef, WidgetId, WidthHint,
};

pub mod gesture;
pub mod grid;
pub mod normalize;
pub mod pack;
pub mod reconcile;
pub mod span_ops;
pub mod store;

pub use gesture::{DragContext, Gesture, GestureEnd, ResizeContext, ResizePreview};
pub use grid::{
    EmptyTile, Grid, GridInvariantError, LayoutItem, Placement, Row, placements_from_rows,
};
pub use normalize::{compact_row, normalize};
pub use pack::pack;
pub use reconcile::reconcile;
pub use span_ops::{SpanStep, adjust_span, can_contract, can_expand, feasible_spans, set_span};
pub use store::{LayoutStore, SectionId, SectionView};
