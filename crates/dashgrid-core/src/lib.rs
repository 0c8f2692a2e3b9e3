#![forbid(unsafe_code)]

//! Primitives consumed by the dashgrid layout engine.
//!
//! This crate carries no layout logic. It defines the vocabulary the engine
//! and its host UI share: stable widget identity ([`WidgetId`]), the widget
//! sizing contract ([`WidgetDef`], [`SizeClass`], [`WidthHint`]), the
//! externally supplied span policy ([`SpanRules`]), and the pointer-space
//! geometry a host reports during gestures ([`PointerPosition`],
//! [`RowBand`], [`Surface`]).

pub mod geometry;
pub mod span;
pub mod widget;

pub use geometry::{PointerPosition, RowBand, Surface};
pub use span::{GRID_COLUMNS, SpanRules, SpanRulesError};
pub use widget::{SizeClass, WidgetDef, WidgetId, WidthHint};
