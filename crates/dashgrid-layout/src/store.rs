#![forbid(unsafe_code)]

//! Per-section layout ownership.
//!
//! [`LayoutStore`] owns one [`Grid`] per section (an independent layout
//! surface) plus the user-chosen span memory, and applies the
//! pack → reconcile → normalize pipeline whenever a section's visible
//! widget set is (re)presented. All layout functions stay pure over grids;
//! this is the only stateful facade.
//!
//! A section's grid is created lazily by the packer on first
//! [`reflow`](LayoutStore::reflow) and persists across visibility toggles;
//! it is only discarded explicitly ([`discard_section`](
//! LayoutStore::discard_section) / [`clear`](LayoutStore::clear), the
//! filter-reset path).

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use dashgrid_core::{SpanRules, WidgetDef, WidgetId};

use crate::gesture::{Gesture, GestureEnd};
use crate::grid::{EmptyTile, Grid, LayoutItem, Placement};
use crate::normalize::normalize;
use crate::pack::pack;
use crate::reconcile::reconcile;
use crate::span_ops::{SpanStep, adjust_span, set_span};

/// Stable identifier for a layout section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Render-ready result of one reflow: placements in row-major order plus
/// the trailing empty tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub placements: Vec<(WidgetId, Placement)>,
    pub row_count: usize,
    pub empty_tiles: Vec<EmptyTile>,
}

/// Owns the grids and chosen-span memory for every section.
#[derive(Debug, Clone, Default)]
pub struct LayoutStore {
    rules: SpanRules,
    sections: FxHashMap<SectionId, Grid>,
    chosen_spans: FxHashMap<WidgetId, usize>,
}

impl LayoutStore {
    /// Create a store with the given span policy.
    #[must_use]
    pub fn new(rules: SpanRules) -> Self {
        Self {
            rules,
            sections: FxHashMap::default(),
            chosen_spans: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn rules(&self) -> &SpanRules {
        &self.rules
    }

    /// A section's grid, if it has been laid out.
    #[must_use]
    pub fn grid(&self, section: &SectionId) -> Option<&Grid> {
        self.sections.get(section)
    }

    /// Mutable access for the gesture layer.
    #[must_use]
    pub fn grid_mut(&mut self, section: &SectionId) -> Option<&mut Grid> {
        self.sections.get_mut(section)
    }

    /// The span a widget currently resolves to: its recorded chosen span if
    /// any, else its base span, reset to the minimum allowed when stale.
    #[must_use]
    pub fn resolved_span(&self, def: &WidgetDef) -> usize {
        self.rules
            .resolve(def, self.chosen_spans.get(&def.id).copied())
    }

    /// Remember a user-chosen span. Also the seeding point for spans
    /// restored by the persistence collaborator.
    pub fn record_span(&mut self, id: WidgetId, span: usize) {
        self.chosen_spans.insert(id, span);
    }

    /// Lay a section out for rendering.
    ///
    /// Packs from scratch when the section has no grid, otherwise
    /// reconciles the existing grid against the visible set; either way a
    /// normalization pass produces the final rows and empty tiles.
    pub fn reflow(&mut self, section: &SectionId, visible: &[WidgetDef]) -> SectionView {
        let items: Vec<LayoutItem> = visible
            .iter()
            .map(|def| LayoutItem {
                id: def.id.clone(),
                span: self.resolved_span(def),
            })
            .collect();

        let grid = match self.sections.entry(section.clone()) {
            Entry::Occupied(entry) => {
                let grid = entry.into_mut();
                reconcile(grid, &items);
                grid
            }
            Entry::Vacant(entry) => entry.insert(pack(&items)),
        };
        let empty_tiles = normalize(grid);

        let mut placements: Vec<(WidgetId, Placement)> = grid
            .placements()
            .map(|(id, p)| (id.clone(), p))
            .collect();
        placements.sort_by_key(|&(_, p)| (p.row, p.col));

        debug!(
            section = %section,
            widgets = placements.len(),
            rows = grid.row_count(),
            "reflow"
        );
        SectionView {
            placements,
            row_count: grid.row_count(),
            empty_tiles,
        }
    }

    /// Set a widget's span directly, recording it on success.
    ///
    /// Returns whether the change was applied; the caller re-renders (via
    /// [`reflow`](Self::reflow)) only on `true`.
    pub fn set_widget_span(
        &mut self,
        section: &SectionId,
        def: &WidgetDef,
        target: usize,
    ) -> bool {
        let Self {
            rules,
            sections,
            chosen_spans,
        } = self;
        let Some(grid) = sections.get_mut(section) else {
            return false;
        };
        let applied = set_span(grid, &def.id, target, rules.allowed(def.size));
        if applied {
            chosen_spans.insert(def.id.clone(), target);
            debug!(section = %section, widget = %def.id, span = target, "span set");
        }
        applied
    }

    /// Step a widget's span, recording the result on success.
    pub fn adjust_widget_span(
        &mut self,
        section: &SectionId,
        def: &WidgetDef,
        step: SpanStep,
    ) -> Option<usize> {
        let Self {
            rules,
            sections,
            chosen_spans,
        } = self;
        let grid = sections.get_mut(section)?;
        let span = adjust_span(grid, &def.id, step, rules.allowed(def.size))?;
        chosen_spans.insert(def.id.clone(), span);
        debug!(section = %section, widget = %def.id, span, "span stepped");
        Some(span)
    }

    /// Commit an active gesture against a section's grid, record a resize's
    /// chosen span, and normalize.
    pub fn finish_gesture(
        &mut self,
        section: &SectionId,
        gesture: &mut Gesture,
    ) -> Option<GestureEnd> {
        let grid = self.sections.get_mut(section)?;
        let end = gesture.end(grid)?;
        normalize(grid);
        if let GestureEnd::Resize {
            widget,
            span,
            applied: true,
        } = &end
        {
            self.chosen_spans.insert(widget.clone(), *span);
        }
        Some(end)
    }

    /// Drop a section's cached layout; the next reflow packs from scratch.
    pub fn discard_section(&mut self, section: &SectionId) -> bool {
        let dropped = self.sections.remove(section).is_some();
        if dropped {
            debug!(section = %section, "layout discarded");
        }
        dropped
    }

    /// Drop every cached layout and all chosen spans (view-state reset).
    pub fn clear(&mut self) {
        self.sections.clear();
        self.chosen_spans.clear();
        debug!("layout store cleared");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
