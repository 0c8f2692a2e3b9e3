#![forbid(unsafe_code)]

//! Span policy: which widths a widget may take, and which one it starts at.
//!
//! Allowed span sets and base-span defaults are product configuration, not
//! algorithm constants, so they arrive here as an externally supplied
//! [`SpanRules`] value. The engine only ever consults the policy through
//! this type.
//!
//! # Invariants
//!
//! 1. Every allowed span set is non-empty, strictly ascending, and within
//!    `1..=GRID_COLUMNS` (enforced at construction).
//! 2. [`SpanRules::resolve`] always returns a member of the widget's allowed
//!    set: a stored span outside the set falls back to the minimum allowed.
//! 3. Stepping ([`step_up`](SpanRules::step_up) /
//!    [`step_down`](SpanRules::step_down)) never leaves the allowed set and
//!    returns `None` at either end, or when the current span is not a
//!    member.
//!
//! # Failure Modes
//!
//! Only construction can fail ([`SpanRulesError`]); a malformed policy is a
//! programming error, not a user gesture.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::widget::{SizeClass, WidgetDef, WidthHint};

/// Number of columns in a grid row.
pub const GRID_COLUMNS: usize = 12;

/// Allowed span sets per size class plus the unhinted base span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanRules {
    small: Vec<usize>,
    large: Vec<usize>,
    default_span: usize,
}

impl SpanRules {
    /// Build a span policy, validating both allowed sets.
    pub fn new(
        small: Vec<usize>,
        large: Vec<usize>,
        default_span: usize,
    ) -> Result<Self, SpanRulesError> {
        validate_set(SizeClass::Small, &small)?;
        validate_set(SizeClass::Large, &large)?;
        if default_span == 0 || default_span > GRID_COLUMNS {
            return Err(SpanRulesError::DefaultSpanOutOfRange { span: default_span });
        }
        Ok(Self {
            small,
            large,
            default_span,
        })
    }

    /// The allowed span set for a size class, ascending.
    #[must_use]
    pub fn allowed(&self, size: SizeClass) -> &[usize] {
        match size {
            SizeClass::Small => &self.small,
            SizeClass::Large => &self.large,
        }
    }

    /// Smallest allowed span for a size class.
    #[must_use]
    pub fn min_allowed(&self, size: SizeClass) -> usize {
        self.allowed(size)[0]
    }

    /// Largest allowed span for a size class.
    #[must_use]
    pub fn max_allowed(&self, size: SizeClass) -> usize {
        *self.allowed(size).last().expect("allowed sets are non-empty")
    }

    /// Base span from the widget's width hint, before clamping to the
    /// allowed set.
    #[must_use]
    pub fn base_span(&self, def: &WidgetDef) -> usize {
        match def.width {
            WidthHint::Full => GRID_COLUMNS,
            WidthHint::Half => GRID_COLUMNS / 2,
            WidthHint::Default => self.default_span,
        }
    }

    /// Resolve a widget's current span: the chosen span if one is recorded,
    /// else the base span; either way a value outside the allowed set
    /// resets to the minimum allowed.
    #[must_use]
    pub fn resolve(&self, def: &WidgetDef, chosen: Option<usize>) -> usize {
        let span = chosen.unwrap_or_else(|| self.base_span(def));
        let allowed = self.allowed(def.size);
        if allowed.contains(&span) {
            span
        } else {
            allowed[0]
        }
    }

    /// Next larger allowed span, or `None` at the maximum (or if `current`
    /// is not a member of the set).
    #[must_use]
    pub fn step_up(&self, size: SizeClass, current: usize) -> Option<usize> {
        let allowed = self.allowed(size);
        let idx = allowed.iter().position(|&s| s == current)?;
        allowed.get(idx + 1).copied()
    }

    /// Next smaller allowed span, or `None` at the minimum (or if `current`
    /// is not a member of the set).
    #[must_use]
    pub fn step_down(&self, size: SizeClass, current: usize) -> Option<usize> {
        let allowed = self.allowed(size);
        let idx = allowed.iter().position(|&s| s == current)?;
        idx.checked_sub(1).map(|i| allowed[i])
    }
}

impl Default for SpanRules {
    /// Product defaults: small widgets take 25%/33%/50% of the grid, large
    /// widgets 50%/66.7%/75%/100%; unhinted widgets start at span 3.
    fn default() -> Self {
        Self {
            small: vec![3, 4, 6],
            large: vec![6, 8, 9, 12],
            default_span: 3,
        }
    }
}

fn validate_set(size: SizeClass, spans: &[usize]) -> Result<(), SpanRulesError> {
    if spans.is_empty() {
        return Err(SpanRulesError::EmptySpanSet { size });
    }
    for &span in spans {
        if span == 0 || span > GRID_COLUMNS {
            return Err(SpanRulesError::SpanOutOfRange { size, span });
        }
    }
    if spans.windows(2).any(|w| w[0] >= w[1]) {
        return Err(SpanRulesError::UnsortedSpanSet { size });
    }
    Ok(())
}

/// Validation failures for span policy construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanRulesError {
    EmptySpanSet { size: SizeClass },
    SpanOutOfRange { size: SizeClass, span: usize },
    UnsortedSpanSet { size: SizeClass },
    DefaultSpanOutOfRange { span: usize },
}

impl fmt::Display for SpanRulesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySpanSet { size } => {
                write!(f, "allowed span set for {size} widgets is empty")
            }
            Self::SpanOutOfRange { size, span } => {
                write!(
                    f,
                    "span {span} for {size} widgets is outside 1..={GRID_COLUMNS}"
                )
            }
            Self::UnsortedSpanSet { size } => {
                write!(
                    f,
                    "allowed span set for {size} widgets must be strictly ascending"
                )
            }
            Self::DefaultSpanOutOfRange { span } => {
                write!(f, "default span {span} is outside 1..={GRID_COLUMNS}")
            }
        }
    }
}

impl std::error::Error for SpanRulesError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
