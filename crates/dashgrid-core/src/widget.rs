#![forbid(unsafe_code)]

//! Widget identity and sizing contract.
//!
//! Widgets are external entities: the engine consumes their stable id, size
//! class, and width hint, and never owns their content. [`WidgetDef`] is the
//! slice of a widget definition the layout core needs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for a widget within a section.
///
/// Ids are opaque strings supplied by the widget-definition collaborator.
/// Uniqueness per section is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    /// Create a widget id from a raw string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for WidgetId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Size class of a widget, which selects its allowed span set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Small,
    Large,
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Small => f.write_str("small"),
            Self::Large => f.write_str("large"),
        }
    }
}

/// Layout width hint from the widget definition.
///
/// Determines the base span before any user-chosen span applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthHint {
    /// No hint; the span policy's default applies.
    #[default]
    Default,
    /// Half the grid width.
    Half,
    /// The full grid width.
    Full,
}

/// The layout-relevant slice of a widget definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetDef {
    pub id: WidgetId,
    pub size: SizeClass,
    #[serde(default)]
    pub width: WidthHint,
}

impl WidgetDef {
    /// Create a small widget with no width hint.
    #[must_use]
    pub fn small(id: impl Into<WidgetId>) -> Self {
        Self {
            id: id.into(),
            size: SizeClass::Small,
            width: WidthHint::Default,
        }
    }

    /// Create a large widget with no width hint.
    #[must_use]
    pub fn large(id: impl Into<WidgetId>) -> Self {
        Self {
            id: id.into(),
            size: SizeClass::Large,
            width: WidthHint::Default,
        }
    }

    /// Set the width hint (builder pattern).
    #[must_use]
    pub fn with_width(mut self, width: WidthHint) -> Self {
        self.width = width;
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trips_through_str() {
        let id = WidgetId::new("kpi-frt");
        assert_eq!(id.as_str(), "kpi-frt");
        assert_eq!(format!("{id}"), "kpi-frt");
    }

    #[test]
    fn id_ordering_is_lexicographic() {
        let a = WidgetId::new("alpha");
        let b = WidgetId::new("beta");
        assert!(a < b);
    }

    #[test]
    fn serde_id_is_transparent() {
        let id = WidgetId::new("chart-volume");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"chart-volume\"");
        let back: WidgetId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn builder_sets_width_hint() {
        let def = WidgetDef::large("table-agents").with_width(WidthHint::Full);
        assert_eq!(def.size, SizeClass::Large);
        assert_eq!(def.width, WidthHint::Full);
    }

    #[test]
    fn width_hint_defaults_when_absent() {
        let def: WidgetDef =
            serde_json::from_str(r#"{"id":"w1","size":"small"}"#).unwrap();
        assert_eq!(def.width, WidthHint::Default);
    }
}
