use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The severity tier a procedure belongs to.
///
/// Categories determine grouping and visual treatment. The set is closed: a
/// procedure's category is fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Routine operations.
    Normal,
    /// Abnormal but recoverable situations.
    Contingency,
    /// Situations requiring immediate action to protect people or property.
    Emergency,
    /// Emergency response plan: actions on the ground after an occurrence.
    Erp,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 4] = [Self::Normal, Self::Contingency, Self::Emergency, Self::Erp];

    /// The visual configuration for this category.
    #[must_use]
    pub const fn style(self) -> CategoryStyle {
        match self {
            Self::Normal => CategoryStyle {
                label: "Normal Procedures",
                short_label: "Normal",
                tone: Tone::Info,
                icon: Icon::Checklist,
                severity: 0,
            },
            Self::Contingency => CategoryStyle {
                label: "Contingency Procedures",
                short_label: "Contingency",
                tone: Tone::Caution,
                icon: Icon::Warning,
                severity: 1,
            },
            Self::Emergency => CategoryStyle {
                label: "Emergency Procedures",
                short_label: "Emergency",
                tone: Tone::Danger,
                icon: Icon::Alert,
                severity: 2,
            },
            Self::Erp => CategoryStyle {
                label: "Emergency Response Plan",
                short_label: "ERP",
                tone: Tone::Critical,
                icon: Icon::Siren,
                severity: 3,
            },
        }
    }

    /// The identifier used in configuration files and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Contingency => "contingency",
            Self::Emergency => "emergency",
            Self::Erp => "erp",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCategoryError(s.to_string()))
    }
}

/// Error returned when parsing a category name fails.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown category '{0}': expected one of normal, contingency, emergency, erp")]
pub struct UnknownCategoryError(String);

/// Visual configuration for a [`Category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    /// Section heading.
    pub label: &'static str,
    /// Badge text.
    pub short_label: &'static str,
    /// Colour family.
    pub tone: Tone,
    /// Header icon.
    pub icon: Icon,
    /// Relative severity, `0` being routine.
    pub severity: u8,
}

/// Colour family used to render a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Blue.
    Info,
    /// Amber.
    Caution,
    /// Red.
    Danger,
    /// Purple.
    Critical,
}

/// Icon shown next to a category header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    /// A checklist.
    Checklist,
    /// A warning triangle.
    Warning,
    /// An alert octagon.
    Alert,
    /// A siren.
    Siren,
}

impl Icon {
    /// A terminal-friendly glyph for the icon.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Checklist => "☑",
            Self::Warning => "⚠",
            Self::Alert => "⛔",
            Self::Siren => "🚨",
        }
    }
}
