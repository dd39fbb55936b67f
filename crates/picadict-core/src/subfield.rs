//! Subfield definitions.
//!
//! A subfield is the smallest schema unit: a single-character code with
//! a label, a repeatability, and optional rendering hints for the
//! compact notation. Definitions are immutable once built and shared as
//! `Arc<SubfieldDef>` between every field that declares them.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a field or subfield may occur more than once in a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Repeatability {
    /// May occur any number of times.
    Repeatable,
    /// Occurs at most once.
    NonRepeatable,
    /// Not recorded in the source catalog.
    #[default]
    Unknown,
}

impl fmt::Display for Repeatability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repeatability::Repeatable => write!(f, "repeatable"),
            Repeatability::NonRepeatable => write!(f, "non-repeatable"),
            Repeatability::Unknown => write!(f, "repeatability unknown"),
        }
    }
}

/// Schema metadata for one subfield of a catalog field.
///
/// Identity is the code alone: two definitions with the same code
/// compare equal even when their labels differ, so collections of
/// subfields behave like code-keyed sets.
#[derive(Debug, Clone)]
pub struct SubfieldDef {
    code: char,
    label: String,
    repeat: Repeatability,
    prefix: Option<String>,
    suffix: Option<String>,
    nested: bool,
}

impl SubfieldDef {
    /// Create a subfield definition. `code` and `label` must be
    /// non-blank; everything is fixed for the lifetime of the value.
    pub fn new(code: char, label: impl Into<String>, repeat: Repeatability) -> Self {
        let label = label.into();
        debug_assert!(!code.is_whitespace() && code != '\0', "blank subfield code");
        debug_assert!(!label.trim().is_empty(), "blank subfield label");
        Self {
            code,
            label,
            repeat,
            prefix: None,
            suffix: None,
            nested: false,
        }
    }

    /// Set the text inserted before the value in the compact rendering.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the text appended after the value in the compact rendering.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Mark the value as carrying its own nested sub-code, as in the
    /// generic escape subfields of the expanded notation.
    pub fn with_nested(mut self) -> Self {
        self.nested = true;
        self
    }

    /// The single-character subfield code.
    pub fn code(&self) -> char {
        self.code
    }

    /// Human-readable label from the source catalog.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Repeatability of the subfield within one field instance.
    pub fn repeat(&self) -> Repeatability {
        self.repeat
    }

    /// Text inserted before the value in the compact rendering.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Text appended after the value in the compact rendering.
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// Whether the value carries its own nested sub-code.
    pub fn is_nested(&self) -> bool {
        self.nested
    }
}

impl PartialEq for SubfieldDef {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for SubfieldDef {}

impl PartialOrd for SubfieldDef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SubfieldDef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code.cmp(&other.code)
    }
}

impl fmt::Display for SubfieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${} {} ({})", self.code, self.label, self.repeat)
    }
}
