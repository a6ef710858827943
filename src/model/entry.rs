//! Outline entries and normalized lines.

use serde::{Deserialize, Serialize};

/// One normalized line of document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Position in the line stream the line came from
    pub index: usize,
    /// Normalized text
    pub text: String,
}

impl Line {
    /// Create a new line.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Check if the line holds no text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A single reconstructed table of contents entry.
///
/// `level` is 0 until the hierarchy builder assigns it; emitted entries
/// always have `level >= 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading text, trimmed and non-empty
    pub heading: String,

    /// Page the heading points to, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,

    /// Nesting level, 1 = top
    pub level: u8,
}

impl OutlineEntry {
    /// Create an entry with an unassigned level.
    pub fn new(heading: impl Into<String>, page_number: Option<u32>) -> Self {
        Self {
            heading: heading.into().trim().to_string(),
            page_number,
            level: 0,
        }
    }

    /// Set the nesting level.
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    /// Whether the heading carries digits and no letters (index residue).
    pub fn is_numeric_only(&self) -> bool {
        self.heading.chars().any(|c| c.is_ascii_digit())
            && !self.heading.chars().any(|c| c.is_alphabetic())
    }
}
