//! Outline extraction configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunable thresholds for outline reconstruction.
///
/// Every invocation owns its own copy; nothing here is shared between
/// documents. Missing fields take their defaults when loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Lines searched for the section title
    pub max_scan_lines: usize,

    /// Lines taken after the section title
    pub max_outline_lines: usize,

    /// Consecutive non-chapter-marker lines that end the outline
    pub chapter_marker_run_limit: usize,

    /// The chapter-marker rule applies only to outlines with more surviving
    /// lines than this
    pub chapter_rule_min_lines: usize,

    /// Consecutive lines without a trailing page number that end the outline
    pub page_number_run_limit: usize,

    /// Page-numbered lines seen before the page-number rule applies
    pub min_page_numbered_lines: usize,

    /// Dot-leader lines forming a cluster whose interleaved lines are noise
    pub dot_leader_run_limit: usize,

    /// Minimum length of an unclassified run treated as a block
    pub prose_block_min_run: usize,

    /// Average words per line above which a block is prose
    pub prose_high_word_average: f64,

    /// Average words per line below which a long block is noise
    pub prose_low_word_average: f64,

    /// Block length at which the low word average applies
    pub prose_long_run: usize,

    /// Outlines with this many entries or fewer are rejected
    pub min_outline_lines: usize,

    /// Consecutive numeric-only headings that reject an outline
    pub max_numeric_run: usize,

    /// Consecutive unrecognized surviving lines that abort classification
    pub max_non_match_lines: usize,

    /// Rejected heuristic outlines with this many entries or fewer are
    /// re-extracted without the noise filter; 0 disables the retry
    pub clean_retry_max_lines: usize,

    /// Keep entries in document order instead of sorting by page
    pub preserve_document_order: bool,

    /// Shift embedded outline pages to printed page numbers
    pub adjust_page_offset: bool,

    /// Drop embedded outline entries whose adjusted page is below 1
    pub drop_negative_pages: bool,
}

impl OutlineConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many lines are searched for the section title.
    pub fn with_max_scan_lines(mut self, lines: usize) -> Self {
        self.max_scan_lines = lines;
        self
    }

    /// Set how many lines after the title are classified.
    pub fn with_max_outline_lines(mut self, lines: usize) -> Self {
        self.max_outline_lines = lines;
        self
    }

    /// Set the quality gate floor.
    pub fn with_min_outline_lines(mut self, entries: usize) -> Self {
        self.min_outline_lines = entries;
        self
    }

    /// Set the numeric-run rejection threshold.
    pub fn with_max_numeric_run(mut self, run: usize) -> Self {
        self.max_numeric_run = run;
        self
    }

    /// Set the entry count at or below which a rejected outline is
    /// re-extracted without the noise filter.
    pub fn with_clean_retry(mut self, max_lines: usize) -> Self {
        self.clean_retry_max_lines = max_lines;
        self
    }

    /// Keep document order instead of sorting by page then heading.
    pub fn preserve_order(mut self) -> Self {
        self.preserve_document_order = true;
        self
    }

    /// Enable or disable embedded outline page offset adjustment.
    pub fn with_page_offset(mut self, adjust: bool) -> Self {
        self.adjust_page_offset = adjust;
        self
    }

    /// Load a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("max_scan_lines", self.max_scan_lines),
            ("max_outline_lines", self.max_outline_lines),
            ("chapter_marker_run_limit", self.chapter_marker_run_limit),
            ("page_number_run_limit", self.page_number_run_limit),
            ("dot_leader_run_limit", self.dot_leader_run_limit),
            ("prose_block_min_run", self.prose_block_min_run),
            ("max_numeric_run", self.max_numeric_run),
            ("max_non_match_lines", self.max_non_match_lines),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("{} must be at least 1", name)));
            }
        }

        for (name, value) in [
            ("prose_high_word_average", self.prose_high_word_average),
            ("prose_low_word_average", self.prose_low_word_average),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} must be a non-negative number",
                    name
                )));
            }
        }

        Ok(())
    }
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            max_scan_lines: 700,
            max_outline_lines: 700,
            chapter_marker_run_limit: 15,
            chapter_rule_min_lines: 350,
            page_number_run_limit: 5,
            min_page_numbered_lines: 10,
            dot_leader_run_limit: 5,
            prose_block_min_run: 5,
            prose_high_word_average: 6.8,
            prose_low_word_average: 6.8,
            prose_long_run: 50,
            min_outline_lines: 25,
            max_numeric_run: 50,
            max_non_match_lines: 5,
            clean_retry_max_lines: 20,
            preserve_document_order: false,
            adjust_page_offset: true,
            drop_negative_pages: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_config_builder() {
        let config = OutlineConfig::new()
            .with_max_scan_lines(100)
            .with_min_outline_lines(3)
            .preserve_order()
            .with_page_offset(false);

        assert_eq!(config.max_scan_lines, 100);
        assert_eq!(config.min_outline_lines, 3);
        assert!(config.preserve_document_order);
        assert!(!config.adjust_page_offset);
    }

    #[test]
    fn test_default_config() {
        let config = OutlineConfig::default();
        assert_eq!(config.max_scan_lines, 700);
        assert_eq!(config.chapter_marker_run_limit, 15);
        assert_eq!(config.min_outline_lines, 25);
        assert_eq!(config.clean_retry_max_lines, 20);
        assert!(!config.preserve_document_order);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = OutlineConfig::from_json(r#"{"min_outline_lines": 4}"#).unwrap();
        assert_eq!(config.min_outline_lines, 4);
        assert_eq!(config.max_outline_lines, 700);
    }

    #[test]
    fn test_invalid_config() {
        let err = OutlineConfig::from_json(r#"{"max_scan_lines": 0}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let config = OutlineConfig {
            prose_high_word_average: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        assert!(OutlineConfig::from_json("not json").is_err());
    }
}
