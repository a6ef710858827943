//! Quality gate shared by every strategy.

use crate::error::RejectReason;
use crate::model::OutlineEntry;
use crate::parser::OutlineConfig;

/// Accept/reject predicate applied to every candidate outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityGate {
    /// Outlines with this many entries or fewer are rejected
    pub min_entries: usize,
    /// Runs of numeric-only headings this long are rejected
    pub max_numeric_run: usize,
}

impl QualityGate {
    /// Gate with the thresholds of a configuration.
    pub fn from_config(config: &OutlineConfig) -> Self {
        Self {
            min_entries: config.min_outline_lines,
            max_numeric_run: config.max_numeric_run,
        }
    }

    /// Check a candidate outline.
    pub fn check(&self, entries: &[OutlineEntry]) -> Result<(), RejectReason> {
        if entries.len() <= self.min_entries {
            return Err(RejectReason::TooShort {
                entries: entries.len(),
                floor: self.min_entries,
            });
        }

        let run = longest_numeric_run(entries);
        if run >= self.max_numeric_run {
            return Err(RejectReason::NumericRun { run });
        }

        Ok(())
    }
}

impl Default for QualityGate {
    fn default() -> Self {
        Self::from_config(&OutlineConfig::default())
    }
}

/// Longest run of consecutive headings holding digits and no letters.
pub fn longest_numeric_run(entries: &[OutlineEntry]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for entry in entries {
        if entry.is_numeric_only() {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
