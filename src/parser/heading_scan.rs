//! Heading marker scan over full document text.

use lazy_static::lazy_static;
use regex::Regex;

use super::dedup::dedup_and_order;
use super::hierarchy::{assign_levels, Candidate};
use super::normalize::normalize_line;
use crate::error::{Error, Result};
use crate::model::{NumberingToken, OutlineEntry};

lazy_static! {
    static ref RE_HEADING_MARKER: Regex =
        Regex::new(r"(?i)^(chapter\s+\d+|section\s+\d+|appendix\s+[a-z]\b|[ivxlc]+\.\s+)").unwrap();
}

/// Whether a normalized line opens with a heading marker.
pub fn is_heading_marker(text: &str) -> bool {
    RE_HEADING_MARKER.is_match(text)
}

/// Collect marker lines from every page, with the 1-based page index as
/// page number.
///
/// Returns [`Error::NoHeadings`] when no page has a marker line.
pub fn scan_headings<S: AsRef<str>>(pages: &[S], preserve_order: bool) -> Result<Vec<OutlineEntry>> {
    let mut candidates = Vec::new();

    for (index, page) in pages.iter().enumerate() {
        let page_number = u32::try_from(index + 1).ok();
        for raw in page.as_ref().lines() {
            let text = normalize_line(raw);
            if !is_heading_marker(&text) {
                continue;
            }
            let numbering = NumberingToken::from_heading(&text);
            candidates.push(Candidate::new(OutlineEntry::new(text, page_number), numbering));
        }
    }

    if candidates.is_empty() {
        return Err(Error::NoHeadings);
    }
    log::debug!("heading scan found {} marker lines", candidates.len());

    Ok(dedup_and_order(assign_levels(candidates), preserve_order))
}
