//! Heuristic table of contents parser.

use crate::error::{Error, Result};
use crate::model::{split_pages, Line, NumberingToken, OutlineEntry, SourceDocument};

use super::classifier::{classify_lines, LineKind};
use super::dedup::dedup_and_order;
use super::hierarchy::{assign_levels, Candidate};
use super::locator::{locate_section, SectionStart};
use super::noise_filter::{filter_noise, FilterStats, FilteredLine};
use super::normalize::normalize_lines;
use super::options::OutlineConfig;
use super::recovery::outline_extent;

/// Result of a successful heuristic parse.
#[derive(Debug, Clone)]
pub struct ParsedOutline {
    /// Leveled, deduplicated entries
    pub entries: Vec<OutlineEntry>,
    /// Where the section title was found
    pub section: SectionStart,
    /// Noise filter statistics
    pub stats: FilterStats,
    /// Whether assembly stopped on the non-match limit
    pub aborted: bool,
    /// Whether the outline came from the filter-free re-extraction
    pub recovered: bool,
}

/// Reconstructs an outline from the printed table of contents in the text.
pub struct TocParser {
    config: OutlineConfig,
}

impl TocParser {
    /// Create a parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(OutlineConfig::default())
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: OutlineConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// Parse a document's pages.
    pub fn parse_document(&self, doc: &SourceDocument) -> Result<ParsedOutline> {
        self.parse(&doc.lines())
    }

    /// Parse a text blob with form-feed page breaks.
    pub fn parse_text(&self, text: &str) -> Result<ParsedOutline> {
        let pages = split_pages(text);
        let lines: Vec<&str> = pages.iter().flat_map(|page| page.lines()).collect();
        self.parse(&lines)
    }

    /// Parse raw lines.
    ///
    /// Fails with [`Error::SectionNotFound`] when no title phrase is found
    /// and [`Error::ClassificationExhausted`] when nothing after it is
    /// recognized.
    pub fn parse<S: AsRef<str>>(&self, raw: &[S]) -> Result<ParsedOutline> {
        let lines = normalize_lines(raw);
        let (section, window) = self.outline_window(&lines)?;

        let scanned = classify_lines(window);
        let outcome = filter_noise(scanned, &self.config);
        let (candidates, aborted) = assemble(&outcome.lines, self.config.max_non_match_lines);

        if candidates.is_empty() {
            return Err(Error::ClassificationExhausted {
                scanned: window.len(),
            });
        }

        let leveled = assign_levels(candidates);
        let entries = dedup_and_order(leveled, self.config.preserve_document_order);

        Ok(ParsedOutline {
            entries,
            section,
            stats: outcome.stats,
            aborted,
            recovered: false,
        })
    }

    /// Re-extract a document's outline without the noise filter.
    pub fn parse_document_clean(&self, doc: &SourceDocument) -> Result<ParsedOutline> {
        self.parse_clean(&doc.lines())
    }

    /// Re-extract raw lines without the noise filter.
    ///
    /// Every line after the title is kept until running prose begins (see
    /// [`outline_extent`]); only blank and residue lines are dropped.
    pub fn parse_clean<S: AsRef<str>>(&self, raw: &[S]) -> Result<ParsedOutline> {
        let lines = normalize_lines(raw);
        let (section, window) = self.outline_window(&lines)?;
        let window = &window[..outline_extent(window)];

        let scanned = classify_lines(window);
        let mut stats = FilterStats {
            input_lines: scanned.len(),
            ..Default::default()
        };
        let kept: Vec<FilteredLine> = scanned
            .into_iter()
            .filter(|s| !matches!(s.kind, LineKind::Skip))
            .map(|scanned| FilteredLine {
                scanned,
                prose_block: false,
            })
            .collect();
        stats.skipped = stats.input_lines - kept.len();
        stats.kept = kept.len();

        let (candidates, _) = assemble(&kept, usize::MAX);
        if candidates.is_empty() {
            return Err(Error::ClassificationExhausted {
                scanned: window.len(),
            });
        }
        log::debug!(
            "clean re-extraction kept {} of {} lines",
            candidates.len(),
            window.len()
        );

        let leveled = assign_levels(candidates);
        let entries = dedup_and_order(leveled, self.config.preserve_document_order);

        Ok(ParsedOutline {
            entries,
            section,
            stats,
            aborted: false,
            recovered: true,
        })
    }

    /// Locate the title and take the lines after it.
    fn outline_window<'a>(&self, lines: &'a [Line]) -> Result<(SectionStart, &'a [Line])> {
        let section = locate_section(lines, self.config.max_scan_lines).ok_or(
            Error::SectionNotFound {
                scanned: lines.len().min(self.config.max_scan_lines),
            },
        )?;
        log::debug!(
            "outline title '{}' at line {}",
            section.phrase,
            section.line_index
        );

        let start = section.body_start().min(lines.len());
        let end = start
            .saturating_add(self.config.max_outline_lines)
            .min(lines.len());
        Ok((section, &lines[start..end]))
    }
}

impl Default for TocParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn surviving lines into candidates.
///
/// Unclassified lines become heading-only entries. Pages carry forward from
/// the last explicit page. A run of `max_non_match` unclassified lines
/// outside any kept block is dropped and ends assembly.
fn assemble(lines: &[FilteredLine], max_non_match: usize) -> (Vec<Candidate>, bool) {
    let mut candidates = Vec::with_capacity(lines.len());
    let mut last_page: Option<u32> = None;
    let mut non_match = 0;

    for line in lines {
        let scanned = &line.scanned;
        let (heading, page, numbering) = match &scanned.kind {
            LineKind::Entry(classified) => (
                classified.heading.clone(),
                classified.page,
                classified.numbering.clone(),
            ),
            LineKind::Unclassified => {
                let text = scanned.line.text.clone();
                let numbering = NumberingToken::from_heading(&text);
                (text, None, numbering)
            }
            LineKind::Skip => continue,
        };

        if scanned.is_unclassified() && !line.prose_block && !scanned.keyword {
            non_match += 1;
        } else {
            non_match = 0;
        }

        if page.is_some() {
            last_page = page;
        }
        candidates.push(Candidate::new(
            OutlineEntry::new(heading, page.or(last_page)),
            numbering,
        ));

        if non_match >= max_non_match {
            log::debug!(
                "{} consecutive unrecognized lines before line {}, stopping",
                non_match,
                scanned.line.index
            );
            candidates.truncate(candidates.len() - non_match);
            return (candidates, true);
        }
    }

    (candidates, false)
}
