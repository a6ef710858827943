//! # untoc
//!
//! Table of contents reconstruction from extracted document text.
//!
//! Text layers and OCR flatten a printed table of contents into noisy
//! lines. This library locates that section, classifies its lines, filters
//! out prose and index residue, and rebuilds a leveled outline. When the
//! printed contents are missing or unusable it falls back to a heading
//! scan; bookmarks embedded in the source are preferred over both.
//!
//! ## Quick Start
//!
//! ```no_run
//! use untoc::{extract_file, render};
//!
//! fn main() -> untoc::Result<()> {
//!     let entries = extract_file("book.txt")?;
//!
//!     let options = render::RenderOptions::default();
//!     print!("{}", render::to_text(&entries, &options));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Fallback ladder**: embedded outline, printed contents, heading scan
//! - **Quality gate**: one acceptance rule for every strategy
//! - **Hierarchy**: levels derived from numbering (roman, decimal, chapter)
//! - **Batch processing**: documents in parallel with Rayon

pub mod batch;
pub mod detect;
pub mod error;
pub mod ladder;
pub mod model;
pub mod parser;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use batch::{extract_batch, BatchOptions, BatchReport, DocumentResult};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_supported, SourceFormat};
pub use error::{Error, RejectReason, Result};
pub use ladder::{Attempt, AttemptResult, FallbackLadder, LadderOutcome, LadderState, Strategy};
pub use model::{Outline, OutlineEntry, OutlineItem, SourceDocument};
pub use parser::{OutlineConfig, ParsedOutline, TocParser};
pub use render::{JsonFormat, Leader, RenderOptions};
pub use source::{FileSource, MemorySource, TextSource};

use std::path::Path;

use serde::Serialize;

/// Extract the outline of a text or JSON source file.
///
/// # Example
///
/// ```no_run
/// use untoc::extract_file;
///
/// let entries = extract_file("book.txt").unwrap();
/// println!("Entries: {}", entries.len());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Vec<OutlineEntry>> {
    FallbackLadder::new()
        .run(&FileSource::new(path))?
        .into_result()
}

/// Extract the outline of text with form-feed page breaks.
pub fn extract_text(text: &str) -> Result<Vec<OutlineEntry>> {
    FallbackLadder::new()
        .run(&MemorySource::from_text("text", text))?
        .into_result()
}

/// Extract a file's outline and render it as an outline file.
///
/// # Example
///
/// ```no_run
/// use untoc::to_outline_text;
///
/// let toc = to_outline_text("book.txt").unwrap();
/// std::fs::write("book_toc.txt", toc).unwrap();
/// ```
pub fn to_outline_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let entries = extract_file(path)?;
    Ok(render::to_text(&entries, &RenderOptions::default()))
}

/// Extract a file's outline and render it as JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let entries = extract_file(path)?;
    render::to_json(&entries, format)
}

/// Builder for extracting outlines.
///
/// # Example
///
/// ```no_run
/// use untoc::{OutlineConfig, Untoc};
///
/// let text = Untoc::new()
///     .with_config(OutlineConfig::new().with_min_outline_lines(10))
///     .keep_rejected(true)
///     .extract("book.txt")?
///     .to_text();
/// # Ok::<(), untoc::Error>(())
/// ```
pub struct Untoc {
    config: OutlineConfig,
    render_options: RenderOptions,
    keep_rejected: bool,
}

impl Untoc {
    /// Create a new Untoc builder.
    pub fn new() -> Self {
        Self {
            config: OutlineConfig::default(),
            render_options: RenderOptions::default(),
            keep_rejected: false,
        }
    }

    /// Set the outline configuration.
    pub fn with_config(mut self, config: OutlineConfig) -> Self {
        self.config = config;
        self
    }

    /// Keep the document order of same-page entries.
    pub fn preserve_order(mut self) -> Self {
        self.config = self.config.preserve_order();
        self
    }

    /// Fall back to the largest rejected candidate when no strategy passes
    /// the quality gate.
    pub fn keep_rejected(mut self, keep: bool) -> Self {
        self.keep_rejected = keep;
        self
    }

    /// Set the leader used by text rendering.
    pub fn with_leader(mut self, leader: Leader) -> Self {
        self.render_options = self.render_options.with_leader(leader);
        self
    }

    /// Extract the outline of a file.
    pub fn extract<P: AsRef<Path>>(self, path: P) -> Result<UntocResult> {
        self.extract_source(&FileSource::new(path))
    }

    /// Extract the outline of any text source.
    pub fn extract_source(self, source: &dyn TextSource) -> Result<UntocResult> {
        self.config.validate()?;
        let outcome = FallbackLadder::with_config(self.config).run(source)?;

        if let Some(strategy) = outcome.strategy() {
            return Ok(UntocResult {
                name: outcome.name,
                strategy: Some(strategy),
                salvaged: false,
                entries: outcome.entries,
                attempts: outcome.attempts,
                render_options: self.render_options,
            });
        }

        if self.keep_rejected {
            if let Some((strategy, entries)) = outcome.best_rejected() {
                log::warn!(
                    "{}: keeping {} rejected entries from {}",
                    outcome.name,
                    entries.len(),
                    strategy
                );
                let entries = entries.to_vec();
                return Ok(UntocResult {
                    name: outcome.name,
                    strategy: Some(strategy),
                    salvaged: true,
                    entries,
                    attempts: outcome.attempts,
                    render_options: self.render_options,
                });
            }
        }

        Err(outcome
            .failure()
            .unwrap_or_else(|| Error::NoOutline(outcome.name.clone())))
    }
}

impl Default for Untoc {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of extracting one document's outline.
#[derive(Debug, Clone, Serialize)]
pub struct UntocResult {
    /// Document name
    pub name: String,
    /// Strategy the entries came from
    pub strategy: Option<Strategy>,
    /// Entries were kept despite failing the quality gate
    pub salvaged: bool,
    /// The outline
    pub entries: Vec<OutlineEntry>,
    /// Every strategy run, in order
    #[serde(skip)]
    pub attempts: Vec<Attempt>,
    #[serde(skip)]
    render_options: RenderOptions,
}

impl UntocResult {
    /// Render as an outline file.
    pub fn to_text(&self) -> String {
        render::to_text(&self.entries, &self.render_options)
    }

    /// Render as JSON, including name and strategy.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(self, format)
    }

    /// Get the outline entries.
    pub fn entries(&self) -> &[OutlineEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents_text(entries: usize) -> String {
        let mut text = String::from("Table of Contents\n");
        for i in 1..=entries {
            text.push_str(&format!("{} Topic number {} ...... {}\n", i, i, i * 3));
        }
        text
    }

    #[test]
    fn test_untoc_builder() {
        let untoc = Untoc::new().preserve_order().keep_rejected(true);
        assert!(untoc.config.preserve_document_order);
        assert!(untoc.keep_rejected);
    }

    #[test]
    fn test_extract_text_accepts_long_contents() {
        let entries = extract_text(&contents_text(30)).unwrap();
        assert_eq!(entries.len(), 30);
        assert_eq!(entries[0].heading, "1 Topic number 1");
        assert_eq!(entries[0].page_number, Some(3));
        assert!(entries.iter().all(|e| e.level == 1));
    }

    #[test]
    fn test_short_contents_rejected() {
        let result = extract_text(&contents_text(5));
        assert!(matches!(
            result,
            Err(Error::QualityRejected(RejectReason::TooShort { entries: 5, .. }))
        ));
    }

    #[test]
    fn test_keep_rejected_salvages() {
        let source = MemorySource::from_text("short", &contents_text(5));
        let result = Untoc::new()
            .keep_rejected(true)
            .extract_source(&source)
            .unwrap();
        assert!(result.salvaged);
        assert_eq!(result.strategy, Some(Strategy::HeuristicText));
        assert_eq!(result.entries().len(), 5);
        assert!(result.to_text().starts_with("1 Topic number 1 ...... 3\n"));

        let json = result.to_json(JsonFormat::Compact).unwrap();
        assert!(json.starts_with(r#"{"name":"short","strategy":"heuristic_text","salvaged":true"#));
    }

    #[test]
    fn test_invalid_config_rejected_early() {
        let source = MemorySource::from_text("x", "text");
        let config = OutlineConfig::new().with_max_scan_lines(0);
        let result = Untoc::new().with_config(config).extract_source(&source);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_extract_missing_file() {
        let result = extract_file("/nonexistent/untoc/book.txt");
        assert!(matches!(result, Err(Error::SourceUnavailable(_))));
    }
}
