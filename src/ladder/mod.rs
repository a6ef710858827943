//! Strategy fallback ladder.
//!
//! Each document climbs an explicit state machine: embedded metadata first,
//! then the heuristic table of contents parser, then a bare heading scan.
//! Every candidate passes through the same [`QualityGate`]; a strategy
//! error or a gate rejection moves to the next state. Errors that are not
//! strategy failures (the source cannot supply text, I/O) abort the ladder.

mod metadata;
mod quality;

pub use metadata::{
    apply_page_offset, detect_page_offset, extract_embedded, flatten_outline, printed_page_number,
};
pub use quality::{longest_numeric_run, QualityGate};

use std::fmt;

use serde::Serialize;

use crate::error::{Error, RejectReason, Result};
use crate::model::{OutlineEntry, SourceDocument};
use crate::parser::{
    scan_headings, FilterStats, OutlineConfig, ParsedOutline, SectionStart, TocParser,
};
use crate::source::TextSource;

/// An outline extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Bookmarks embedded in document metadata
    EmbeddedOutline,
    /// The printed table of contents, parsed heuristically
    HeuristicText,
    /// Heading markers scanned across all pages
    HeadingScan,
}

impl Strategy {
    /// All strategies in ladder order.
    pub const ALL: [Strategy; 3] = [
        Strategy::EmbeddedOutline,
        Strategy::HeuristicText,
        Strategy::HeadingScan,
    ];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::EmbeddedOutline => write!(f, "embedded outline"),
            Strategy::HeuristicText => write!(f, "heuristic text parse"),
            Strategy::HeadingScan => write!(f, "heading pattern scan"),
        }
    }
}

/// Ladder states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderState {
    ManualMetadata,
    HeuristicTextParse,
    HeadingPatternScan,
    /// Terminal: a strategy passed the gate
    Accepted(Strategy),
    /// Terminal: every strategy failed or was rejected
    Failed,
}

impl LadderState {
    /// Strategy run in this state; `None` for terminal states.
    pub fn strategy(self) -> Option<Strategy> {
        match self {
            LadderState::ManualMetadata => Some(Strategy::EmbeddedOutline),
            LadderState::HeuristicTextParse => Some(Strategy::HeuristicText),
            LadderState::HeadingPatternScan => Some(Strategy::HeadingScan),
            LadderState::Accepted(_) | LadderState::Failed => None,
        }
    }

    /// State after the current strategy failed or was rejected.
    pub fn escalate(self) -> LadderState {
        match self {
            LadderState::ManualMetadata => LadderState::HeuristicTextParse,
            LadderState::HeuristicTextParse => LadderState::HeadingPatternScan,
            LadderState::HeadingPatternScan | LadderState::Failed => LadderState::Failed,
            accepted @ LadderState::Accepted(_) => accepted,
        }
    }

    /// Whether the ladder has stopped.
    pub fn is_terminal(self) -> bool {
        self.strategy().is_none()
    }
}

/// What happened when a strategy ran.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptResult {
    /// Passed the gate
    Accepted { entries: usize },
    /// Produced an outline the gate rejected
    Rejected {
        reason: RejectReason,
        candidate: Vec<OutlineEntry>,
    },
    /// Produced nothing
    Failed { error: String },
}

/// One strategy run.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub strategy: Strategy,
    pub result: AttemptResult,
}

/// Heuristic parser details kept for reporting.
#[derive(Debug, Clone)]
pub struct ParseDetails {
    pub section: SectionStart,
    pub stats: FilterStats,
    pub aborted: bool,
    /// The accepted or reported outline came from the clean re-extraction
    pub recovered: bool,
}

impl From<&ParsedOutline> for ParseDetails {
    fn from(parsed: &ParsedOutline) -> Self {
        Self {
            section: parsed.section.clone(),
            stats: parsed.stats.clone(),
            aborted: parsed.aborted,
            recovered: parsed.recovered,
        }
    }
}

/// Final state of one document's ladder.
#[derive(Debug, Clone)]
pub struct LadderOutcome {
    /// Document name
    pub name: String,
    /// Terminal state
    pub state: LadderState,
    /// Accepted entries; empty when the ladder failed
    pub entries: Vec<OutlineEntry>,
    /// Every strategy run, in order
    pub attempts: Vec<Attempt>,
    /// Heuristic parser details, when it located a section
    pub details: Option<ParseDetails>,
}

impl LadderOutcome {
    /// Whether a strategy was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self.state, LadderState::Accepted(_))
    }

    /// The accepted strategy.
    pub fn strategy(&self) -> Option<Strategy> {
        match self.state {
            LadderState::Accepted(strategy) => Some(strategy),
            _ => None,
        }
    }

    /// Largest outline the gate rejected, for callers that prefer a weak
    /// outline to none.
    pub fn best_rejected(&self) -> Option<(Strategy, &[OutlineEntry])> {
        let mut best: Option<(Strategy, &[OutlineEntry])> = None;
        for attempt in &self.attempts {
            if let AttemptResult::Rejected { candidate, .. } = &attempt.result {
                if best.map_or(true, |(_, b)| candidate.len() > b.len()) {
                    best = Some((attempt.strategy, candidate.as_slice()));
                }
            }
        }
        best
    }

    /// Reason the last rejected candidate was turned down.
    pub fn last_rejection(&self) -> Option<&RejectReason> {
        self.attempts.iter().rev().find_map(|a| match &a.result {
            AttemptResult::Rejected { reason, .. } => Some(reason),
            _ => None,
        })
    }

    /// Error describing a failed ladder; `None` once accepted.
    ///
    /// [`Error::QualityRejected`] when some strategy produced a candidate,
    /// [`Error::NoOutline`] when none did.
    pub fn failure(&self) -> Option<Error> {
        if self.is_accepted() {
            return None;
        }
        Some(match self.last_rejection() {
            Some(reason) => Error::QualityRejected(reason.clone()),
            None => Error::NoOutline(self.name.clone()),
        })
    }

    /// Accepted entries, or the ladder's [`failure`](Self::failure).
    pub fn into_result(self) -> Result<Vec<OutlineEntry>> {
        match self.failure() {
            Some(e) => Err(e),
            None => Ok(self.entries),
        }
    }
}

/// Runs the strategy ladder for documents.
pub struct FallbackLadder {
    config: OutlineConfig,
    gate: QualityGate,
}

impl FallbackLadder {
    /// Create a ladder with default configuration.
    pub fn new() -> Self {
        Self::with_config(OutlineConfig::default())
    }

    /// Create a ladder with custom configuration.
    pub fn with_config(config: OutlineConfig) -> Self {
        let gate = QualityGate::from_config(&config);
        Self { config, gate }
    }

    /// Get the configuration.
    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// Load a source and run the ladder on it.
    ///
    /// Only a source failure is an error; a document no strategy handles
    /// ends in [`LadderState::Failed`].
    pub fn run(&self, source: &dyn TextSource) -> Result<LadderOutcome> {
        let doc = source.load()?;
        self.run_document(&doc)
    }

    /// Run the ladder on a loaded document.
    pub fn run_document(&self, doc: &SourceDocument) -> Result<LadderOutcome> {
        let mut state = LadderState::ManualMetadata;
        let mut attempts = Vec::new();
        let mut entries = Vec::new();
        let mut details = None;

        while let Some(strategy) = state.strategy() {
            let result = match strategy {
                Strategy::EmbeddedOutline => extract_embedded(doc, &self.config),
                Strategy::HeuristicText => self.parse_heuristic(doc, &mut details),
                Strategy::HeadingScan => {
                    scan_headings(&doc.pages, self.config.preserve_document_order)
                }
            };

            match result {
                Ok(candidate) => match self.gate.check(&candidate) {
                    Ok(()) => {
                        log::info!(
                            "{}: accepted {} entries from {}",
                            doc.name,
                            candidate.len(),
                            strategy
                        );
                        attempts.push(Attempt {
                            strategy,
                            result: AttemptResult::Accepted {
                                entries: candidate.len(),
                            },
                        });
                        entries = candidate;
                        state = LadderState::Accepted(strategy);
                    }
                    Err(reason) => {
                        log::debug!("{}: {} rejected: {}", doc.name, strategy, reason);
                        attempts.push(Attempt {
                            strategy,
                            result: AttemptResult::Rejected { reason, candidate },
                        });
                        state = state.escalate();
                    }
                },
                Err(e) if e.is_strategy_failure() => {
                    log::debug!("{}: {} failed: {}", doc.name, strategy, e);
                    attempts.push(Attempt {
                        strategy,
                        result: AttemptResult::Failed {
                            error: e.to_string(),
                        },
                    });
                    state = state.escalate();
                }
                Err(e) => return Err(e),
            }
        }

        if state == LadderState::Failed {
            log::warn!("{}: no strategy produced an acceptable outline", doc.name);
        }

        Ok(LadderOutcome {
            name: doc.name.clone(),
            state,
            entries,
            attempts,
            details,
        })
    }
}

impl FallbackLadder {
    /// Parse the printed outline, re-extracting it without the noise filter
    /// when the filtered result is short enough to fail the gate.
    fn parse_heuristic(
        &self,
        doc: &SourceDocument,
        details: &mut Option<ParseDetails>,
    ) -> Result<Vec<OutlineEntry>> {
        let parser = TocParser::with_config(self.config.clone());

        let filtered = match parser.parse_document(doc) {
            Ok(parsed) => {
                *details = Some(ParseDetails::from(&parsed));
                let short = parsed.entries.len() <= self.config.clean_retry_max_lines;
                if !short || self.gate.check(&parsed.entries).is_ok() {
                    return Ok(parsed.entries);
                }
                Ok(parsed.entries)
            }
            Err(e @ Error::ClassificationExhausted { .. })
                if self.config.clean_retry_max_lines > 0 =>
            {
                Err(e)
            }
            Err(e) => return Err(e),
        };

        match parser.parse_document_clean(doc) {
            Ok(clean) if self.gate.check(&clean.entries).is_ok() => {
                log::debug!(
                    "{}: clean re-extraction recovered {} entries",
                    doc.name,
                    clean.entries.len()
                );
                *details = Some(ParseDetails::from(&clean));
                Ok(clean.entries)
            }
            _ => filtered,
        }
    }
}

impl Default for FallbackLadder {
    fn default() -> Self {
        Self::new()
    }
}
