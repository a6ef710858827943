//! Line classification against the outline line grammars.
//!
//! Grammars are tried in a fixed priority order and the first match wins.
//! The low-confidence shapes (bare trailing page numbers, prefixed lines)
//! come last.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::{Line, NumberingToken};

/// Numbering prefix: roman numeral or decimal/integer with optional `.`/`:`.
const NUM: &str = r"(?P<num>[IVXLCDM]+\.?|\d+(?:\.\d+)*[.:]?)";
/// Dot leader: two or more dots, optionally single-space separated.
const LEADER: &str = r"\.(?:\s?\.)+";

lazy_static! {
    static ref RE_NUMBERED_LEADER_PAGE: Regex =
        Regex::new(&format!(r"^{NUM}\s+(?P<heading>.+?)\s*{LEADER}\s*(?P<page>\d+)$")).unwrap();
    static ref RE_NUMBERED_PAGE: Regex =
        Regex::new(&format!(r"^{NUM}\s+(?P<heading>.+?)\s+(?P<page>\d+)$")).unwrap();
    static ref RE_NUMBERED_HEADING: Regex =
        Regex::new(&format!(r"^{NUM}\s+(?P<heading>.+)$")).unwrap();
    static ref RE_LEADER_PAGE: Regex =
        Regex::new(&format!(r"^(?P<heading>.+?)\s*{LEADER}\s*(?P<page>\d+)$")).unwrap();
    static ref RE_BARE_PAGE: Regex =
        Regex::new(r"^(?P<heading>.+?)\s+(?P<page>\d+)$").unwrap();
    static ref RE_CHAPTER_LEADER_PAGE: Regex =
        Regex::new(&format!(r"(?i)^(?P<heading>chapter\s+\d+)\s*{LEADER}\s*(?P<page>\d+)$")).unwrap();
    static ref RE_PART_PREFIXED: Regex = Regex::new(&format!(
        r"(?i)^(?P<num>part\s+\d+:)?\s*(?P<heading>.+?)(?:\s*{LEADER}\s*|\s+)(?P<page>\d+)$"
    ))
    .unwrap();

    /// Lines opening with a chapter or part marker are left to the
    /// dedicated grammars at the end of the cascade.
    static ref RE_MARKER_PREFIX: Regex =
        Regex::new(r"(?i)^(chapter\s+\d+\b|part\s+\d+:)").unwrap();

    static ref RE_SYMBOLS_ONLY: Regex = Regex::new(r"^[^\w\s]+$").unwrap();
    static ref RE_DECIMALS_ONLY: Regex =
        Regex::new(r"^(\d+\.\d+|\d+-\d+)(\s+(\d+\.\d+|\d+-\d+))*$").unwrap();
    static ref RE_RESET_KEYWORD: Regex = Regex::new(
        r"(?i)\b(index|acknowledge?ments?|introduction|appendix|conclusions?)\b"
    )
    .unwrap();
}

/// The closed set of line shapes, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// `<numbering> <heading> <dot-leader> <page>`
    NumberedLeaderPage,
    /// `<numbering> <heading> <page>`
    NumberedPage,
    /// `<numbering> <heading>`
    NumberedHeading,
    /// `<heading> <dot-leader> <page>`
    LeaderPage,
    /// `<heading> <page>`
    BarePage,
    /// `Chapter <n> <dot-leader> <page>`
    ChapterLeaderPage,
    /// optional `PART <n>:` then `<heading>` and `<page>`
    PartPrefixed,
}

impl Grammar {
    /// All grammars in the order they are tried.
    pub const CASCADE: [Grammar; 7] = [
        Grammar::NumberedLeaderPage,
        Grammar::NumberedPage,
        Grammar::NumberedHeading,
        Grammar::LeaderPage,
        Grammar::BarePage,
        Grammar::ChapterLeaderPage,
        Grammar::PartPrefixed,
    ];

    fn pattern(self) -> &'static Regex {
        match self {
            Grammar::NumberedLeaderPage => &RE_NUMBERED_LEADER_PAGE,
            Grammar::NumberedPage => &RE_NUMBERED_PAGE,
            Grammar::NumberedHeading => &RE_NUMBERED_HEADING,
            Grammar::LeaderPage => &RE_LEADER_PAGE,
            Grammar::BarePage => &RE_BARE_PAGE,
            Grammar::ChapterLeaderPage => &RE_CHAPTER_LEADER_PAGE,
            Grammar::PartPrefixed => &RE_PART_PREFIXED,
        }
    }

    /// Whether the grammar carries a leading numbering group.
    pub fn is_numbered(self) -> bool {
        matches!(
            self,
            Grammar::NumberedLeaderPage | Grammar::NumberedPage | Grammar::NumberedHeading
        )
    }

    /// Match one line against this grammar.
    pub fn apply(self, text: &str) -> Option<Classified> {
        let caps = self.pattern().captures(text)?;

        let heading = caps.name("heading")?.as_str().trim();
        if !heading.chars().any(|c| c.is_alphabetic()) {
            return None;
        }

        if matches!(self, Grammar::LeaderPage | Grammar::BarePage)
            && RE_MARKER_PREFIX.is_match(heading)
        {
            return None;
        }

        let page = match caps.name("page") {
            Some(m) => Some(m.as_str().parse::<u32>().ok()?),
            None => None,
        };

        let (numbering_text, numbering) = match caps.name("num") {
            Some(m) if self.is_numbered() => {
                let token = NumberingToken::parse(m.as_str())?;
                (Some(m.as_str().trim().to_string()), Some(token))
            }
            Some(m) => {
                let prefix = m.as_str().trim().to_string();
                let token = NumberingToken::from_heading(&prefix);
                (Some(prefix), token)
            }
            None => (None, NumberingToken::from_heading(heading)),
        };

        let heading = match numbering_text {
            Some(prefix) => format!("{} {}", prefix, heading),
            None => heading.to_string(),
        };

        Some(Classified {
            grammar: self,
            heading,
            page,
            numbering,
            lines_consumed: 1,
        })
    }
}

/// A line recognized as an outline entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    /// Grammar that matched
    pub grammar: Grammar,
    /// Emitted heading, numbering included
    pub heading: String,
    /// Page number, when the grammar has one
    pub page: Option<u32>,
    /// Numbering prefix feeding level assignment
    pub numbering: Option<NumberingToken>,
    /// 2 when the match needed the following line
    pub lines_consumed: usize,
}

/// Classification outcome for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Blank, symbol-only or number-only residue
    Skip,
    /// Recognized outline entry
    Entry(Classified),
    /// Text no grammar accepted
    Unclassified,
}

/// A line with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLine {
    /// Source line; for two-line matches, the merged text
    pub line: Line,
    /// Classification
    pub kind: LineKind,
    /// Contains a reset keyword such as "Introduction" or "Appendix"
    pub keyword: bool,
}

impl ScannedLine {
    /// The entry, if the line was recognized as one.
    pub fn entry(&self) -> Option<&Classified> {
        match &self.kind {
            LineKind::Entry(classified) => Some(classified),
            _ => None,
        }
    }

    /// Whether the line is unclassified text.
    pub fn is_unclassified(&self) -> bool {
        matches!(self.kind, LineKind::Unclassified)
    }
}

/// Whether a line is residue that is never an entry.
pub fn is_skip_line(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || RE_SYMBOLS_ONLY.is_match(text) || RE_DECIMALS_ONLY.is_match(text)
}

/// Whether a line names a section that resets the truncation counters.
pub fn is_reset_keyword(text: &str) -> bool {
    RE_RESET_KEYWORD.is_match(text)
}

/// Run one line through the grammar cascade.
pub fn classify_line(text: &str) -> Option<Classified> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Grammar::CASCADE.iter().find_map(|grammar| grammar.apply(text))
}

/// Classify a window of normalized lines.
///
/// A line no grammar accepts is retried merged with the following line,
/// provided the following line does not classify on its own. A merged
/// match consumes both lines.
pub fn classify_lines(lines: &[Line]) -> Vec<ScannedLine> {
    let mut scanned = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];

        if is_skip_line(&line.text) {
            scanned.push(ScannedLine {
                line: line.clone(),
                kind: LineKind::Skip,
                keyword: false,
            });
            i += 1;
            continue;
        }

        let keyword = is_reset_keyword(&line.text);

        if let Some(classified) = classify_line(&line.text) {
            scanned.push(ScannedLine {
                line: line.clone(),
                kind: LineKind::Entry(classified),
                keyword,
            });
            i += 1;
            continue;
        }

        if let Some(merged) = lines.get(i + 1).and_then(|next| merge_with_next(line, next)) {
            log::trace!("line {} merged with next: {}", line.index, merged.line.text);
            scanned.push(merged);
            i += 2;
            continue;
        }

        scanned.push(ScannedLine {
            line: line.clone(),
            kind: LineKind::Unclassified,
            keyword,
        });
        i += 1;
    }

    scanned
}

fn merge_with_next(line: &Line, next: &Line) -> Option<ScannedLine> {
    if is_skip_line(&next.text) || classify_line(&next.text).is_some() {
        return None;
    }

    let text = format!("{} {}", line.text, next.text);
    let mut classified = classify_line(&text)?;
    classified.lines_consumed = 2;

    Some(ScannedLine {
        keyword: is_reset_keyword(&text),
        line: Line::new(line.index, text),
        kind: LineKind::Entry(classified),
    })
}
