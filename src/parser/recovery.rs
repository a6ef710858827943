//! Filter-free re-extraction of short outlines.
//!
//! When the noise filter leaves too little behind, the outline is read again
//! taking every line after the title until the text turns into running
//! prose.

use crate::model::{Line, NumberingToken};

/// Lines examined ahead of each position.
pub const PROSE_LOOKAHEAD: usize = 5;

/// Long lines within the lookahead that mark the start of prose.
pub const PROSE_HITS: usize = 3;

/// Words a line must exceed to count as long.
pub const PROSE_WORDS: usize = 10;

/// Number of leading lines that read as an outline.
///
/// Stops at the first position where at least [`PROSE_HITS`] of the next
/// [`PROSE_LOOKAHEAD`] lines have more than [`PROSE_WORDS`] words. Lines
/// opening with a numbering token never count as long.
pub fn outline_extent(lines: &[Line]) -> usize {
    (0..lines.len())
        .find(|&i| {
            let end = (i + PROSE_LOOKAHEAD).min(lines.len());
            lines[i..end].iter().filter(|line| is_long_prose(line)).count() >= PROSE_HITS
        })
        .unwrap_or(lines.len())
}

fn is_long_prose(line: &Line) -> bool {
    NumberingToken::from_heading(&line.text).is_none()
        && line.text.split_whitespace().count() > PROSE_WORDS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::normalize_lines;

    const PROSE: &str = "the committee met twice during the year to review the findings of the survey";

    #[test]
    fn test_stops_before_prose() {
        let lines = normalize_lines(&[
            "Scope 1",
            "Terms 2",
            "a short note",
            PROSE,
            PROSE,
            PROSE,
            "Annex 9",
        ]);
        // Position 1 already sees three long lines within its lookahead.
        assert_eq!(outline_extent(&lines), 1);
    }

    #[test]
    fn test_numbered_long_lines_are_not_prose() {
        let numbered = format!("1.2 {}", PROSE);
        let lines = normalize_lines(&[
            numbered.as_str(),
            numbered.as_str(),
            numbered.as_str(),
            "Annex 9",
        ]);
        assert_eq!(outline_extent(&lines), 4);
    }

    #[test]
    fn test_isolated_long_lines_kept() {
        let lines = normalize_lines(&[PROSE, "Scope 1", "Terms 2", PROSE, "Annex 9", "Index 10"]);
        assert_eq!(outline_extent(&lines), 6);
    }

    #[test]
    fn test_empty() {
        assert_eq!(outline_extent(&[]), 0);
    }
}
