//! Line normalization.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::Line;

lazy_static! {
    /// Decorative bullet glyphs and whitespace, collapsed together.
    static ref RE_BULLETS_AND_SPACE: Regex = Regex::new(r"[○●•■□◆◇▪▫►▻\s]+").unwrap();
}

/// Normalize one line: NFC, collapse bullet glyphs and whitespace into a
/// single space, trim.
///
/// Idempotent: `normalize_line(&normalize_line(s)) == normalize_line(s)`.
pub fn normalize_line(text: &str) -> String {
    let composed: String = text.nfc().collect();
    RE_BULLETS_AND_SPACE
        .replace_all(&composed, " ")
        .trim()
        .to_string()
}

/// Normalize a stream of raw lines, one output line per input line.
pub fn normalize_lines<S: AsRef<str>>(lines: &[S]) -> Vec<Line> {
    lines
        .iter()
        .enumerate()
        .map(|(index, text)| Line::new(index, normalize_line(text.as_ref())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_bullets() {
        assert_eq!(normalize_line("  ● 1.2   Scope\t\t4 "), "1.2 Scope 4");
        assert_eq!(normalize_line("►► Part One"), "Part One");
        assert_eq!(normalize_line("○○○"), "");
    }

    #[test]
    fn test_nfc() {
        // "e" + combining acute becomes a single code point.
        assert_eq!(normalize_line("Caf\u{0065}\u{0301}"), "Caf\u{00E9}");
    }

    #[test]
    fn test_idempotent() {
        for raw in [
            "  Table   of Contents ",
            "• Chapter 1 ....... 3",
            "\u{0041}\u{030A}ngstr\u{00F6}m ▪ units",
            "",
        ] {
            let once = normalize_line(raw);
            assert_eq!(normalize_line(&once), once);
        }
    }

    #[test]
    fn test_line_count_preserved() {
        let raw = vec!["a", "", "  ", "● b"];
        let lines = normalize_lines(&raw);
        assert_eq!(lines.len(), raw.len());
        assert_eq!(lines[3].index, 3);
        assert_eq!(lines[3].text, "b");
    }
}
