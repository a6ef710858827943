//! Table of contents title detection.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::Line;

/// A title phrase the locator searches for.
struct TitlePhrase {
    text: &'static str,
    pattern: Regex,
    ignore_case: bool,
}

impl TitlePhrase {
    fn new(text: &'static str, ignore_case: bool) -> Self {
        let flags = if ignore_case { "(?i)" } else { "" };
        let pattern = Regex::new(&format!(r"{}\b{}\b", flags, regex::escape(text))).unwrap();
        Self {
            text,
            pattern,
            ignore_case,
        }
    }

    fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// A line holding only the start of the phrase, e.g. "Table of".
    fn is_split_prefix(&self, text: &str) -> bool {
        if text.is_empty() || text.len() >= self.text.len() {
            return false;
        }
        if self.ignore_case {
            self.text.to_lowercase().starts_with(&text.to_lowercase())
        } else {
            self.text.starts_with(text)
        }
    }
}

lazy_static! {
    /// Priority order; an earlier phrase anywhere in the window beats a later
    /// phrase on an earlier line.
    static ref TITLE_PHRASES: Vec<TitlePhrase> = vec![
        TitlePhrase::new("Table of Contents", false),
        TitlePhrase::new("TABLE OF CONTENTS", false),
        TitlePhrase::new("Contents", false),
        TitlePhrase::new("CONTENTS", false),
        TitlePhrase::new("Index", false),
        TitlePhrase::new("table of contents", true),
        TitlePhrase::new("contents", true),
    ];
}

/// Where the outline section begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionStart {
    /// Index of the (first) title line
    pub line_index: usize,
    /// Lines the title occupies, 1 or 2
    pub title_lines: usize,
    /// Phrase that matched
    pub phrase: &'static str,
}

impl SectionStart {
    /// Index of the first line after the title.
    pub fn body_start(&self) -> usize {
        self.line_index + self.title_lines
    }
}

/// Find the outline section title within the first `max_scan_lines` lines.
pub fn locate_section(lines: &[Line], max_scan_lines: usize) -> Option<SectionStart> {
    let window = lines.len().min(max_scan_lines);

    for phrase in TITLE_PHRASES.iter() {
        for i in 0..window {
            let text = lines[i].text.as_str();
            if phrase.matches(text) {
                return Some(SectionStart {
                    line_index: i,
                    title_lines: 1,
                    phrase: phrase.text,
                });
            }

            if phrase.is_split_prefix(text) {
                if let Some(next) = lines.get(i + 1) {
                    let joined = [
                        format!("{}{}", text, next.text),
                        format!("{} {}", text, next.text),
                    ];
                    if joined.iter().any(|j| phrase.matches(j)) {
                        return Some(SectionStart {
                            line_index: i,
                            title_lines: 2,
                            phrase: phrase.text,
                        });
                    }
                }
            }
        }
    }

    None
}
