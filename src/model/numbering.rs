//! Numbering prefixes recognized on outline lines.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// "Chapter 3", "PART IV", "Part one"
    static ref RE_CHAPTER_PART: Regex = Regex::new(
        r"(?i)^(chapter|part)\s+(\d+|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|[ivxlcdm]+)\b"
    )
    .unwrap();

    /// "3: Heading"
    static ref RE_COLON: Regex = Regex::new(r"^(\d+):").unwrap();
}

const NUMBER_WORDS: [&str; 12] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve",
];

/// A classified numbering prefix.
///
/// Exists only between classification and level assignment; entries never
/// store it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumberingToken {
    /// Roman numeral such as `IV` or `IV.`
    Roman { value: u32, dotted: bool },
    /// Multi-part decimal such as `1.2.3`
    Decimal { parts: Vec<u32> },
    /// Single integer such as `3` or `3.`
    Integer { value: u32, dotted: bool },
    /// Integer followed by a colon, `3:`
    Colon { value: u32 },
    /// `Chapter n`
    Chapter { value: u32 },
    /// `Part n`
    Part { value: u32 },
}

impl NumberingToken {
    /// Parse a bare numbering token captured by a line grammar.
    ///
    /// A single roman letter without a trailing dot is rejected so that
    /// headings like "I Robot" are not read as numbered.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        if let Some(rest) = token.strip_suffix(':') {
            return rest.parse().ok().map(|value| NumberingToken::Colon { value });
        }

        if token.starts_with(|c: char| c.is_ascii_digit()) {
            return parse_decimal(token);
        }

        let stripped = token.trim_end_matches('.');
        let dotted = stripped.len() != token.len();
        if stripped.is_empty() || !stripped.chars().all(|c| c.is_ascii_uppercase()) {
            return None;
        }
        if !dotted && stripped.len() == 1 {
            return None;
        }
        roman_value(stripped).map(|value| NumberingToken::Roman { value, dotted })
    }

    /// Detect a numbering prefix at the start of an already-built heading.
    ///
    /// Recognizes `Chapter n`, `Part n`, `n:`, decimal and integer prefixes,
    /// and dotted roman numerals.
    pub fn from_heading(heading: &str) -> Option<Self> {
        let heading = heading.trim_start();

        if let Some(caps) = RE_CHAPTER_PART.captures(heading) {
            let value = number_value(&caps[2])?;
            return Some(if caps[1].eq_ignore_ascii_case("chapter") {
                NumberingToken::Chapter { value }
            } else {
                NumberingToken::Part { value }
            });
        }

        if let Some(caps) = RE_COLON.captures(heading) {
            return caps[1]
                .parse()
                .ok()
                .map(|value| NumberingToken::Colon { value });
        }

        let first = heading.split_whitespace().next()?;
        match Self::parse(first)? {
            NumberingToken::Roman { dotted: false, .. } => None,
            token => Some(token),
        }
    }

    /// Nesting level implied by this token alone.
    pub fn raw_level(&self) -> u8 {
        match self {
            NumberingToken::Chapter { .. }
            | NumberingToken::Part { .. }
            | NumberingToken::Colon { .. }
            | NumberingToken::Roman { .. } => 1,
            NumberingToken::Decimal { parts } => {
                if parts.last() == Some(&0) {
                    1
                } else {
                    parts.len().min(u8::MAX as usize) as u8
                }
            }
            NumberingToken::Integer { dotted: true, .. } => 1,
            NumberingToken::Integer { dotted: false, .. } => 2,
        }
    }
}

fn parse_decimal(token: &str) -> Option<NumberingToken> {
    let stripped = token.strip_suffix('.').unwrap_or(token);
    let dotted = stripped.len() != token.len();
    let parts = stripped
        .split('.')
        .map(|part| part.parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;

    match parts.len() {
        0 => None,
        1 => Some(NumberingToken::Integer {
            value: parts[0],
            dotted,
        }),
        _ => Some(NumberingToken::Decimal { parts }),
    }
}

/// Value of a chapter/part number given as digits, a word, or a roman numeral.
fn number_value(text: &str) -> Option<u32> {
    if let Ok(value) = text.parse::<u32>() {
        return Some(value);
    }
    let lower = text.to_ascii_lowercase();
    if let Some(pos) = NUMBER_WORDS.iter().position(|w| *w == lower) {
        return Some(pos as u32 + 1);
    }
    roman_value(&text.to_ascii_uppercase())
}

/// Value of a canonical roman numeral (1 to 3999), uppercase or lowercase.
pub fn roman_value(text: &str) -> Option<u32> {
    if text.is_empty() {
        return None;
    }

    let mut total: u32 = 0;
    let mut prev = 0;
    for c in text.chars().rev() {
        let v = match c.to_ascii_uppercase() {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => return None,
        };
        if v < prev {
            total = total.checked_sub(v)?;
        } else {
            total += v;
            prev = v;
        }
    }

    // Reject non-canonical forms such as "IIII" or "VX".
    let canonical = to_roman(total)?;
    canonical
        .eq_ignore_ascii_case(text)
        .then_some(total)
}

fn to_roman(mut value: u32) -> Option<String> {
    if value == 0 || value > 3999 {
        return None;
    }
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (n, symbol) in TABLE {
        while value >= n {
            out.push_str(symbol);
            value -= n;
        }
    }
    Some(out)
}
