//! Outline from bookmarks embedded in the document metadata.
//!
//! Bookmark targets are physical page indices. Printed page numbers often
//! differ by a fixed amount (front matter numbered separately), so the most
//! common difference between printed and physical numbers is applied.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{Outline, OutlineItem, OutlineEntry, SourceDocument};
use crate::parser::OutlineConfig;

lazy_static! {
    static ref RE_INTEGER: Regex = Regex::new(r"\b\d+\b").unwrap();
}

/// Flatten bookmarks depth-first into leveled entries.
///
/// A bookmark sits at its recorded level or its tree depth, whichever is
/// deeper, and never more than one level below the entry before it.
pub fn flatten_outline(outline: &Outline) -> Vec<OutlineEntry> {
    fn walk(items: &[OutlineItem], depth: u8, prev: &mut u8, out: &mut Vec<OutlineEntry>) {
        for item in items {
            let title = item.title.trim();
            if !title.is_empty() {
                let wanted = item.level.max(depth).saturating_add(1);
                let level = wanted.min(prev.saturating_add(1)).max(1);
                *prev = level;
                out.push(OutlineEntry::new(title, item.page).with_level(level));
            }
            walk(&item.children, depth.saturating_add(1), prev, out);
        }
    }

    let mut out = Vec::with_capacity(outline.total_items());
    let mut prev = 0;
    walk(&outline.items, 0, &mut prev, &mut out);
    out
}

/// Printed page number of one page: the first integer on its first
/// non-empty line, else on its last.
pub fn printed_page_number(page: &str) -> Option<i64> {
    let mut lines = page.lines().map(str::trim).filter(|l| !l.is_empty());
    let first = lines.next()?;
    let last = lines.last();

    first_integer(first).or_else(|| last.and_then(first_integer))
}

fn first_integer(text: &str) -> Option<i64> {
    RE_INTEGER
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

/// Most common `printed - physical` page difference across the document.
///
/// Ties go to the difference seen first. `None` when no page carries a
/// printed number.
pub fn detect_page_offset<S: AsRef<str>>(pages: &[S]) -> Option<i64> {
    let mut tally: Vec<(i64, usize)> = Vec::new();

    for (index, page) in pages.iter().enumerate() {
        let Some(printed) = printed_page_number(page.as_ref()) else {
            continue;
        };
        let offset = printed - (index as i64 + 1);
        match tally.iter_mut().find(|(o, _)| *o == offset) {
            Some((_, count)) => *count += 1,
            None => tally.push((offset, 1)),
        }
    }

    let mut best: Option<(i64, usize)> = None;
    for (offset, count) in tally {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((offset, count));
        }
    }
    best.map(|(offset, _)| offset)
}

/// Shift entry pages by `offset`.
///
/// Pages that would fall below 1 are dropped with their entry when
/// `drop_negative` is set, otherwise cleared.
pub fn apply_page_offset(
    entries: Vec<OutlineEntry>,
    offset: i64,
    drop_negative: bool,
) -> Vec<OutlineEntry> {
    entries
        .into_iter()
        .filter_map(|mut entry| {
            let Some(page) = entry.page_number else {
                return Some(entry);
            };
            let adjusted = page as i64 + offset;
            if adjusted < 1 {
                if drop_negative {
                    return None;
                }
                entry.page_number = None;
            } else {
                entry.page_number = u32::try_from(adjusted).ok();
            }
            Some(entry)
        })
        .collect()
}

/// Entries from the document's embedded outline.
///
/// Fails with [`Error::NoEmbeddedOutline`] when the document has no
/// bookmarks, or none survive page adjustment.
pub fn extract_embedded(doc: &SourceDocument, config: &OutlineConfig) -> Result<Vec<OutlineEntry>> {
    let outline = match &doc.outline {
        Some(outline) if !outline.is_empty() => outline,
        _ => return Err(Error::NoEmbeddedOutline),
    };

    let mut entries = flatten_outline(outline);

    if config.adjust_page_offset {
        if let Some(offset) = detect_page_offset(&doc.pages) {
            log::debug!("{}: page offset {}", doc.name, offset);
            if offset != 0 {
                entries = apply_page_offset(entries, offset, config.drop_negative_pages);
            }
        }
    }

    if entries.is_empty() {
        return Err(Error::NoEmbeddedOutline);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_outline() -> Outline {
        let mut outline = Outline::new();
        let mut ch1 = OutlineItem::new("Chapter 1", Some(5), 0);
        ch1.add_child(OutlineItem::new("Section 1.1", Some(6), 1));
        ch1.add_child(OutlineItem::new("  ", Some(7), 1));
        outline.add_item(ch1);
        outline.add_item(OutlineItem::new("Chapter 2", Some(9), 0));
        outline
    }

    #[test]
    fn test_flatten_levels() {
        let entries = flatten_outline(&sample_outline());
        let summary: Vec<_> = entries
            .iter()
            .map(|e| (e.heading.as_str(), e.page_number, e.level))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Chapter 1", Some(5), 1),
                ("Section 1.1", Some(6), 2),
                ("Chapter 2", Some(9), 1),
            ]
        );
    }

    #[test]
    fn test_flatten_uses_tree_depth_and_clamps() {
        let mut outline = Outline::new();
        let mut top = OutlineItem::new("Top", Some(1), 0);
        // Nested but recorded at level 0.
        top.add_child(OutlineItem::new("Nested", Some(2), 0));
        outline.add_item(top);
        // Recorded four levels down right after a top-level item.
        outline.add_item(OutlineItem::new("Deep", Some(3), 4));

        let levels: Vec<_> = flatten_outline(&outline).iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![1, 2, 3]);
    }

    #[test]
    fn test_printed_page_number() {
        assert_eq!(printed_page_number("12\nbody text\nfooter"), Some(12));
        assert_eq!(printed_page_number("Header\nbody\npage 7 of 90"), Some(7));
        assert_eq!(printed_page_number("\n  \n"), None);
        assert_eq!(printed_page_number("no digits here"), None);
    }

    #[test]
    fn test_detect_page_offset() {
        // Two unnumbered front pages, then printed 1, 2, 3.
        let pages = ["Cover", "Preface", "body\n1", "body\n2", "body\n3", "Chapter 9\nx"];
        assert_eq!(detect_page_offset(&pages), Some(-2));

        let none: [&str; 2] = ["a", "b"];
        assert_eq!(detect_page_offset(&none), None);
    }

    #[test]
    fn test_apply_page_offset() {
        let entries = vec![
            OutlineEntry::new("Cover", Some(1)).with_level(1),
            OutlineEntry::new("Intro", Some(3)).with_level(1),
            OutlineEntry::new("Loose", None).with_level(1),
        ];

        let dropped = apply_page_offset(entries.clone(), -2, true);
        let pages: Vec<_> = dropped.iter().map(|e| e.page_number).collect();
        assert_eq!(pages, vec![Some(1), None]);

        let cleared = apply_page_offset(entries, -2, false);
        let pages: Vec<_> = cleared.iter().map(|e| e.page_number).collect();
        assert_eq!(pages, vec![None, Some(1), None]);
    }

    #[test]
    fn test_extract_embedded() {
        let mut doc = SourceDocument::from_text("b", "x\u{000C}y\u{000C}body\n1\u{000C}body\n2");
        assert!(matches!(
            extract_embedded(&doc, &OutlineConfig::default()),
            Err(Error::NoEmbeddedOutline)
        ));

        let mut outline = Outline::new();
        outline.add_item(OutlineItem::new("Start", Some(3), 0));
        outline.add_item(OutlineItem::new("Cover", Some(1), 0));
        doc.outline = Some(outline);

        let entries = extract_embedded(&doc, &OutlineConfig::default()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].page_number, Some(1));

        let config = OutlineConfig::new().with_page_offset(false);
        let entries = extract_embedded(&doc, &config).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].page_number, Some(3));
    }
}
