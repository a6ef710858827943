//! Integration tests for the heuristic table of contents pipeline.

use std::collections::HashSet;

use untoc::parser::{normalize_line, OutlineConfig, TocParser};
use untoc::OutlineEntry;

fn summary(entries: &[OutlineEntry]) -> Vec<(&str, Option<u32>, u8)> {
    entries
        .iter()
        .map(|e| (e.heading.as_str(), e.page_number, e.level))
        .collect()
}

fn assert_level_steps(entries: &[OutlineEntry]) {
    if let Some(first) = entries.first() {
        assert_eq!(first.level, 1, "first entry must be top level");
    }
    for pair in entries.windows(2) {
        assert!(pair[0].level >= 1 && pair[1].level >= 1);
        assert!(
            pair[1].level <= pair[0].level + 1,
            "level jumps from {} to {} at {:?}",
            pair[0].level,
            pair[1].level,
            pair[1].heading
        );
    }
}

#[test]
fn test_numbered_contents_with_leaders() {
    let lines = [
        "Table of Contents",
        "1. Introduction .......... 3",
        "2. Methods .......... 10",
        "2.1 Setup .......... 11",
    ];
    let parsed = TocParser::new().parse(&lines).unwrap();

    assert_eq!(parsed.section.line_index, 0);
    assert_eq!(
        summary(&parsed.entries),
        vec![
            ("1. Introduction", Some(3), 1),
            ("2. Methods", Some(10), 1),
            ("2.1 Setup", Some(11), 2),
        ]
    );
}

#[test]
fn test_prose_block_between_entries_is_dropped() {
    let mut lines = vec!["Contents".to_string(), "1 Alpha 2".to_string()];
    for _ in 0..60 {
        lines.push("the river bank was quiet in the early morning".to_string());
    }
    lines.push("2 Beta 9".to_string());

    let parsed = TocParser::new().parse(&lines).unwrap();

    assert_eq!(parsed.stats.prose_blocks_dropped, 1);
    assert_eq!(parsed.stats.prose_lines_dropped, 60);
    assert_eq!(
        summary(&parsed.entries),
        vec![("1 Alpha", Some(2), 1), ("2 Beta", Some(9), 1)]
    );
}

#[test]
fn test_plain_line_inside_dot_cluster_is_dropped() {
    let lines = [
        "Contents",
        "Preface .......... 1",
        "Foreword .......... 2",
        "garbled scan fragment",
        "Acknowledgements .......... 3",
        "Abbreviations .......... 4",
        "Glossary .......... 5",
    ];
    let parsed = TocParser::new().parse(&lines).unwrap();

    assert_eq!(parsed.stats.dot_cluster_dropped, 1);
    let headings: Vec<_> = parsed.entries.iter().map(|e| e.heading.as_str()).collect();
    assert_eq!(
        headings,
        vec![
            "Preface",
            "Foreword",
            "Acknowledgements",
            "Abbreviations",
            "Glossary"
        ]
    );
}

#[test]
fn test_split_title_is_merged() {
    let lines = ["Annual report 2023", "C", "ontents", "1 Alpha 2", "2 Beta 3"];
    let parsed = TocParser::new().parse(&lines).unwrap();

    assert_eq!(parsed.section.line_index, 1);
    assert_eq!(parsed.section.title_lines, 2);
    assert_eq!(parsed.section.body_start(), 3);
    assert_eq!(parsed.entries.len(), 2);
}

#[test]
fn test_roman_chapters_with_decimal_sections() {
    let lines = [
        "CONTENTS",
        "I. Background .......... 1",
        "1.1 History .......... 2",
        "1.1.1 Early years .......... 2",
        "1.2 Scope .......... 5",
        "II. Analysis .......... 9",
        "2.1 Data .......... 10",
    ];
    let parsed = TocParser::new().parse(&lines).unwrap();

    assert_level_steps(&parsed.entries);
    let levels: Vec<_> = parsed.entries.iter().map(|e| e.level).collect();
    assert_eq!(levels, vec![1, 2, 3, 2, 1, 2]);
}

#[test]
fn test_chapter_sharing_page_with_sections() {
    let lines = [
        "Contents",
        "Chapter 1 Overview .......... 5",
        "1.1 Scope .......... 5",
        "1.2 Terms .......... 5",
        "Chapter 2 Methods .......... 9",
        "2.1 Setup .......... 9",
    ];
    let parsed = TocParser::new().parse(&lines).unwrap();
    let level = |heading: &str| {
        parsed
            .entries
            .iter()
            .find(|e| e.heading == heading)
            .map(|e| e.level)
    };

    assert_eq!(level("Chapter 1 Overview"), Some(1));
    assert_eq!(level("1.1 Scope"), Some(2));
    assert_eq!(level("1.2 Terms"), Some(2));
    assert_eq!(level("Chapter 2 Methods"), Some(1));
    assert_eq!(level("2.1 Setup"), Some(2));

    let config = OutlineConfig::new().preserve_order();
    let parsed = TocParser::with_config(config).parse(&lines).unwrap();
    assert_level_steps(&parsed.entries);
}

#[test]
fn test_carry_forward_fills_missing_pages() {
    let lines = [
        "Contents",
        "Part One",
        "1 Origins 4",
        "Interlude",
        "2 Return 9",
        "Afterword",
    ];
    let config = OutlineConfig::new().preserve_order();
    let parsed = TocParser::with_config(config).parse(&lines).unwrap();

    let mut last = None;
    for entry in &parsed.entries {
        if last.is_some() {
            assert!(entry.page_number.is_some(), "{} lost its page", entry.heading);
        }
        if entry.page_number.is_some() {
            last = entry.page_number;
        }
    }
    assert_eq!(parsed.entries.last().unwrap().page_number, Some(9));
}

#[test]
fn test_duplicates_collapse() {
    let lines = [
        "Contents",
        "1 Alpha 2",
        "2 Beta 5",
        "1 Alpha 2",
        "3 Gamma 7",
        "2 Beta 5",
    ];
    let parsed = TocParser::new().parse(&lines).unwrap();

    let keys: HashSet<_> = parsed
        .entries
        .iter()
        .map(|e| (e.heading.clone(), e.page_number))
        .collect();
    assert_eq!(keys.len(), parsed.entries.len());
    assert_eq!(parsed.entries.len(), 3);
}

#[test]
fn test_entries_sorted_by_page_then_heading() {
    let lines = ["Contents", "3 Gamma 7", "1 Alpha 2", "2 Beta 2"];
    let parsed = TocParser::new().parse(&lines).unwrap();

    let headings: Vec<_> = parsed.entries.iter().map(|e| e.heading.as_str()).collect();
    assert_eq!(headings, vec!["1 Alpha", "2 Beta", "3 Gamma"]);

    let config = OutlineConfig::new().preserve_order();
    let parsed = TocParser::with_config(config).parse(&lines).unwrap();
    let headings: Vec<_> = parsed.entries.iter().map(|e| e.heading.as_str()).collect();
    assert_eq!(headings, vec!["3 Gamma", "1 Alpha", "2 Beta"]);
}

#[test]
fn test_normalizer_is_idempotent() {
    let samples = [
        "  1.2   Scope\tof  work ..... 14 ",
        "● Chapter 3 • The Road",
        "Cafe\u{0301} culture",
        "",
        "   ",
        "■□ Appendix A",
    ];
    for sample in samples {
        let once = normalize_line(sample);
        assert_eq!(normalize_line(&once), once, "not idempotent for {:?}", sample);
        assert_eq!(once.trim(), once);
    }
}

#[test]
fn test_parse_text_across_pages() {
    let text = "Cover page\u{000C}Table of Contents\n\
                1. Introduction .......... 3\n\
                2. Methods .......... 10\u{000C}\
                2.1 Setup .......... 11\n\
                2.2 Results .......... 14\n";
    let parsed = TocParser::new().parse_text(text).unwrap();

    assert_eq!(parsed.entries.len(), 4);
    assert_level_steps(&parsed.entries);
}
