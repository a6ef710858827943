//! Noise filtering over classified outline lines.
//!
//! Four left-to-right passes: skip residue, dot-leader clusters, prose
//! blocks, then the truncation counters. Every counter lives in a
//! [`FilterState`] owned by one call, so concurrent documents never share
//! state. The filter never fails; when in doubt a line is kept.

use lazy_static::lazy_static;
use regex::Regex;

use super::classifier::{LineKind, ScannedLine};
use super::options::OutlineConfig;

lazy_static! {
    /// Dot leader long enough to mark a printed outline line.
    static ref RE_DOT_RUN: Regex = Regex::new(r"\.(?:\s?\.){4,}").unwrap();

    static ref RE_WORD: Regex = Regex::new(r"\w+").unwrap();

    static ref RE_CHAPTER_MARKER: Regex = Regex::new(
        r"(?i)^(chapter|part)\s+(\d+|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|[ivxlcdm]+)\b"
    )
    .unwrap();

    /// Trailing page number, page range or roman page.
    static ref RE_TRAILING_PAGE: Regex =
        Regex::new(r"\s(\d+|\d+-\d+|[ivxlcdm]+|[IVXLCDM]+)$").unwrap();

    /// Six digits at the end of a line read as a postal code, not a page.
    static ref RE_POSTAL_CODE: Regex = Regex::new(r"\b\d{3}\s*\d{3}$").unwrap();
}

/// A line that survived filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredLine {
    /// The classified line
    pub scanned: ScannedLine,
    /// Part of a kept multi-line unclassified block
    pub prose_block: bool,
}

/// Which truncation counter ended the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncationRule {
    /// Too many consecutive lines without a chapter/part marker
    ChapterMarkers,
    /// Too many consecutive lines without a trailing page number
    PageNumbers,
}

/// Where the outline was cut off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    /// Counter that fired
    pub rule: TruncationRule,
    /// Source index of the first discarded line
    pub at_line: usize,
    /// Lines discarded
    pub discarded: usize,
}

/// Per-stage counts for one filter run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Lines entering the filter
    pub input_lines: usize,
    /// Blank and residue lines dropped
    pub skipped: usize,
    /// Plain lines dropped from inside dot-leader clusters
    pub dot_cluster_dropped: usize,
    /// Unclassified blocks dropped as prose or noise
    pub prose_blocks_dropped: usize,
    /// Lines in the dropped blocks
    pub prose_lines_dropped: usize,
    /// Unclassified blocks kept as multi-line headings
    pub prose_blocks_kept: usize,
    /// Where a run rule cut the outline, if one fired
    pub truncation: Option<Truncation>,
    /// Lines surviving every stage
    pub kept: usize,
}

/// Output of [`filter_noise`].
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Surviving lines in order
    pub lines: Vec<FilteredLine>,
    /// What each stage removed
    pub stats: FilterStats,
}

/// Run all filter stages over one classified window.
pub fn filter_noise(scanned: Vec<ScannedLine>, config: &OutlineConfig) -> FilterOutcome {
    let mut stats = FilterStats {
        input_lines: scanned.len(),
        ..Default::default()
    };

    let survivors: Vec<ScannedLine> = scanned
        .into_iter()
        .filter(|s| !matches!(s.kind, LineKind::Skip))
        .collect();
    stats.skipped = stats.input_lines - survivors.len();

    let survivors = drop_dot_cluster_noise(survivors, config, &mut stats);
    let survivors = filter_prose_blocks(survivors, config, &mut stats);
    let lines = truncate_runs(survivors, config, &mut stats);

    stats.kept = lines.len();
    log::debug!("noise filter: {:?}", stats);

    FilterOutcome { lines, stats }
}

/// Whether the line carries a dot leader of five or more dots.
pub fn has_dot_run(text: &str) -> bool {
    RE_DOT_RUN.is_match(text)
}

/// Average `\w+` tokens per line.
fn word_average(lines: &[ScannedLine]) -> f64 {
    if lines.is_empty() {
        return 0.0;
    }
    let words: usize = lines
        .iter()
        .map(|l| RE_WORD.find_iter(&l.line.text).count())
        .sum();
    words as f64 / lines.len() as f64
}

fn is_chapter_marker(text: &str) -> bool {
    RE_CHAPTER_MARKER.is_match(text)
}

fn is_page_numbered(line: &ScannedLine) -> bool {
    let text = line.line.text.as_str();
    if RE_POSTAL_CODE.is_match(text) {
        return false;
    }
    line.entry().is_some_and(|e| e.page.is_some())
        || (text.split_whitespace().count() > 1 && RE_TRAILING_PAGE.is_match(text))
}

/// Inside a cluster of dot-leader lines, the odd line without a leader is
/// extraction noise.
///
/// Dot-leader lines belong to one cluster while at most one other line
/// separates them.
fn drop_dot_cluster_noise(
    lines: Vec<ScannedLine>,
    config: &OutlineConfig,
    stats: &mut FilterStats,
) -> Vec<ScannedLine> {
    let dotted: Vec<bool> = lines.iter().map(|l| has_dot_run(&l.line.text)).collect();
    let positions: Vec<usize> = dotted
        .iter()
        .enumerate()
        .filter(|(_, d)| **d)
        .map(|(i, _)| i)
        .collect();

    let mut drop = vec![false; lines.len()];
    let mut start = 0;
    while start < positions.len() {
        let mut end = start;
        while end + 1 < positions.len() && positions[end + 1] - positions[end] <= 2 {
            end += 1;
        }

        if end - start + 1 >= config.dot_leader_run_limit {
            for i in positions[start]..=positions[end] {
                if !dotted[i] && !lines[i].keyword {
                    log::debug!("dropping line inside dot-leader cluster: {}", lines[i].line.text);
                    drop[i] = true;
                }
            }
        }
        start = end + 1;
    }

    stats.dot_cluster_dropped = drop.iter().filter(|d| **d).count();
    lines
        .into_iter()
        .zip(drop)
        .filter(|(_, d)| !d)
        .map(|(l, _)| l)
        .collect()
}

/// Decide the fate of each maximal run of unclassified lines.
fn filter_prose_blocks(
    lines: Vec<ScannedLine>,
    config: &OutlineConfig,
    stats: &mut FilterStats,
) -> Vec<FilteredLine> {
    let in_run = |l: &ScannedLine| l.is_unclassified() && !l.keyword;

    let mut out = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        if !in_run(&lines[i]) {
            out.push(FilteredLine {
                scanned: lines[i].clone(),
                prose_block: false,
            });
            i += 1;
            continue;
        }

        let mut end = i;
        while end < lines.len() && in_run(&lines[end]) {
            end += 1;
        }
        let run = &lines[i..end];

        if run.len() < config.prose_block_min_run {
            out.extend(run.iter().cloned().map(|scanned| FilteredLine {
                scanned,
                prose_block: false,
            }));
        } else {
            let average = word_average(run);
            let is_prose = average > config.prose_high_word_average;
            let is_long_noise =
                run.len() >= config.prose_long_run && average < config.prose_low_word_average;

            if is_prose || is_long_noise {
                log::debug!(
                    "dropping {}-line block at line {} (avg {:.1} words)",
                    run.len(),
                    run[0].line.index,
                    average
                );
                stats.prose_blocks_dropped += 1;
                stats.prose_lines_dropped += run.len();
            } else {
                stats.prose_blocks_kept += 1;
                out.extend(run.iter().cloned().map(|scanned| FilteredLine {
                    scanned,
                    prose_block: true,
                }));
            }
        }
        i = end;
    }

    out
}

/// Consecutive-line counters for the truncation rules.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    chapter_run: usize,
    chapter_run_start: usize,
    page_run: usize,
    page_run_start: usize,
    page_lines_seen: usize,
}

impl FilterState {
    /// Feed the line at `pos`; returns the cut position if a rule fires.
    fn step(
        &mut self,
        pos: usize,
        line: &ScannedLine,
        config: &OutlineConfig,
        chapter_rule: bool,
    ) -> Option<(usize, TruncationRule)> {
        let page_numbered = is_page_numbered(line);
        if page_numbered {
            self.page_lines_seen += 1;
        }

        if line.keyword {
            self.chapter_run = 0;
            self.page_run = 0;
            return None;
        }

        if chapter_rule {
            if is_chapter_marker(&line.line.text) {
                self.chapter_run = 0;
            } else {
                if self.chapter_run == 0 {
                    self.chapter_run_start = pos;
                }
                self.chapter_run += 1;
                if self.chapter_run >= config.chapter_marker_run_limit {
                    return Some((self.chapter_run_start, TruncationRule::ChapterMarkers));
                }
            }
        }

        if page_numbered {
            self.page_run = 0;
        } else {
            if self.page_run == 0 {
                self.page_run_start = pos;
            }
            self.page_run += 1;
            if self.page_run >= config.page_number_run_limit
                && self.page_lines_seen >= config.min_page_numbered_lines
            {
                return Some((self.page_run_start, TruncationRule::PageNumbers));
            }
        }

        None
    }
}

fn truncate_runs(
    mut lines: Vec<FilteredLine>,
    config: &OutlineConfig,
    stats: &mut FilterStats,
) -> Vec<FilteredLine> {
    let chapter_rule = lines.len() > config.chapter_rule_min_lines;
    let mut state = FilterState::default();

    for pos in 0..lines.len() {
        if let Some((cut, rule)) = state.step(pos, &lines[pos].scanned, config, chapter_rule) {
            let truncation = Truncation {
                rule,
                at_line: lines[cut].scanned.line.index,
                discarded: lines.len() - cut,
            };
            log::debug!("outline truncated: {:?}", truncation);
            stats.truncation = Some(truncation);
            lines.truncate(cut);
            break;
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::classifier::classify_lines;
    use crate::parser::normalize_lines;

    fn scan(raw: &[&str]) -> Vec<ScannedLine> {
        classify_lines(&normalize_lines(raw))
    }

    fn texts(outcome: &FilterOutcome) -> Vec<&str> {
        outcome
            .lines
            .iter()
            .map(|l| l.scanned.line.text.as_str())
            .collect()
    }

    #[test]
    fn test_skip_lines_dropped() {
        let raw = ["1 Scope 3", "", "***", "62.7", "2 Terms 4"];
        let outcome = filter_noise(scan(&raw), &OutlineConfig::default());
        assert_eq!(texts(&outcome), vec!["1 Scope 3", "2 Terms 4"]);
        assert_eq!(outcome.stats.skipped, 3);
    }

    #[test]
    fn test_plain_line_inside_dot_cluster() {
        let raw = [
            "Foreword ...... 1",
            "Scope ...... 2",
            "scanner smudge text",
            "Terms ...... 3",
            "Symbols ...... 4",
            "Design ...... 5",
        ];
        let outcome = filter_noise(scan(&raw), &OutlineConfig::default());
        assert_eq!(outcome.lines.len(), 5);
        assert!(!texts(&outcome).contains(&"scanner smudge text"));
        assert_eq!(outcome.stats.dot_cluster_dropped, 1);
    }

    #[test]
    fn test_short_dot_cluster_untouched() {
        let raw = [
            "Foreword ...... 1",
            "Scope ...... 2",
            "a plain heading",
            "Terms ...... 3",
        ];
        let outcome = filter_noise(scan(&raw), &OutlineConfig::default());
        assert_eq!(outcome.lines.len(), 4);
    }

    #[test]
    fn test_prose_block_dropped() {
        let mut raw = vec!["1 Introduction 1"];
        let prose = "the committee met several times during the year to discuss it";
        raw.extend(std::iter::repeat(prose).take(8));
        raw.push("2 Results 9");
        let outcome = filter_noise(scan(&raw), &OutlineConfig::default());
        assert_eq!(texts(&outcome), vec!["1 Introduction 1", "2 Results 9"]);
        assert_eq!(outcome.stats.prose_blocks_dropped, 1);
        assert_eq!(outcome.stats.prose_lines_dropped, 8);
    }

    #[test]
    fn test_short_heading_block_kept() {
        let raw = [
            "1 Introduction 1",
            "Background",
            "Motivation",
            "Related Work",
            "Open Problems",
            "Scope",
            "2 Results 9",
        ];
        let outcome = filter_noise(scan(&raw), &OutlineConfig::default());
        assert_eq!(outcome.lines.len(), 7);
        assert!(outcome.lines[1].prose_block);
        assert!(!outcome.lines[0].prose_block);
        assert_eq!(outcome.stats.prose_blocks_kept, 1);
    }

    #[test]
    fn test_chapter_marker_truncation() {
        let config = OutlineConfig {
            chapter_rule_min_lines: 0,
            chapter_marker_run_limit: 3,
            ..Default::default()
        };
        let raw = [
            "Chapter 1 Intro 3",
            "1.1 Alpha 4",
            "Chapter 2 Next 6",
            "2.1 Beta 7",
            "2.2 Gamma 8",
            "2.3 Delta 9",
            "2.4 Epsilon 10",
        ];
        let outcome = filter_noise(scan(&raw), &config);
        assert_eq!(
            texts(&outcome),
            vec!["Chapter 1 Intro 3", "1.1 Alpha 4", "Chapter 2 Next 6"]
        );
        let truncation = outcome.stats.truncation.unwrap();
        assert_eq!(truncation.rule, TruncationRule::ChapterMarkers);
        assert_eq!(truncation.at_line, 3);
        assert_eq!(truncation.discarded, 4);
    }

    #[test]
    fn test_chapter_rule_inactive_for_short_outlines() {
        let config = OutlineConfig {
            chapter_marker_run_limit: 2,
            ..Default::default()
        };
        let raw = ["1 Alpha 4", "2 Beta 7", "3 Gamma 8", "4 Delta 9"];
        let outcome = filter_noise(scan(&raw), &config);
        assert_eq!(outcome.lines.len(), 4);
        assert!(outcome.stats.truncation.is_none());
    }

    #[test]
    fn test_chapter_rule_needs_more_lines_than_threshold() {
        let config = OutlineConfig {
            chapter_rule_min_lines: 4,
            chapter_marker_run_limit: 2,
            ..Default::default()
        };
        let raw = ["1 Alpha 4", "2 Beta 7", "3 Gamma 8", "4 Delta 9"];
        let outcome = filter_noise(scan(&raw), &config);
        assert!(outcome.stats.truncation.is_none());

        let raw = ["1 Alpha 4", "2 Beta 7", "3 Gamma 8", "4 Delta 9", "5 Omega 11"];
        let outcome = filter_noise(scan(&raw), &config);
        assert_eq!(
            outcome.stats.truncation.map(|t| t.rule),
            Some(TruncationRule::ChapterMarkers)
        );
        assert!(outcome.lines.is_empty());
    }

    #[test]
    fn test_page_number_truncation() {
        let config = OutlineConfig {
            min_page_numbered_lines: 3,
            page_number_run_limit: 2,
            ..Default::default()
        };
        let raw = [
            "Alpha 1",
            "Beta 2",
            "Gamma 3",
            "Some heading",
            "Another heading",
            "Delta 4",
        ];
        let outcome = filter_noise(scan(&raw), &config);
        assert_eq!(texts(&outcome), vec!["Alpha 1", "Beta 2", "Gamma 3"]);
        assert_eq!(
            outcome.stats.truncation.map(|t| t.rule),
            Some(TruncationRule::PageNumbers)
        );
    }

    #[test]
    fn test_page_rule_waits_for_minimum() {
        let config = OutlineConfig {
            min_page_numbered_lines: 10,
            page_number_run_limit: 2,
            ..Default::default()
        };
        let raw = ["Alpha 1", "Some heading", "Another heading", "Delta 4"];
        let outcome = filter_noise(scan(&raw), &config);
        assert_eq!(outcome.lines.len(), 4);
    }

    #[test]
    fn test_reset_keyword_restarts_counters() {
        let config = OutlineConfig {
            min_page_numbered_lines: 3,
            page_number_run_limit: 2,
            ..Default::default()
        };
        let raw = [
            "Alpha 1",
            "Beta 2",
            "Gamma 3",
            "Some heading",
            "Appendix",
            "Another heading",
            "Final words",
            "Delta 4",
        ];
        let outcome = filter_noise(scan(&raw), &config);
        assert_eq!(
            texts(&outcome),
            vec!["Alpha 1", "Beta 2", "Gamma 3", "Some heading", "Appendix"]
        );
    }

    #[test]
    fn test_page_numbered_detection() {
        let lines = scan(&["Office 221 005", "Annex iv", "Foreword", "Terms 2-5"]);
        assert!(!is_page_numbered(&lines[0]));
        assert!(is_page_numbered(&lines[1]));
        assert!(!is_page_numbered(&lines[2]));
        assert!(is_page_numbered(&lines[3]));
    }
}
