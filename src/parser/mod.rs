//! Outline reconstruction pipeline.
//!
//! normalize → locate → classify → filter → assemble → levels → dedup/order

mod classifier;
mod dedup;
mod heading_scan;
mod hierarchy;
mod locator;
mod noise_filter;
mod normalize;
mod options;
mod recovery;
mod toc_parser;

pub use classifier::{
    classify_line, classify_lines, is_reset_keyword, is_skip_line, Classified, Grammar, LineKind,
    ScannedLine,
};
pub use dedup::dedup_and_order;
pub use heading_scan::{is_heading_marker, scan_headings};
pub use hierarchy::{assign_levels, Candidate, DEFAULT_RAW_LEVEL};
pub use locator::{locate_section, SectionStart};
pub use noise_filter::{
    filter_noise, has_dot_run, FilterOutcome, FilterState, FilterStats, FilteredLine, Truncation,
    TruncationRule,
};
pub use normalize::{normalize_line, normalize_lines};
pub use options::OutlineConfig;
pub use recovery::outline_extent;
pub use toc_parser::{ParsedOutline, TocParser};
