//! Data model for outline reconstruction.
//!
//! Source documents arrive as page-segmented text (plus optional embedded
//! bookmarks); the pipeline turns them into a flat list of leveled
//! [`OutlineEntry`] values.

mod document;
mod entry;
mod numbering;

pub use document::{split_pages, Outline, OutlineItem, SourceDocument};
pub use entry::{Line, OutlineEntry};
pub use numbering::{roman_value, NumberingToken};
