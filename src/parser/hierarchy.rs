//! Nesting level assignment.

use crate::model::{NumberingToken, OutlineEntry};

/// Level for entries without a recognizable numbering prefix.
pub const DEFAULT_RAW_LEVEL: u8 = 2;

/// An entry still carrying the numbering token it was classified with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub entry: OutlineEntry,
    pub numbering: Option<NumberingToken>,
}

impl Candidate {
    /// Pair an entry with its numbering token.
    pub fn new(entry: OutlineEntry, numbering: Option<NumberingToken>) -> Self {
        Self { entry, numbering }
    }

    /// Level implied by the numbering token alone.
    pub fn raw_level(&self) -> u8 {
        self.numbering
            .as_ref()
            .map(NumberingToken::raw_level)
            .unwrap_or(DEFAULT_RAW_LEVEL)
    }
}

/// Assign levels with a stack of open raw levels.
///
/// Each raw level pops every open level at or above it before being pushed,
/// and the entry's level is the resulting stack depth. A level is therefore
/// never more than one deeper than the entry before it.
pub fn assign_levels(candidates: Vec<Candidate>) -> Vec<OutlineEntry> {
    let mut stack: Vec<u8> = Vec::new();

    candidates
        .into_iter()
        .map(|candidate| {
            let raw = candidate.raw_level();
            while stack.last().is_some_and(|top| *top >= raw) {
                stack.pop();
            }
            stack.push(raw);
            let depth = stack.len().min(u8::MAX as usize) as u8;
            candidate.entry.with_level(depth)
        })
        .collect()
}
