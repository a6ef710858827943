//! Duplicate removal and ordering.

use std::collections::HashMap;

use crate::model::OutlineEntry;

/// Remove duplicate `(heading, page)` pairs, then order by page and heading.
///
/// Entries arrive leveled in document order. The last occurrence of a
/// duplicate wins, level included, but takes the position of the first.
/// Sorting by page then heading does not recover true document order when
/// several entries share a page; `preserve_order` skips the sort.
pub fn dedup_and_order(entries: Vec<OutlineEntry>, preserve_order: bool) -> Vec<OutlineEntry> {
    let mut positions: HashMap<(String, Option<u32>), usize> = HashMap::new();
    let mut unique: Vec<OutlineEntry> = Vec::with_capacity(entries.len());

    for entry in entries {
        let key = (entry.heading.clone(), entry.page_number);
        match positions.get(&key) {
            Some(&pos) => unique[pos] = entry,
            None => {
                positions.insert(key, unique.len());
                unique.push(entry);
            }
        }
    }

    if !preserve_order {
        unique.sort_by(|a, b| {
            let a_key = (a.page_number.unwrap_or(0), &a.heading);
            let b_key = (b.page_number.unwrap_or(0), &b.heading);
            a_key.cmp(&b_key)
        });
    }

    unique
}
