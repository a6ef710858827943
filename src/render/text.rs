//! Plain text outline rendering.

use crate::model::OutlineEntry;

use super::{Leader, RenderOptions};

/// Render one entry as a line, without the trailing newline.
///
/// Entries without a page keep the leader and end after it.
pub fn render_entry(entry: &OutlineEntry, options: &RenderOptions) -> String {
    let depth = entry.level.saturating_sub(1) as usize;
    let indent = " ".repeat(depth * options.indent_width);
    let page = entry
        .page_number
        .map(|p| p.to_string())
        .unwrap_or_default();

    match options.leader {
        Leader::Plain => format!("{}{} ...... {}", indent, entry.heading, page),
        Leader::Padded { width } => {
            let used = indent.chars().count() + entry.heading.chars().count() + page.len();
            // Always at least one dot between heading and page.
            let dots = width.saturating_sub(used).max(1);
            format!("{}{}{}{}", indent, entry.heading, ".".repeat(dots), page)
        }
    }
}

/// Render an outline as text, one entry per line.
pub fn to_text(entries: &[OutlineEntry], options: &RenderOptions) -> String {
    let mut output = String::new();
    for entry in entries {
        output.push_str(&render_entry(entry, options));
        output.push('\n');
    }
    output
}
