//! Source document types supplied by the text extraction layer.

use serde::{Deserialize, Serialize};

/// Page-segmented text of one document, as produced by a text/OCR layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Document name (usually the file stem)
    #[serde(default)]
    pub name: String,

    /// Text of each page, in page order
    #[serde(default)]
    pub pages: Vec<String>,

    /// Outline embedded in the document's own metadata (bookmarks)
    #[serde(default)]
    pub outline: Option<Outline>,
}

impl SourceDocument {
    /// Create a new empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pages: Vec::new(),
            outline: None,
        }
    }

    /// Build a document from a single text blob with form-feed page breaks.
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let mut doc = Self::new(name);
        doc.pages = split_pages(text);
        doc
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, text: impl Into<String>) {
        self.pages.push(text.into());
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All lines of the document, pages concatenated in order.
    pub fn lines(&self) -> Vec<String> {
        self.pages
            .iter()
            .flat_map(|page| page.lines())
            .map(|line| line.to_string())
            .collect()
    }
}

/// Split extracted text into pages on form feed characters.
///
/// Text without any form feed is a single page. A trailing form feed does
/// not produce an empty last page.
pub fn split_pages(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text.split('\u{000C}').map(|p| p.to_string()).collect();
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages
}

/// Document outline (bookmarks embedded in the source metadata).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Outline {
    /// Top-level outline items
    pub items: Vec<OutlineItem>,
}

impl Outline {
    /// Create a new empty outline.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add an item to the outline.
    pub fn add_item(&mut self, item: OutlineItem) {
        self.items.push(item);
    }

    /// Check if the outline is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the total number of items (including nested).
    pub fn total_items(&self) -> usize {
        fn count_items(items: &[OutlineItem]) -> usize {
            items
                .iter()
                .map(|item| 1 + count_items(&item.children))
                .sum()
        }
        count_items(&self.items)
    }

    /// Items in depth-first order.
    pub fn flatten(&self) -> Vec<&OutlineItem> {
        fn walk<'a>(items: &'a [OutlineItem], out: &mut Vec<&'a OutlineItem>) {
            for item in items {
                out.push(item);
                walk(&item.children, out);
            }
        }
        let mut out = Vec::with_capacity(self.total_items());
        walk(&self.items, &mut out);
        out
    }
}

/// A single outline item (bookmark).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineItem {
    /// Item title
    pub title: String,

    /// Target page number (1-indexed)
    #[serde(default)]
    pub page: Option<u32>,

    /// Nesting level (0 = top level)
    #[serde(default)]
    pub level: u8,

    /// Child items
    #[serde(default)]
    pub children: Vec<OutlineItem>,
}

impl OutlineItem {
    /// Create a new outline item.
    pub fn new(title: impl Into<String>, page: Option<u32>, level: u8) -> Self {
        Self {
            title: title.into(),
            page,
            level,
            children: Vec::new(),
        }
    }

    /// Add a child item.
    pub fn add_child(&mut self, child: OutlineItem) {
        self.children.push(child);
    }
}
