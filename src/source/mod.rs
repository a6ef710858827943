//! Text source abstraction layer.
//!
//! Provides a trait-based interface to whatever extracts text from the
//! original documents (a PDF text layer, OCR output, a cache on disk),
//! isolating it from outline reconstruction.

mod file;

pub use file::{decode_text, FileSource};

use crate::error::Result;
use crate::model::{Outline, SourceDocument};

/// Abstract interface to page-segmented document text.
///
/// Implementations must be usable from several threads at once; the batch
/// driver shares sources across rayon workers.
pub trait TextSource: Send + Sync {
    /// Document name used in logs and reports.
    fn name(&self) -> String;

    /// Text of every page, in order.
    ///
    /// Fails with [`crate::Error::SourceUnavailable`] when no text can be
    /// produced.
    fn pages(&self) -> Result<Vec<String>>;

    /// Bookmarks embedded in the document's own metadata, if any.
    fn embedded_outline(&self) -> Result<Option<Outline>> {
        Ok(None)
    }

    /// Load pages and outline into one document.
    fn load(&self) -> Result<SourceDocument> {
        Ok(SourceDocument {
            name: self.name(),
            pages: self.pages()?,
            outline: self.embedded_outline()?,
        })
    }
}

/// A source held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    document: SourceDocument,
}

impl MemorySource {
    /// Wrap an already loaded document.
    pub fn new(document: SourceDocument) -> Self {
        Self { document }
    }

    /// Build from a text blob with form-feed page breaks.
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::new(SourceDocument::from_text(name, text))
    }

    /// Attach an embedded outline.
    pub fn with_outline(mut self, outline: Outline) -> Self {
        self.document.outline = Some(outline);
        self
    }

    /// Borrow the wrapped document.
    pub fn document(&self) -> &SourceDocument {
        &self.document
    }
}

impl From<SourceDocument> for MemorySource {
    fn from(document: SourceDocument) -> Self {
        Self::new(document)
    }
}

impl TextSource for MemorySource {
    fn name(&self) -> String {
        self.document.name.clone()
    }

    fn pages(&self) -> Result<Vec<String>> {
        Ok(self.document.pages.clone())
    }

    fn embedded_outline(&self) -> Result<Option<Outline>> {
        Ok(self.document.outline.clone())
    }

    fn load(&self) -> Result<SourceDocument> {
        Ok(self.document.clone())
    }
}
