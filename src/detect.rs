//! Source format detection.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Format of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Extracted text, pages separated by form feeds
    PlainText,
    /// A serialized source document with pages and optional outline
    Json,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::PlainText => write!(f, "plain text"),
            SourceFormat::Json => write!(f, "JSON"),
        }
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const UTF16BE_BOM: &[u8] = b"\xFE\xFF";
const UTF16LE_BOM: &[u8] = b"\xFF\xFE";
const SNIFF_LEN: usize = 1024;

/// Detect the source format of a file from its leading bytes.
///
/// # Example
/// ```no_run
/// use untoc::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("report.txt").unwrap();
/// println!("format: {}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<SourceFormat> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    BufReader::new(file)
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the source format from leading bytes.
///
/// Binary content, raw PDF included, is [`Error::UnknownFormat`]: text must
/// come from an external extraction layer first.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<SourceFormat> {
    if data.starts_with(UTF16BE_BOM) || data.starts_with(UTF16LE_BOM) {
        return Ok(SourceFormat::PlainText);
    }
    if data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let head = &data[..data.len().min(SNIFF_LEN)];
    if head.contains(&0) {
        return Err(Error::UnknownFormat);
    }

    match head.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => Ok(SourceFormat::Json),
        _ => Ok(SourceFormat::PlainText),
    }
}

/// Check if a file can be used as a source.
pub fn is_supported<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}
