//! File-backed text sources.

use std::fs;
use std::path::{Path, PathBuf};

use crate::detect::{detect_format_from_bytes, SourceFormat};
use crate::error::{Error, Result};
use crate::model::{split_pages, Outline, SourceDocument};

use super::TextSource;

/// Decode text bytes written by an extraction tool.
///
/// UTF-16 with a BOM (either byte order) and UTF-8 (BOM stripped) are
/// recognized; anything else falls back to Latin-1.
pub fn decode_text(bytes: &[u8]) -> String {
    let utf16: Option<fn([u8; 2]) -> u16> = match bytes {
        [0xFE, 0xFF, ..] => Some(u16::from_be_bytes),
        [0xFF, 0xFE, ..] => Some(u16::from_le_bytes),
        _ => None,
    };
    if let Some(decode) = utf16 {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| decode([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF".as_slice()).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// A document read from disk.
///
/// `.txt`-style files hold extracted text with form-feed page breaks;
/// JSON files hold a serialized [`SourceDocument`]. The format is sniffed
/// from the content, not the extension.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for a path. Nothing is read until used.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<SourceDocument> {
        let bytes = fs::read(&self.path).map_err(|e| {
            Error::SourceUnavailable(format!("{}: {}", self.path.display(), e))
        })?;

        let format = detect_format_from_bytes(&bytes)?;
        log::debug!("{}: {} source", self.path.display(), format);

        let text = decode_text(&bytes);
        match format {
            SourceFormat::PlainText => Ok(SourceDocument {
                name: self.name(),
                pages: split_pages(&text),
                outline: None,
            }),
            SourceFormat::Json => {
                let mut doc: SourceDocument = serde_json::from_str(&text)?;
                if doc.name.is_empty() {
                    doc.name = self.name();
                }
                Ok(doc)
            }
        }
    }
}

impl TextSource for FileSource {
    fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn pages(&self) -> Result<Vec<String>> {
        Ok(self.read()?.pages)
    }

    fn embedded_outline(&self) -> Result<Option<Outline>> {
        Ok(self.read()?.outline)
    }

    fn load(&self) -> Result<SourceDocument> {
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_decode_text_utf8() {
        assert_eq!(decode_text(b"Hello"), "Hello");
        assert_eq!(decode_text(b"\xEF\xBB\xBFHello"), "Hello");
    }

    #[test]
    fn test_decode_text_latin1() {
        // 0xE9 = 'é' in Latin-1
        let bytes = vec![0x48, 0x65, 0x6C, 0x6C, 0xE9];
        assert_eq!(decode_text(&bytes), "Hellé");
    }

    #[test]
    fn test_decode_text_utf16be() {
        // UTF-16BE BOM + "Hi"
        let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text(&bytes), "Hi");
    }

    #[test]
    fn test_utf16le_file() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "Cover\u{000C}Contents".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(&bytes).unwrap();

        let doc = FileSource::new(file.path()).load().unwrap();
        assert_eq!(doc.pages, vec!["Cover", "Contents"]);
    }

    #[test]
    fn test_plain_text_file() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "Cover\u{000C}Contents\n1 Intro 3\u{000C}").unwrap();

        let source = FileSource::new(file.path());
        let doc = source.load().unwrap();
        assert_eq!(doc.pages, vec!["Cover", "Contents\n1 Intro 3"]);
        assert!(doc.outline.is_none());
        assert_eq!(doc.name, source.name());
    }

    #[test]
    fn test_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"pages":["a","b"],"outline":{{"items":[{{"title":"A","page":1}}]}}}}"#
        )
        .unwrap();

        let source = FileSource::new(file.path());
        assert_eq!(source.pages().unwrap().len(), 2);
        let outline = source.embedded_outline().unwrap().unwrap();
        assert_eq!(outline.items[0].title, "A");
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let source = FileSource::new("/nonexistent/untoc/missing.txt");
        assert!(matches!(source.load(), Err(Error::SourceUnavailable(_))));
        assert_eq!(source.name(), "missing");
    }

    #[test]
    fn test_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"pages\": [1, 2").unwrap();
        let source = FileSource::new(file.path());
        assert!(matches!(source.load(), Err(Error::InvalidSource(_))));
    }
}
