//! Uploaded file text extraction.

use kgraph_core::{Error, Result};
use tracing::debug;

use crate::docx;

/// Extensions the upload widget accepts.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt"];

/// Supported upload types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    PlainText,
    Pdf,
    Docx,
}

impl FileType {
    /// Detect file type from extension. Returns `None` for anything not accepted.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" => Some(Self::PlainText),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    /// Detect file type from a filename such as `notes.TXT`.
    pub fn from_filename(filename: &str) -> Option<Self> {
        std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Extract text from the bytes of an uploaded file.
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String> {
    let file_type = FileType::from_filename(filename).ok_or_else(|| {
        Error::Input(format!(
            "unsupported file type: {} (accepted: {})",
            filename,
            ACCEPTED_EXTENSIONS.join(", ")
        ))
    })?;

    debug!("Extracting {:?} upload {} ({} bytes)", file_type, filename, bytes.len());

    match file_type {
        // PDF bytes are decoded as text as-is; there is no text layer parsing.
        FileType::PlainText | FileType::Pdf => decode_utf8(filename, bytes),
        FileType::Docx => docx::extract_text(bytes),
    }
}

fn decode_utf8(filename: &str, bytes: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::Input(format!("{} is not valid UTF-8: {}", filename, e)))?;
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_detection() {
        assert_eq!(FileType::from_filename("notes.txt"), Some(FileType::PlainText));
        assert_eq!(FileType::from_filename("Report.PDF"), Some(FileType::Pdf));
        assert_eq!(FileType::from_filename("draft.docx"), Some(FileType::Docx));
        assert_eq!(FileType::from_filename("image.png"), None);
        assert_eq!(FileType::from_filename("README"), None);
    }

    #[test]
    fn test_plain_text_decoding() {
        let text = extract_text("a.txt", "\u{feff}Alice works at Acme.".as_bytes()).unwrap();
        assert_eq!(text, "Alice works at Acme.");
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = extract_text("a.txt", &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let err = extract_text("photo.jpg", b"abc").unwrap_err();
        assert!(err.to_string().contains("unsupported file type"));
    }
}
