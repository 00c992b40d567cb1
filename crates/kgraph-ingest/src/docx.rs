//! Plain-text extraction from Office Open XML (`.docx`) documents.

use std::io::{Cursor, Read};

use kgraph_core::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

const DOCUMENT_PART: &str = "word/document.xml";

static PARAGRAPH_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"</w:p>").unwrap());
static TAB_OR_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"<w:(tab|br|cr)\s*/>").unwrap());
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Extract the body text of a `.docx` file, one line per paragraph.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::Input(format!("not a valid docx archive: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| Error::Input(format!("docx is missing {}: {}", DOCUMENT_PART, e)))?
        .read_to_string(&mut xml)?;

    Ok(xml_to_text(&xml))
}

fn xml_to_text(xml: &str) -> String {
    let xml = PARAGRAPH_END.replace_all(xml, "\n");
    let xml = TAB_OR_BREAK.replace_all(&xml, " ");
    let stripped = ANY_TAG.replace_all(&xml, "");

    stripped
        .lines()
        .map(|line| unescape(line.trim()))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn unescape(s: &str) -> String {
    // &amp; last so that "&amp;lt;" stays "&lt;"
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("[Content_Types].xml", options).unwrap();
        writer.write_all(b"<Types/>").unwrap();
        writer.start_file(DOCUMENT_PART, options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraphs_become_lines() {
        let xml = concat!(
            r#"<w:document><w:body>"#,
            r#"<w:p><w:r><w:t>Alice works at Acme.</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Bob manages</w:t></w:r><w:r><w:t xml:space="preserve"> Alice.</w:t></w:r></w:p>"#,
            r#"</w:body></w:document>"#
        );
        let text = extract_text(&build_docx(xml)).unwrap();
        assert_eq!(text, "Alice works at Acme.\nBob manages Alice.");
    }

    #[test]
    fn test_entities_unescaped() {
        let xml = r#"<w:p><w:r><w:t>R&amp;D &lt;team&gt;</w:t></w:r></w:p>"#;
        assert_eq!(xml_to_text(xml), "R&D <team>");
    }

    #[test]
    fn test_not_a_zip() {
        let err = extract_text(b"plain text, not a zip").unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }

    #[test]
    fn test_missing_document_part() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = extract_text(&bytes).unwrap_err();
        assert!(err.to_string().contains("word/document.xml"));
    }
}
