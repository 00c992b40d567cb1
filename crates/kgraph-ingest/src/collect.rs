//! Input collector: produce one text string from an upload or a text entry.

use kgraph_core::Result;
use serde::Serialize;
use tracing::debug;

use crate::file;

/// Where the input text comes from.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// An uploaded document.
    Upload { filename: String, bytes: Vec<u8> },
    /// Text typed directly into the form.
    Text(String),
}

impl InputSource {
    /// Short tag for logs and document metadata.
    pub fn kind(&self) -> InputKind {
        match self {
            Self::Upload { .. } => InputKind::Upload,
            Self::Text(_) => InputKind::Text,
        }
    }

    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::Upload { filename, .. } => Some(filename),
            Self::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Upload,
    Text,
}

/// Collect the text for one generation request.
///
/// Returns `Ok(None)` when there is nothing to generate from (no file content,
/// or only whitespace). Callers treat that as "action not available yet".
pub fn collect(source: InputSource) -> Result<Option<String>> {
    let text = match source {
        InputSource::Upload { filename, bytes } => {
            if bytes.is_empty() {
                debug!("Empty upload: {}", filename);
                return Ok(None);
            }
            file::extract_text(&filename, &bytes)?
        }
        InputSource::Text(text) => text,
    };

    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(text))
}
