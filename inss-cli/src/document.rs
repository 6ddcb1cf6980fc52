//! Turns a statement file into plain text.
//!
//! PDFs go through `pdf-extract`; anything else is read as UTF-8 text. The
//! extractor only ever sees the resulting string.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// The document could not be turned into text. Distinct from a document that
/// was read but held no records.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot extract text from PDF '{}': {message}", path.display())]
    PdfExtraction { path: PathBuf, message: String },

    #[error("'{}' contains no text", path.display())]
    NoText { path: PathBuf },
}

/// How a statement file is read, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(OsStr::to_str) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => Self::Pdf,
            _ => Self::PlainText,
        }
    }
}

/// Reads the full text of the statement at `path`.
pub fn load_text(path: &Path) -> Result<String, DocumentError> {
    let kind = DocumentKind::from_path(path);
    debug!(path = %path.display(), ?kind, "reading document");

    let io_error = |source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    };

    let text = match kind {
        DocumentKind::Pdf => {
            let bytes = fs::read(path).map_err(io_error)?;
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
                DocumentError::PdfExtraction {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            })?
        }
        DocumentKind::PlainText => fs::read_to_string(path).map_err(io_error)?,
    };

    if text.trim().is_empty() {
        return Err(DocumentError::NoText {
            path: path.to_path_buf(),
        });
    }

    debug!(chars = text.len(), "document text loaded");
    Ok(text)
}
