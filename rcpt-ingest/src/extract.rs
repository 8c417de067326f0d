use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::discover::is_pdf_path;
use crate::normalize::normalize_text;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("{0} is not a PDF")]
    NotPdf(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to extract PDF text: {0}")]
    Pdf(String),
    #[error("no text found in {0} (scanned or image-only PDF?)")]
    Empty(PathBuf),
}

/// Source of plain receipt text for a file on disk.
pub trait TextExtractor: Send + Sync {
    /// Text of all pages, newline separated.
    fn extract_text(&self, path: &Path) -> Result<String, ExtractError>;
}

/// [`TextExtractor`] backed by the `pdf-extract` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
        if !is_pdf_path(path) {
            return Err(ExtractError::NotPdf(path.to_path_buf()));
        }

        let bytes = std::fs::read(path)?;
        let raw = pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|e| ExtractError::Pdf(e.to_string()))?;

        let text = normalize_text(&raw);
        if text.trim().is_empty() {
            return Err(ExtractError::Empty(path.to_path_buf()));
        }
        Ok(text)
    }
}
