//! PDF text extraction.
//!
//! Thin wrapper over pdf-extract; layout analysis is left to the library.

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("failed to read PDF file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("input is not a PDF document")]
    NotPdf,
    #[error("failed to extract text from PDF: {0}")]
    ExtractError(String),
}

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Extract the text of every page from an in-memory PDF
pub fn extract_text(bytes: &[u8]) -> Result<String, PdfError> {
    if !looks_like_pdf(bytes) {
        return Err(PdfError::NotPdf);
    }

    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PdfError::ExtractError(e.to_string()))?;
    log::debug!("extracted {} characters from PDF", text.len());

    Ok(text)
}

/// Read a PDF from disk and extract its text
pub fn extract_text_from_path<P: AsRef<Path>>(path: P) -> Result<String, PdfError> {
    let bytes = std::fs::read(path.as_ref())?;
    extract_text(&bytes)
}

/// PDF headers may be preceded by up to 1024 bytes of junk
fn looks_like_pdf(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(1024 + PDF_MAGIC.len())];
    window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}
