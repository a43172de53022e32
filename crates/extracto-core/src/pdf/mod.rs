//! PDF text acquisition.
//!
//! Statements are text PDFs; this module only turns them into a
//! [`DocumentContent`](crate::models::statement::DocumentContent). Scanned
//! statements are detected and reported, never OCR'd.

mod extractor;

pub use extractor::{load_document, PdfExtractor};

use crate::error::PdfError;

/// Type of PDF content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfType {
    /// Contains extractable text.
    Text,
    /// Too little text to be anything but a scan.
    Scanned,
    /// Empty or unreadable.
    Empty,
}

impl PdfType {
    /// Classify by the length of the trimmed extracted text.
    pub fn from_text_len(text_len: usize, min_text_length: usize) -> Self {
        match text_len {
            0 => PdfType::Empty,
            n if n < min_text_length => PdfType::Scanned,
            _ => PdfType::Text,
        }
    }
}

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Classify the PDF by how much text it carries.
    fn analyze(&self, min_text_length: usize) -> PdfType;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;
}
