//! PDF text extraction using lopdf and pdf-extract.

use std::path::Path;

use lopdf::Document;
use tracing::{debug, warn};

use super::{PdfProcessor, PdfType, Result};
use crate::error::PdfError;
use crate::models::config::PdfConfig;
use crate::models::statement::{DocumentContent, PageContent};

/// PDF text extractor.
///
/// lopdf owns the document structure and per-page text; pdf-extract
/// produces the full text, which keeps row layout better on statements.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Extract the document text, reading at most `max_pages` pages (0 = all).
    ///
    /// With all pages selected the full text comes from pdf-extract; with a
    /// page limit it is rebuilt from the selected pages.
    pub fn extract_content(&self, max_pages: usize) -> Result<DocumentContent> {
        let page_count = self.page_count();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        let limit = match max_pages {
            0 => page_count,
            n => page_count.min(n as u32),
        };

        let pages: Vec<PageContent> = (1..=limit)
            .map(|number| PageContent {
                number,
                text: self.extract_page_text(number).unwrap_or_else(|e| {
                    warn!("Could not extract text from page {}: {}", number, e);
                    String::new()
                }),
                tables: Vec::new(),
            })
            .collect();

        if limit < page_count {
            debug!("Reading {} of {} pages", limit, page_count);
            return Ok(DocumentContent::from_pages(pages));
        }

        let text = match self.extract_text() {
            Ok(text) => text,
            Err(e) => {
                warn!("Full-text extraction failed, joining page text: {}", e);
                return Ok(DocumentContent::from_pages(pages));
            }
        };

        let mut content = DocumentContent::from_text(text);
        content.pages = pages;
        Ok(content)
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Bank statements are often "encrypted" with an empty user password
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn analyze(&self, min_text_length: usize) -> PdfType {
        if self.document.is_none() {
            return PdfType::Empty;
        }

        let text_len = self
            .extract_text()
            .map(|t| t.trim().len())
            .unwrap_or(0);

        let pdf_type = PdfType::from_text_len(text_len, min_text_length);

        debug!("PDF analysis: {} chars text -> {:?}", text_len, pdf_type);
        pdf_type
    }

    fn extract_text(&self) -> Result<String> {
        if self.raw_data.is_empty() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self.document()?;
        if !doc.get_pages().contains_key(&page) {
            return Err(PdfError::InvalidPage(page));
        }

        doc.extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

/// Read a statement PDF from disk and extract its text.
///
/// The text is extracted once and classified afterwards. Fails with
/// [`PdfError::TextExtraction`] when the PDF has too little text to be a
/// text statement.
pub fn load_document(path: &Path, config: &PdfConfig) -> crate::Result<DocumentContent> {
    let data = std::fs::read(path)?;

    let mut extractor = PdfExtractor::new();
    extractor.load(&data)?;

    let content = extractor.extract_content(config.max_pages)?;
    let text_len = content.text.trim().len();
    let pdf_type = PdfType::from_text_len(text_len, config.min_text_length);
    debug!("PDF analysis: {} chars text -> {:?}", text_len, pdf_type);

    if pdf_type != PdfType::Text {
        return Err(PdfError::TextExtraction(format!(
            "{} looks like a {:?} PDF with no usable text",
            path.display(),
            pdf_type
        ))
        .into());
    }

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn single_page_pdf(line: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(line)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert_eq!(extractor.analyze(50), PdfType::Empty);
        assert!(extractor.extract_content(0).is_err());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut extractor = PdfExtractor::new();
        let err = extractor.load(b"not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_load_generated_pdf() {
        let mut extractor = PdfExtractor::new();
        extractor
            .load(&single_page_pdf("DETALLE DEL CONSUMO"))
            .unwrap();

        assert_eq!(extractor.page_count(), 1);
        assert!(matches!(
            extractor.extract_page_text(2),
            Err(PdfError::InvalidPage(2))
        ));
    }

    #[test]
    fn test_pdf_type_from_text_len() {
        assert_eq!(PdfType::from_text_len(0, 50), PdfType::Empty);
        assert_eq!(PdfType::from_text_len(12, 50), PdfType::Scanned);
        assert_eq!(PdfType::from_text_len(50, 50), PdfType::Text);
        assert_eq!(PdfType::from_text_len(1, 0), PdfType::Text);
    }

    #[test]
    fn test_load_document_missing_file() {
        let err = load_document(Path::new("/nonexistent/statement.pdf"), &PdfConfig::default())
            .unwrap_err();
        assert!(matches!(err, crate::error::ExtractoError::Io(_)));
    }
}
