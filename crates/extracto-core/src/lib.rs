//! Core library for Argentine credit card statement extraction.
//!
//! This crate provides:
//! - Statement text acquisition from PDF (`pdf` feature)
//! - Amount and date normalization for local statement formats
//! - Section-aware transaction extraction with a relaxed fallback scan
//! - Installment plan detection and the upcoming installments summary

pub mod error;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod statement;

pub use error::{ExtractoError, PdfError, Result};
pub use models::config::{ExtractionConfig, ExtractoConfig, PdfConfig};
pub use models::statement::{
    DescriptionRules, DocumentContent, ExtractedTransaction, Installment, PageContent,
    TransactionKind, UpcomingInstallmentEntry, UpcomingInstallments,
};
#[cfg(feature = "pdf")]
pub use pdf::{load_document, PdfExtractor, PdfProcessor, PdfType};
pub use statement::{
    extract_transactions, extract_upcoming_installments, ExtractionResult, ExtractionStrategy,
    StatementParser, StructuredStatementParser,
};
