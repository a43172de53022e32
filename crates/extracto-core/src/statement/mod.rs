//! Card statement transaction extraction.

mod fallback;
mod parser;
mod upcoming;
pub mod rules;

pub use fallback::fallback_scan;
pub use parser::{ParsedLine, StructuredStatementParser};
pub use upcoming::extract_upcoming;

use serde::Serialize;

use crate::models::statement::{DocumentContent, ExtractedTransaction, UpcomingInstallments};

/// Which strategy produced the transactions of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    /// Rows came from detail sections.
    Structured,
    /// No detail section rows; rows came from the relaxed whole-text scan.
    Fallback,
    /// Neither strategy found anything.
    Empty,
}

/// Result of statement extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Extracted transactions, in document order.
    pub transactions: Vec<ExtractedTransaction>,
    /// Upcoming installment totals by month.
    pub upcoming: UpcomingInstallments,
    pub strategy: ExtractionStrategy,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for statement parsing.
pub trait StatementParser {
    /// Parse a statement. Never fails; an empty result is a valid outcome.
    fn parse(&self, content: &DocumentContent) -> ExtractionResult;
}

/// Extract transactions with default settings: detail sections first, then
/// the relaxed scan when they yield nothing.
pub fn extract_transactions(content: &DocumentContent) -> Vec<ExtractedTransaction> {
    StructuredStatementParser::new()
        .with_upcoming(false)
        .parse(content)
        .transactions
}

/// Extract the upcoming installments footer. Empty when absent.
pub fn extract_upcoming_installments(content: &DocumentContent) -> UpcomingInstallments {
    extract_upcoming(&content.text)
}
