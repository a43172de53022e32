//! Section-aware statement parser.
//!
//! Walks the statement line by line. Rows are only considered between a
//! "DETALLE DEL CONSUMO" banner and the next closing marker; each candidate
//! row goes through [`StructuredStatementParser::parse_line`]. When no row
//! is found that way, the whole text is handed to the fallback scan.

use std::time::Instant;

use tracing::{debug, info, trace};

use crate::models::config::ExtractionConfig;
use crate::models::statement::{
    DescriptionRules, DocumentContent, ExtractedTransaction, UpcomingInstallments,
};

use super::fallback::fallback_scan;
use super::rules::{
    classify_line,
    patterns::{CARD_MARKER, TRAILING_VOUCHER},
    AmountExtractor, DateExtractor, FieldExtractor, InstallmentMatcher, LineClass,
};
use super::upcoming::extract_upcoming;
use super::{ExtractionResult, ExtractionStrategy, StatementParser};

/// One row seen by the scanner.
#[derive(Debug, Clone, Copy)]
pub struct ParsedLine<'a> {
    /// 1-based line number in the document text.
    pub number: usize,
    /// Trimmed line text.
    pub text: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    OutsideDetail,
    InsideDetail,
}

/// Parser for card statements with a detail section.
#[derive(Debug, Clone)]
pub struct StructuredStatementParser {
    description: DescriptionRules,
    enable_fallback: bool,
    extract_upcoming: bool,
}

impl StructuredStatementParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self {
            description: DescriptionRules::default(),
            enable_fallback: true,
            extract_upcoming: true,
        }
    }

    /// Create a parser from the extraction section of the config file.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_max_description_len(config.max_description_len)
            .with_placeholder_description(&config.placeholder_description)
            .with_fallback(config.enable_fallback)
            .with_upcoming(config.extract_upcoming)
    }

    /// Set the maximum description length (characters).
    pub fn with_max_description_len(mut self, max_len: usize) -> Self {
        self.description.max_len = max_len;
        self
    }

    /// Set the description used when a row has none.
    pub fn with_placeholder_description(mut self, placeholder: &str) -> Self {
        self.description.placeholder = placeholder.to_string();
        self
    }

    /// Enable or disable the whole-text fallback scan.
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.enable_fallback = enabled;
        self
    }

    /// Enable or disable upcoming-installment extraction.
    pub fn with_upcoming(mut self, enabled: bool) -> Self {
        self.extract_upcoming = enabled;
        self
    }

    /// Scan detail sections and parse every candidate row inside them.
    pub fn scan_detail_sections(&self, text: &str) -> Vec<ExtractedTransaction> {
        let mut state = ScanState::OutsideDetail;
        let mut transactions = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = ParsedLine {
                number: idx + 1,
                text: raw.trim(),
            };

            match (classify_line(line.text), state) {
                (LineClass::Blank, _) => {}
                (LineClass::Banner, _) => {
                    trace!("line {}: detail section starts", line.number);
                    state = ScanState::InsideDetail;
                }
                (LineClass::Closer, ScanState::InsideDetail) => {
                    trace!("line {}: detail section ends: {}", line.number, line.text);
                    state = ScanState::OutsideDetail;
                }
                (LineClass::Noise, ScanState::InsideDetail) => {
                    trace!("line {}: skipping financial charge: {}", line.number, line.text);
                }
                (LineClass::Candidate, ScanState::InsideDetail) => {
                    match self.parse_line(line.text) {
                        Some(tx) => transactions.push(tx),
                        None => trace!("line {}: not a charge row: {}", line.number, line.text),
                    }
                }
                (_, ScanState::OutsideDetail) => {}
            }
        }

        transactions
    }

    /// Parse a single detail row, e.g.
    ///
    /// ```text
    /// 15-10-24 * MERPAGO*IVMACOGLOBALGROUP 12/12 664719 3.423,50
    /// 23-Nov-25 * MERPAGO*LACOSTEOUTLET 03/06 001298 10.000,00
    /// 20-01-26 K DISNEY PLUS 052084 18.399,00
    /// ```
    ///
    /// Returns `None` for anything that is not a dated row with a positive amount.
    pub fn parse_line(&self, line: &str) -> Option<ExtractedTransaction> {
        let line = line.trim();

        let date = DateExtractor::new().extract(line)?;
        let (_, date_end) = date.position?;

        let rest = line[date_end..].trim();
        let rest = CARD_MARKER.replace(rest, "");

        let (rest, installment) = InstallmentMatcher::new().strip(&rest);

        let amount = AmountExtractor::new().extract(&rest)?;
        if amount.value.is_sign_negative() || amount.value.is_zero() {
            return None;
        }
        let (amount_start, _) = amount.position?;

        let description = TRAILING_VOUCHER.replace(rest[..amount_start].trim(), "");
        let description = self.description.apply(&description);

        Some(
            ExtractedTransaction::expense(date.value, description, amount.value)
                .with_installment(installment),
        )
    }
}

impl Default for StructuredStatementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementParser for StructuredStatementParser {
    fn parse(&self, content: &DocumentContent) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing statement from {} characters of text", content.text.len());

        let mut transactions = self.scan_detail_sections(&content.text);
        let mut strategy = ExtractionStrategy::Structured;

        if transactions.is_empty() {
            if self.enable_fallback {
                debug!("No rows in a detail section, running fallback scan");
                transactions = fallback_scan(&content.text, &self.description);
                strategy = ExtractionStrategy::Fallback;
                if !transactions.is_empty() {
                    warnings.push(
                        "No detail section found; rows come from the relaxed scan and may be noisy"
                            .to_string(),
                    );
                }
            } else {
                debug!("No rows in a detail section and fallback is disabled");
            }
        }

        if transactions.is_empty() {
            strategy = ExtractionStrategy::Empty;
            warnings.push("Could not extract any transaction".to_string());
        }

        let upcoming = if self.extract_upcoming {
            extract_upcoming(&content.text)
        } else {
            UpcomingInstallments::new()
        };

        debug!(
            "Extracted {} transactions ({:?}) and {} upcoming months",
            transactions.len(),
            strategy,
            upcoming.len()
        );

        ExtractionResult {
            transactions,
            upcoming,
            strategy,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}
