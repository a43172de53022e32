//! Line classification for the detail-section scan.

use super::patterns::{DETAIL_BANNER, FINANCIAL_CHARGE, SECTION_CLOSER};

/// What a single statement line means to the section scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Empty or whitespace only.
    Blank,
    /// Opens the itemized consumption list ("DETALLE DEL CONSUMO").
    Banner,
    /// Ends the list: totals, stamp tax, financing interest, per-card subtotal,
    /// the upcoming-installments footer.
    Closer,
    /// Financial charge inside the list (tax, interest, VAT, commission); skipped.
    Noise,
    /// Anything else; may be a charge row.
    Candidate,
}

/// Classify one line. Stateless: the scanner decides what each class means
/// in its current state.
pub fn classify_line(line: &str) -> LineClass {
    let line = line.trim();

    if line.is_empty() {
        LineClass::Blank
    } else if DETAIL_BANNER.is_match(line) {
        LineClass::Banner
    } else if SECTION_CLOSER.is_match(line) {
        LineClass::Closer
    } else if FINANCIAL_CHARGE.is_match(line) {
        LineClass::Noise
    } else {
        LineClass::Candidate
    }
}
