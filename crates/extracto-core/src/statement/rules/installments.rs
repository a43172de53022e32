//! Installment column detection ("cuota" NN/NN).

use crate::models::statement::Installment;

use super::patterns::INSTALLMENT;
use super::{ExtractionMatch, FieldExtractor};

/// Detects the `current/total` installment marker in a statement row.
///
/// Only the first `N/N` run is considered. It is accepted when
/// `1 <= current <= total` and `total > 1`; anything else is treated as part
/// of a voucher or reference number and left alone.
pub struct InstallmentMatcher;

impl InstallmentMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Remove an accepted installment marker from `text`.
    ///
    /// Returns the remaining text (trimmed) and the installment, or the
    /// untouched text and `None`.
    pub fn strip(&self, text: &str) -> (String, Option<Installment>) {
        match self.extract(text) {
            Some(m) => {
                let (start, end) = m.position.unwrap_or((0, 0));
                let rest = format!("{}{}", &text[..start], &text[end..]);
                (rest.trim().to_string(), Some(m.value))
            }
            None => (text.trim().to_string(), None),
        }
    }
}

impl Default for InstallmentMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for InstallmentMatcher {
    type Output = ExtractionMatch<Installment>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = INSTALLMENT.captures(text)?;
        let full = caps.get(0)?;
        let current: u8 = caps[1].parse().ok()?;
        let total: u8 = caps[2].parse().ok()?;
        let installment = Installment::new(current, total)?;

        Some(ExtractionMatch::new(installment, full.as_str()).with_position(full.start(), full.end()))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        text.lines().filter_map(|line| self.extract(line)).collect()
    }
}
