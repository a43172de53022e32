//! Amount normalization for Argentine-formatted statements.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::TRAILING_AMOUNT;
use super::{ExtractionMatch, FieldExtractor};

/// Extracts the amount printed at the end of a statement row.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    /// The trailing amount token, if present and numeric.
    ///
    /// A zero amount is returned as a match; rejecting it is the caller's call.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = TRAILING_AMOUNT.captures(text)?;
        let token = caps.get(1)?;
        let amount = parse_amount(token.as_str())?;

        Some(ExtractionMatch::new(amount, token.as_str()).with_position(token.start(), token.end()))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        text.lines().filter_map(|line| self.extract(line)).collect()
    }
}

/// Parse a statement amount ("3.423,50", "1234,56", "1234.56", "$5.000,00").
///
/// Always returns the absolute value: a leading minus on these statements is
/// presentational. Returns `None` when the token is not numeric, which is
/// distinct from a parsed zero.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | '-' | '+') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.') {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // 3.423,50: period groups thousands, comma is the decimal point
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        // 3,423.50: comma groups thousands
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    Decimal::from_str(&normalized).ok().map(|d| d.abs())
}

/// Format an amount in Argentine style (3.423,50).
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some(parts) => parts,
        None => return s,
    };

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    if amount.is_sign_negative() && !amount.is_zero() {
        format!("-{},{}", formatted, decimal_part)
    } else {
        format!("{},{}", formatted, decimal_part)
    }
}
