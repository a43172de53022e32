//! Relaxed whole-text scan for statements without a recognizable detail section.
//!
//! Trades precision for recall: any `date ... amount` run at the end of a line
//! becomes a row, unless the line is a banner, a total or a financial charge.
//! Never yields installment metadata.

use tracing::{debug, trace};

use crate::models::statement::{DescriptionRules, ExtractedTransaction};

use super::rules::patterns::{DATE_TOKEN, FALLBACK_ROW, TRAILING_AMOUNT};
use super::rules::{classify_line, parse_amount, parse_local_date, LineClass};

/// Scan the full text for `date <3-50 chars> amount` rows.
pub fn fallback_scan(text: &str, description: &DescriptionRules) -> Vec<ExtractedTransaction> {
    let mut results = Vec::new();

    for caps in FALLBACK_ROW.captures_iter(text) {
        let Some(row) = caps.get(0) else { continue };
        let line = source_line(text, row.start(), row.end());
        if !matches!(classify_line(line), LineClass::Candidate) {
            trace!("fallback: skipping non-charge line {:?}", line);
            continue;
        }

        let Some(date) = parse_local_date(&caps[1]) else {
            trace!("fallback: bad date {:?}", &caps[1]);
            continue;
        };

        let amount = match parse_amount(&caps[2]) {
            Some(amount) if !amount.is_zero() => amount,
            _ => {
                trace!("fallback: bad amount {:?}", &caps[2]);
                continue;
            }
        };

        let without_dates = DATE_TOKEN.replace_all(row.as_str(), "");
        let raw_description = TRAILING_AMOUNT.replace(&without_dates, "");

        results.push(ExtractedTransaction::expense(
            date,
            description.apply(&raw_description),
            amount,
        ));
    }

    debug!("Fallback scan found {} rows", results.len());
    results
}

/// The full line of `text` containing the byte range `start..end`.
fn source_line(text: &str, start: usize, end: usize) -> &str {
    let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[end..].find('\n').map_or(text.len(), |i| end + i);
    &text[line_start..line_end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_fallback_finds_rows_anywhere() {
        let text = "Movimientos del mes\n\
                    15-10-24 SUPERMERCADO ABC 5.000,00\n\
                    Saldo anterior 12.000,00\n\
                    03/11/2024 FARMACIA 123 750,50\n";

        let rows = fallback_scan(text, &DescriptionRules::default());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 10, 15).unwrap());
        assert_eq!(rows[0].description, "SUPERMERCADO ABC");
        assert_eq!(rows[0].amount, Decimal::from_str("5000").unwrap());
        assert_eq!(rows[1].description, "FARMACIA 123");
        assert_eq!(rows[1].amount, Decimal::from_str("750.50").unwrap());
        assert!(rows.iter().all(|r| r.installment.is_none()));
    }

    #[test]
    fn test_fallback_drops_bad_dates_and_zero_amounts() {
        let text = "32-01-26 COMERCIO UNO 100,00\n15-01-26 COMERCIO DOS 0,00\n";
        assert!(fallback_scan(text, &DescriptionRules::default()).is_empty());
    }

    #[test]
    fn test_fallback_skips_totals_and_charges() {
        let text = "Resumen\n\
                    15-10-24 SUPERMERCADO ABC 5.000,00\n\
                    Vencimiento 09-03-26 TOTAL A PAGAR $ 31.822,50\n\
                    16-10-24 IMPUESTO PAIS 100,00\n\
                    17-10-24 INTERESES FINANCIACION 1.200,00\n\
                    18-10-24 FARMACIA CENTRAL 750,00";

        let rows = fallback_scan(text, &DescriptionRules::default());

        let descriptions: Vec<&str> = rows.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(descriptions, vec!["SUPERMERCADO ABC", "FARMACIA CENTRAL"]);
    }

    #[test]
    fn test_fallback_ignores_iso_dates() {
        let rows = fallback_scan("Mov\n2024-10-15 COMERCIO UNO 100,00", &DescriptionRules::default());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_source_line() {
        let text = "uno\ndos tres\ncuatro";
        assert_eq!(source_line(text, 8, 12), "dos tres");
        assert_eq!(source_line(text, 0, 3), "uno");
        assert_eq!(source_line(text, 14, 19), "cuatro");
    }

    #[test]
    fn test_fallback_empty_text() {
        assert!(fallback_scan("", &DescriptionRules::default()).is_empty());
    }
}
