//! Upcoming installments footer ("Cuotas a vencer: Marzo/26 $10.000,00 ...").
//!
//! Each `<month>/<year> $<amount>` run is read as one unit, so a missing
//! month or amount never shifts the remaining pairs.

use std::ops::Range;

use tracing::{debug, trace};

use crate::models::statement::{UpcomingInstallmentEntry, UpcomingInstallments};

use super::rules::patterns::{UPCOMING_BLOCK, UPCOMING_MONTH_AMOUNT, UPCOMING_OPEN_ENDED};
use super::rules::{month_number, normalize_year, parse_amount};

/// Extract future installment totals by month. Empty when the block is absent.
pub fn extract_upcoming(text: &str) -> UpcomingInstallments {
    let mut upcoming = UpcomingInstallments::new();

    let Some(block) = UPCOMING_BLOCK.captures(text).and_then(|c| c.get(1)) else {
        trace!("No upcoming installments block");
        return upcoming;
    };
    let block = block.as_str();

    let mut found: Vec<(usize, UpcomingInstallmentEntry)> = Vec::new();
    let mut open_spans: Vec<Range<usize>> = Vec::new();

    for caps in UPCOMING_OPEN_ENDED.captures_iter(block) {
        let span = caps.get(0).map(|m| m.range()).unwrap_or_default();
        open_spans.push(span.clone());
        if let Some(entry) = build_entry(&caps[1], &caps[2], &caps[3], true) {
            found.push((span.start, entry));
        }
    }

    for caps in UPCOMING_MONTH_AMOUNT.captures_iter(block) {
        let Some(m) = caps.get(0) else { continue };
        if open_spans.iter().any(|s| s.start < m.end() && m.start() < s.end) {
            continue;
        }
        if let Some(entry) = build_entry(&caps[1], &caps[2], &caps[3], false) {
            found.push((m.start(), entry));
        }
    }

    found.sort_by_key(|(start, _)| *start);
    for (_, entry) in found {
        upcoming.insert(entry);
    }

    debug!("Found {} upcoming installment months", upcoming.len());
    upcoming
}

fn build_entry(
    month: &str,
    year: &str,
    amount: &str,
    open_ended: bool,
) -> Option<UpcomingInstallmentEntry> {
    let month = month_number(month)?;
    let year = normalize_year(year.parse().ok()?);
    let amount = parse_amount(amount)?;

    Some(UpcomingInstallmentEntry {
        year,
        month,
        open_ended,
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_two_months() {
        let upcoming =
            extract_upcoming("Cuotas a vencer: Marzo/26 $10.000,00 Abril/26 $10.000,00");

        assert_eq!(upcoming.keys(), vec!["2026-03", "2026-04"]);
        assert_eq!(upcoming.get("2026-03"), Some(dec("10000")));
        assert_eq!(upcoming.get("2026-04"), Some(dec("10000")));
    }

    #[test]
    fn test_open_ended_only_under_plus_key() {
        let upcoming = extract_upcoming("Cuotas a vencer: A partir de Septiembre/26 $56.663,00");

        assert_eq!(upcoming.keys(), vec!["2026-09+"]);
        assert_eq!(upcoming.get("2026-09+"), Some(dec("56663")));
        assert!(!upcoming.contains_key("2026-09"));
        assert_eq!(upcoming.total_fixed(), Decimal::ZERO);
    }

    #[test]
    fn test_months_then_open_ended_keep_order() {
        let text = "Cuotas a vencer: Marzo/26 $149.999,08  Abril/26 $149.999,08\n\
                    A partir de Setiembre/26 $56.663,00";
        let upcoming = extract_upcoming(text);

        assert_eq!(upcoming.keys(), vec!["2026-03", "2026-04", "2026-09+"]);
        assert_eq!(upcoming.get("2026-03"), Some(dec("149999.08")));
        assert_eq!(upcoming.total_fixed(), dec("299998.16"));
    }

    #[test]
    fn test_three_months_four_digit_year() {
        let text = "Cuotas a vencer: Marzo/2026 $5.000,00  Abril/2026 $5.000,00  Mayo/2026 $5.000,00";
        let upcoming = extract_upcoming(text);

        assert_eq!(upcoming.len(), 3);
        assert_eq!(upcoming.keys(), vec!["2026-03", "2026-04", "2026-05"]);
    }

    #[test]
    fn test_missing_amount_does_not_shift_pairs() {
        let text = "Cuotas a vencer: Marzo/26 Abril/26 $2.000,00 Mayo/26 $3.000,00";
        let upcoming = extract_upcoming(text);

        assert!(!upcoming.contains_key("2026-03"));
        assert_eq!(upcoming.get("2026-04"), Some(dec("2000")));
        assert_eq!(upcoming.get("2026-05"), Some(dec("3000")));
    }

    #[test]
    fn test_block_ends_at_blank_line() {
        let text = "Cuotas a vencer: Marzo/26 $1.000,00\n\nJunio/26 $9.000,00";
        let upcoming = extract_upcoming(text);

        assert_eq!(upcoming.keys(), vec!["2026-03"]);
    }

    #[test]
    fn test_unknown_month_skipped() {
        let upcoming = extract_upcoming("Cuotas a vencer: Foo/26 $1.000,00 Junio/26 $2,00");
        assert_eq!(upcoming.keys(), vec!["2026-06"]);
    }

    #[test]
    fn test_words_starting_like_months_are_not_months() {
        let upcoming =
            extract_upcoming("Cuotas a vencer: Decreto/26 $1,00 Marca/26 $2,00 Octubre/26 $3,00");
        assert_eq!(upcoming.keys(), vec!["2026-10"]);
    }

    #[test]
    fn test_absent_block() {
        assert!(extract_upcoming("Texto sin cuotas pendientes").is_empty());
        assert!(extract_upcoming("").is_empty());
    }
}
