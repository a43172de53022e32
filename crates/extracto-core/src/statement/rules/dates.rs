//! Date normalization for statement rows, plus the month-name table shared
//! with the upcoming-installments footer.

use chrono::NaiveDate;

use super::patterns::{DATE_TOKEN, LEADING_DATE};
use super::{ExtractionMatch, FieldExtractor};

/// Lowercase month keys: 3-letter abbreviations (Spanish plus the English
/// spellings some issuers print, `Jan`, `Apr`, `Aug`, `Dec`) and full
/// Spanish names as printed in the upcoming-installments footer.
static MONTHS: &[(&str, u32)] = &[
    ("ene", 1),
    ("jan", 1),
    ("enero", 1),
    ("feb", 2),
    ("febrero", 2),
    ("mar", 3),
    ("marzo", 3),
    ("abr", 4),
    ("apr", 4),
    ("abril", 4),
    ("may", 5),
    ("mayo", 5),
    ("jun", 6),
    ("junio", 6),
    ("jul", 7),
    ("julio", 7),
    ("ago", 8),
    ("aug", 8),
    ("agosto", 8),
    ("sep", 9),
    ("set", 9),
    ("septiembre", 9),
    ("setiembre", 9),
    ("oct", 10),
    ("octubre", 10),
    ("nov", 11),
    ("noviembre", 11),
    ("dic", 12),
    ("dec", 12),
    ("diciembre", 12),
];

/// Month number for an abbreviation or full name ("Nov", "ene", "Marzo", "Setiembre").
///
/// The whole token must be a known key; "Decreto" is not December.
pub fn month_number(name: &str) -> Option<u32> {
    let key = name.trim().to_lowercase();
    MONTHS
        .iter()
        .find(|(month_name, _)| *month_name == key)
        .map(|(_, month)| *month)
}

/// Expand a two-digit year to the 2000s.
pub fn normalize_year(year: i32) -> i32 {
    if year < 100 { year + 2000 } else { year }
}

/// Parse `dd-mm-yy(yy)`, `dd-Mmm-yy(yy)` or `dd/mm/yyyy`.
pub fn parse_local_date(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.trim().split(['-', '/']).collect();
    let [day, month, year] = parts.as_slice() else {
        return None;
    };

    let month = if month.chars().all(|c| c.is_ascii_digit()) {
        month.parse().ok()?
    } else {
        month_number(month)?
    };
    if !matches!(year.len(), 2 | 4) || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let day: u32 = day.parse().ok()?;
    let year: i32 = year.parse().ok()?;

    NaiveDate::from_ymd_opt(normalize_year(year), month, day)
}

/// Date field extractor for statement rows.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    /// The date a row starts with, if it is a real calendar date.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        let m = LEADING_DATE.find(text)?;
        let date = parse_local_date(m.as_str())?;
        Some(ExtractionMatch::new(date, m.as_str()).with_position(m.start(), m.end()))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DATE_TOKEN
            .find_iter(text)
            .filter_map(|m| {
                parse_local_date(m.as_str())
                    .map(|date| ExtractionMatch::new(date, m.as_str()).with_position(m.start(), m.end()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_numeric_dates() {
        assert_eq!(parse_local_date("15-10-24"), Some(ymd(2024, 10, 15)));
        assert_eq!(parse_local_date("20/01/2026"), Some(ymd(2026, 1, 20)));
    }

    #[test]
    fn test_parse_month_abbreviations() {
        assert_eq!(parse_local_date("23-Nov-25"), Some(ymd(2025, 11, 23)));
        assert_eq!(parse_local_date("05-ene-26"), Some(ymd(2026, 1, 5)));
        assert_eq!(parse_local_date("01-mar-99"), Some(ymd(2099, 3, 1)));
        assert_eq!(parse_local_date("11-Aug-25"), Some(ymd(2025, 8, 11)));
    }

    #[test]
    fn test_parse_invalid_dates() {
        assert_eq!(parse_local_date("32-01-26"), None);
        assert_eq!(parse_local_date("no-es-fecha"), None);
        assert_eq!(parse_local_date("15-xyz-24"), None);
        assert_eq!(parse_local_date("15-10"), None);
        assert_eq!(parse_local_date("29-02-25"), None);
    }

    #[test]
    fn test_year_must_have_two_or_four_digits() {
        assert_eq!(parse_local_date("15-10-245"), None);
        assert_eq!(parse_local_date("15-10-2"), None);
        assert_eq!(parse_local_date("15-10-02024"), None);
        assert_eq!(parse_local_date("15-10-2024"), Some(ymd(2024, 10, 15)));
    }

    #[test]
    fn test_month_number_full_names() {
        assert_eq!(month_number("Marzo"), Some(3));
        assert_eq!(month_number("Septiembre"), Some(9));
        assert_eq!(month_number("Setiembre"), Some(9));
        assert_eq!(month_number("DICIEMBRE"), Some(12));
        assert_eq!(month_number("de"), None);
        assert_eq!(month_number("Total"), None);
    }

    #[test]
    fn test_month_number_rejects_words_with_month_prefix() {
        assert_eq!(month_number("Decreto"), None);
        assert_eq!(month_number("Marca"), None);
        assert_eq!(month_number("Juntos"), None);
        assert_eq!(month_number("Sept"), None);
        assert_eq!(month_number("ENE"), Some(1));
    }

    #[test]
    fn test_leading_date_extractor() {
        let extractor = DateExtractor::new();

        let m = extractor.extract("23-Nov-25 * MERPAGO*LACOSTEOUTLET").unwrap();
        assert_eq!(m.value, ymd(2025, 11, 23));
        assert_eq!(m.position, Some((0, 9)));

        assert!(extractor.extract("32-01-26 K COMERCIO 100,00").is_none());
        assert!(extractor.extract("TOTAL A PAGAR").is_none());
    }

    #[test]
    fn test_extract_all_dates() {
        let extractor = DateExtractor::new();
        let found = extractor.extract_all("Cierre 26-Feb-26 Vencimiento 09/03/2026 Prox 99-99-99");
        let dates: Vec<NaiveDate> = found.into_iter().map(|m| m.value).collect();
        assert_eq!(dates, vec![ymd(2026, 2, 26), ymd(2026, 3, 9)]);
    }
}
