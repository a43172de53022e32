//! Statement data models: the text handed to the extractor and the records it produces.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Placeholder used when a line yields no description text.
pub const NO_DESCRIPTION: &str = "Sin descripcion";

/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 80;

/// Text content of a statement document, produced once by the acquisition step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentContent {
    /// Full concatenated text of all pages.
    pub text: String,

    /// Per-page breakdown, when the source provides one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<PageContent>,
}

/// Text and table fragments of a single page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed).
    pub number: u32,

    /// Extracted text from this page.
    pub text: String,

    /// Tables detected on this page, as rows of cells.
    ///
    /// Reserved for producers with table detection. The PDF reader and the
    /// plain-text input leave it empty, and the extractor reads only `text`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<Vec<Vec<String>>>,
}

impl DocumentContent {
    /// Build content from a single block of text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: normalize_newlines(text.into()),
            pages: Vec::new(),
        }
    }

    /// Build content from pages, joining their trimmed text with a blank line.
    pub fn from_pages(pages: Vec<PageContent>) -> Self {
        let text = pages
            .iter()
            .map(|p| p.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        Self {
            text: normalize_newlines(text),
            pages,
        }
    }

    /// True when there is no non-whitespace text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

fn normalize_newlines(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}

/// Direction of a transaction.
///
/// The statement extractor only recognizes charges; `Income` exists for
/// downstream consumers that reclassify payments and refunds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    #[default]
    Expense,
    Income,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
        }
    }
}

/// Installment plan position of a charge ("cuota 3 de 6").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    /// Which payment this line represents (1-based).
    #[serde(rename = "installment_current")]
    pub current: u8,

    /// Total number of payments in the plan.
    #[serde(rename = "installment_total")]
    pub total: u8,

    /// Payments left after this one.
    #[serde(rename = "installments_remaining")]
    pub remaining: u8,
}

impl Installment {
    /// Validate a `current/total` pair.
    ///
    /// Returns `None` unless `1 <= current <= total` and `total > 1`;
    /// `1/1` is a single payment, not a plan.
    pub fn new(current: u8, total: u8) -> Option<Self> {
        if current >= 1 && current <= total && total > 1 {
            Some(Self {
                current,
                total,
                remaining: total - current,
            })
        } else {
            None
        }
    }

    /// True when this is the last payment of the plan.
    pub fn is_last(&self) -> bool {
        self.remaining == 0
    }
}

/// A single line item reconstructed from a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTransaction {
    /// Transaction date.
    pub date: NaiveDate,

    /// Merchant or line label (at most 80 characters, never empty).
    pub description: String,

    /// Absolute amount, always positive.
    pub amount: Decimal,

    /// Transaction direction.
    #[serde(rename = "type", default)]
    pub kind: TransactionKind,

    /// Installment plan metadata, when the line carries a valid `current/total` marker.
    #[serde(flatten)]
    pub installment: Option<Installment>,
}

impl ExtractedTransaction {
    /// Build an expense. The description is stored as given; see [`DescriptionRules`].
    pub fn expense(date: NaiveDate, description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            date,
            description: description.into(),
            amount: amount.abs(),
            kind: TransactionKind::Expense,
            installment: None,
        }
    }

    pub fn with_installment(mut self, installment: Option<Installment>) -> Self {
        self.installment = installment;
        self
    }
}

/// How raw description text is turned into a stored description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionRules {
    /// Maximum length, in characters.
    pub max_len: usize,
    /// Used when nothing is left after trimming.
    pub placeholder: String,
}

impl Default for DescriptionRules {
    fn default() -> Self {
        Self {
            max_len: MAX_DESCRIPTION_LEN,
            placeholder: NO_DESCRIPTION.to_string(),
        }
    }
}

impl DescriptionRules {
    /// Trim and truncate, falling back to the placeholder.
    pub fn apply(&self, raw: &str) -> String {
        let truncated: String = raw.trim().chars().take(self.max_len).collect();
        let truncated = truncated.trim_end();

        if truncated.is_empty() {
            self.placeholder.clone()
        } else {
            truncated.to_string()
        }
    }
}

/// Amount committed for a future month (or from a month onward).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingInstallmentEntry {
    pub year: i32,
    pub month: u32,
    /// Amount recurs indefinitely from this month onward.
    pub open_ended: bool,
    pub amount: Decimal,
}

impl UpcomingInstallmentEntry {
    /// Month key: `"YYYY-MM"`, or `"YYYY-MM+"` for open-ended entries.
    pub fn key(&self) -> String {
        format!(
            "{:04}-{:02}{}",
            self.year,
            self.month,
            if self.open_ended { "+" } else { "" }
        )
    }
}

/// Upcoming installment totals keyed by month, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpcomingInstallments {
    entries: Vec<UpcomingInstallmentEntry>,
}

impl UpcomingInstallments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; an existing key keeps its position and takes the new amount.
    pub fn insert(&mut self, entry: UpcomingInstallmentEntry) {
        let key = entry.key();
        match self.entries.iter_mut().find(|e| e.key() == key) {
            Some(existing) => existing.amount = entry.amount,
            None => self.entries.push(entry),
        }
    }

    /// Amount for a month key such as `"2026-03"` or `"2026-09+"`.
    pub fn get(&self, key: &str) -> Option<Decimal> {
        self.entries.iter().find(|e| e.key() == key).map(|e| e.amount)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UpcomingInstallmentEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all single-month entries (open-ended amounts are excluded).
    pub fn total_fixed(&self) -> Decimal {
        self.entries
            .iter()
            .filter(|e| !e.open_ended)
            .map(|e| e.amount)
            .sum()
    }
}

impl<'a> IntoIterator for &'a UpcomingInstallments {
    type Item = &'a UpcomingInstallmentEntry;
    type IntoIter = std::slice::Iter<'a, UpcomingInstallmentEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for UpcomingInstallments {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.key(), &entry.amount)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_installment_validation() {
        let inst = Installment::new(3, 6).unwrap();
        assert_eq!(inst.remaining, 3);
        assert!(!inst.is_last());

        assert!(Installment::new(12, 12).unwrap().is_last());
        assert_eq!(Installment::new(1, 1), None);
        assert_eq!(Installment::new(0, 6), None);
        assert_eq!(Installment::new(7, 6), None);
    }

    #[test]
    fn test_description_rules() {
        let rules = DescriptionRules::default();
        assert_eq!(rules.apply("  DISNEY PLUS  "), "DISNEY PLUS");
        assert_eq!(rules.apply("   "), NO_DESCRIPTION);
        assert_eq!(rules.apply(&"A".repeat(90)).len(), 80);

        let short = DescriptionRules { max_len: 4, placeholder: "-".to_string() };
        assert_eq!(short.apply("ÑANDÚ CAFÉ"), "ÑAND");
        assert_eq!(short.apply(""), "-");
    }

    #[test]
    fn test_transaction_serializes_flat_installment_fields() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 23).unwrap();
        let tx = ExtractedTransaction::expense(date, "MERPAGO*LACOSTE", dec("10000.00"))
            .with_installment(Installment::new(3, 6));

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["date"], "2025-11-23");
        assert_eq!(json["type"], "expense");
        assert_eq!(json["installment_current"], 3);
        assert_eq!(json["installment_total"], 6);
        assert_eq!(json["installments_remaining"], 3);

        let plain = ExtractedTransaction::expense(date, "SHELL", dec("3200"));
        let json = serde_json::to_value(&plain).unwrap();
        assert!(json.get("installment_current").is_none());
    }

    #[test]
    fn test_upcoming_keys_unique_and_ordered() {
        let mut upcoming = UpcomingInstallments::new();
        upcoming.insert(UpcomingInstallmentEntry { year: 2026, month: 4, open_ended: false, amount: dec("5") });
        upcoming.insert(UpcomingInstallmentEntry { year: 2026, month: 3, open_ended: false, amount: dec("7") });
        upcoming.insert(UpcomingInstallmentEntry { year: 2026, month: 4, open_ended: false, amount: dec("9") });
        upcoming.insert(UpcomingInstallmentEntry { year: 2026, month: 9, open_ended: true, amount: dec("1") });

        assert_eq!(upcoming.keys(), vec!["2026-04", "2026-03", "2026-09+"]);
        assert_eq!(upcoming.get("2026-04"), Some(dec("9")));
        assert_eq!(upcoming.total_fixed(), dec("16"));

        let json = serde_json::to_string(&upcoming).unwrap();
        assert_eq!(json, r#"{"2026-04":"9","2026-03":"7","2026-09+":"1"}"#);
    }

    #[test]
    fn test_document_from_pages() {
        let doc = DocumentContent::from_pages(vec![
            PageContent { number: 1, text: " first page \r\nline two ".to_string(), tables: vec![] },
            PageContent { number: 2, text: "   ".to_string(), tables: vec![] },
            PageContent { number: 3, text: "third".to_string(), tables: vec![] },
        ]);
        assert_eq!(doc.text, "first page \nline two\n\nthird");
        assert_eq!(doc.pages.len(), 3);
        assert!(!doc.is_blank());
        assert!(DocumentContent::from_text("  \n ").is_blank());
    }

    #[test]
    fn test_page_tables_round_trip_and_skip_when_empty() {
        let page = PageContent { number: 1, text: "uno".to_string(), tables: vec![] };
        assert_eq!(serde_json::to_string(&page).unwrap(), r#"{"number":1,"text":"uno"}"#);

        let parsed: PageContent = serde_json::from_str(
            r#"{"number":2,"text":"dos","tables":[[["Fecha","Importe"],["15-10-24","100,00"]]]}"#,
        )
        .unwrap();
        assert_eq!(parsed.tables[0][1], vec!["15-10-24", "100,00"]);

        let doc = DocumentContent::from_pages(vec![parsed]);
        assert_eq!(doc.text, "dos");
    }
}
