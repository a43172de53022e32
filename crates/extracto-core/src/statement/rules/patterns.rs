//! Common regex patterns for card statement extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Dates: dd-mm-yy, dd-Mmm-yy, dd/mm/yyyy (anchored at line start)
    pub static ref LEADING_DATE: Regex = Regex::new(
        r"^(\d{1,2}[-/](?:\d{1,2}|\p{L}{3})[-/](?:\d{4}|\d{2}))\b"
    ).unwrap();

    // Same shape, unanchored
    pub static ref DATE_TOKEN: Regex = Regex::new(
        r"\b\d{1,2}[-/](?:\d{1,2}|\p{L}{3})[-/](?:\d{4}|\d{2})\b"
    ).unwrap();

    // Card holder marker: "*" supplementary, "K" primary
    pub static ref CARD_MARKER: Regex = Regex::new(
        r"^[*K]\s+"
    ).unwrap();

    // Installment column: NN/NN
    pub static ref INSTALLMENT: Regex = Regex::new(
        r"\b(\d{1,2})/(\d{1,2})\b"
    ).unwrap();

    // Amount at end of line: 1.234,56 / 1234,56 / 1234.56, optional sign or currency
    pub static ref TRAILING_AMOUNT: Regex = Regex::new(
        r"(-?\$?[\d.,]*\d[\d.,]*)\s*$"
    ).unwrap();

    // Voucher / receipt number left at the end of a description
    pub static ref TRAILING_VOUCHER: Regex = Regex::new(
        r"(?:^|\s+)\d{4,}\s*$"
    ).unwrap();

    // Section structure
    pub static ref DETAIL_BANNER: Regex = Regex::new(
        r"(?i)DETALLE\s+DEL\s+CONSUMO"
    ).unwrap();

    pub static ref SECTION_CLOSER: Regex = Regex::new(
        r"(?i)TOTAL\s+A\s+PAGAR|IMPUESTO\s+DE\s+SELLOS|INTERESES\s+FINANCIACION|DB\s+IVA|PERCEPCION\s+ING|Plan\s+V:|Cuotas\s+a\s+vencer|TARJETA\s+\d{4}\s+Total"
    ).unwrap();

    pub static ref FINANCIAL_CHARGE: Regex = Regex::new(
        r"(?i)IMPUESTO|INTERES|IVA\s+\d|PERCEPCION|COMISION|CARGO\s+FINANCIERO"
    ).unwrap();

    // Loose "date ... amount" row used when no detail section is found
    pub static ref FALLBACK_ROW: Regex = Regex::new(
        r"(?m)\b(\d{1,2}[-/]\w{2,3}[-/](?:\d{4}|\d{2}))\b[ \t]+.{3,50}[ \t]+([\d.,]+)[ \t]*$"
    ).unwrap();

    // Upcoming installments footer
    pub static ref UPCOMING_BLOCK: Regex = Regex::new(
        r"(?is)Cuotas\s+a\s+vencer\s*:(.*?)(?:\n[ \t]*\n|\z)"
    ).unwrap();

    pub static ref UPCOMING_MONTH_AMOUNT: Regex = Regex::new(
        r"(\p{L}+)\s*/\s*(\d{4}|\d{2})\b\s*\$\s*([\d.,]*\d)"
    ).unwrap();

    pub static ref UPCOMING_OPEN_ENDED: Regex = Regex::new(
        r"(?i)A\s+partir\s+(?:de|del)\s+(\p{L}+)\s*/\s*(\d{4}|\d{2})\b\s*\$\s*([\d.,]*\d)"
    ).unwrap();
}
