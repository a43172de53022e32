//! Rule-based field extractors for card statement rows.

pub mod amounts;
pub mod classifier;
pub mod dates;
pub mod installments;
pub mod patterns;

pub use amounts::{format_amount, parse_amount, AmountExtractor};
pub use classifier::{classify_line, LineClass};
pub use dates::{month_number, normalize_year, parse_local_date, DateExtractor};
pub use installments::InstallmentMatcher;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value extracted from text, with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
