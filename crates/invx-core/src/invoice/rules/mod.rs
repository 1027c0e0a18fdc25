//! Rule-based field extractors for invoice text.
//!
//! Each extractor is an ordered cascade: labeled patterns first, then a
//! format-specific fallback, then (for vendors) a last-resort default.
//! They are pure functions of the input text and never fail; a field that
//! cannot be found is simply `None`.

pub mod amounts;
pub mod dates;
pub mod vendor;
pub mod patterns;

pub use amounts::{extract_amount, parse_amount, AmountExtractor};
pub use dates::{extract_date, parse_date, DateExtractor, DATE_FORMATS};
pub use vendor::{extract_vendor, split_lines, VendorExtractor};
pub use patterns::*;

/// Confidence assigned to a value found next to an explicit label.
pub const LABELED_CONFIDENCE: f32 = 0.95;

/// Confidence assigned to a value found by a label-free fallback scan.
pub const FALLBACK_CONFIDENCE: f32 = 0.8;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Byte span in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
