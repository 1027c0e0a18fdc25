//! Invoice field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, InvoiceParser, RuleBasedParser};
pub use rules::{extract_amount, extract_date, extract_vendor, FieldExtractor};

use crate::error::ExtractionError;
use crate::models::record::InvoiceRecord;
use crate::source::LoadedText;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for turning loaded documents into invoice records.
pub trait InvoiceExtractor {
    /// Extract an invoice record from a loaded document.
    fn extract(&self, document: &LoadedText) -> Result<InvoiceRecord>;

    /// Extract an invoice record from plain text.
    fn extract_from_text(&self, text: &str) -> Result<InvoiceRecord>;
}
