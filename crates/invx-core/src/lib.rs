//! Core library for invoice field extraction.
//!
//! This crate provides:
//! - Heuristic extraction of the invoice total, date and vendor from OCR text
//! - Invoice records and a pluggable expense categorizer
//! - Document text loading (plain text and PDF text layers)
//! - Expense summaries grouped by category, vendor and date
//!
//! The three extractors are pure functions of their input:
//!
//! ```
//! use invx_core::{extract_amount, extract_date, extract_vendor};
//!
//! let text = "Acme Corp\nInvoice Date: 14/07/2024\nTotal: $1,234.56";
//! assert_eq!(extract_amount(text).map(|a| a.to_string()), Some("1234.56".to_string()));
//! assert_eq!(extract_date(text).map(|d| d.to_string()), Some("2024-07-14".to_string()));
//! assert_eq!(extract_vendor(text).as_deref(), Some("Acme Corp"));
//! ```

pub mod categorize;
pub mod error;
pub mod invoice;
pub mod models;
pub mod source;
pub mod summary;

pub use categorize::{ExpenseCategorizer, PlaceholderCategorizer};
pub use error::{ExtractionError, InvxError, Result, SourceError};
pub use invoice::{
    extract_amount, extract_date, extract_vendor, ExtractionResult, FieldExtractor,
    InvoiceExtractor, InvoiceParser, RuleBasedParser,
};
pub use models::config::InvxConfig;
pub use models::record::{ExtractionMetadata, InvoiceRecord, SourceType};
pub use source::{load_reader, load_text, DocumentKind, LoadedText};
pub use summary::{format_amount, GroupTotal, Summary};
