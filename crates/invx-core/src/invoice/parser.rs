//! Rule-based invoice parser composing the field extractors.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::categorize::{ExpenseCategorizer, PlaceholderCategorizer};
use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::record::{ExtractionMetadata, InvoiceRecord};
use crate::source::LoadedText;

use super::rules::{AmountExtractor, DateExtractor, FieldExtractor, VendorExtractor};
use super::{InvoiceExtractor, Result};

/// Result of invoice extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted invoice record (no file name yet).
    pub record: InvoiceRecord,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Parse invoice from text.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;
}

/// Invoice parser running the amount, date and vendor cascades plus a
/// categorizer.
pub struct RuleBasedParser {
    /// Expense categorizer.
    categorizer: Box<dyn ExpenseCategorizer + Send + Sync>,
    /// Longest accepted text, in characters.
    max_input_chars: usize,
}

impl RuleBasedParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            categorizer: Box::new(PlaceholderCategorizer::new(config.default_category.clone())),
            max_input_chars: config.max_input_chars,
        }
    }

    /// Set the expense categorizer.
    pub fn with_categorizer<C>(mut self, categorizer: C) -> Self
    where
        C: ExpenseCategorizer + Send + Sync + 'static,
    {
        self.categorizer = Box::new(categorizer);
        self
    }

    /// Set the input size bound.
    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    fn check_size(&self, text: &str) -> Result<()> {
        let len = text.chars().count();
        if len > self.max_input_chars {
            return Err(ExtractionError::InputTooLarge {
                len,
                limit: self.max_input_chars,
            });
        }
        Ok(())
    }
}

/// Wall-clock timer. `std::time::Instant` is unavailable on wasm32, where
/// timings read as zero.
struct Stopwatch {
    #[cfg(not(target_arch = "wasm32"))]
    start: std::time::Instant,
}

impl Stopwatch {
    fn start() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            start: std::time::Instant::now(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    #[cfg(target_arch = "wasm32")]
    fn elapsed_ms(&self) -> u64 {
        0
    }
}

impl Default for RuleBasedParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for RuleBasedParser {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        let stopwatch = Stopwatch::start();
        self.check_size(text)?;

        info!("Parsing invoice from {} characters of text", text.len());

        let amount = AmountExtractor::new().extract(text);
        let date = DateExtractor::new().extract(text);
        let vendor = VendorExtractor::new().extract(text);
        let category = self.categorizer.categorize(text);

        let mut field_confidence = HashMap::new();
        let mut missing_fields = Vec::new();
        let mut confidence_sum = 0.0f32;

        for (field, confidence) in [
            ("amount", amount.as_ref().map(|m| m.confidence)),
            ("date", date.as_ref().map(|m| m.confidence)),
            ("vendor", vendor.as_ref().map(|m| m.confidence)),
        ] {
            match confidence {
                Some(c) => {
                    field_confidence.insert(field.to_string(), c);
                    confidence_sum += c;
                }
                None => missing_fields.push(field.to_string()),
            }
        }

        let mut record = InvoiceRecord::new(String::new(), category);
        record.amount = amount.map(|m| m.value);
        record.date = date.map(|m| m.value);
        record.vendor = vendor.map(|m| m.value);

        let warnings = record.validate();
        let processing_time_ms = stopwatch.elapsed_ms();

        record.metadata = ExtractionMetadata {
            confidence: confidence_sum / 3.0,
            processing_time_ms: Some(processing_time_ms),
            warnings: warnings.clone(),
            missing_fields,
            field_confidence,
            ..ExtractionMetadata::default()
        };

        debug!(
            "Extracted amount={:?} date={:?} vendor={:?} with confidence {:.2}",
            record.amount, record.date, record.vendor, record.metadata.confidence
        );

        Ok(ExtractionResult {
            record,
            warnings,
            processing_time_ms,
        })
    }
}

impl InvoiceExtractor for RuleBasedParser {
    fn extract(&self, document: &LoadedText) -> Result<InvoiceRecord> {
        let mut record = self.parse(&document.text)?.record;
        record.filename = document.filename.clone();
        record.extracted_text = document.text.clone();
        record.metadata.source_type = document.source_type;
        Ok(record)
    }

    fn extract_from_text(&self, text: &str) -> Result<InvoiceRecord> {
        self.parse(text).map(|r| r.record)
    }
}
