//! Extracted invoice records.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One processed invoice: where it came from, its text, and the fields
/// pulled out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Position in a batch run (1-based).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Source file name (`-` for standard input).
    pub filename: String,

    /// Raw text the fields were extracted from.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub extracted_text: String,

    /// Expense category.
    pub category: String,

    /// Invoice total.
    pub amount: Option<Decimal>,

    /// Invoice date, serialized as `YYYY-MM-DD`.
    pub date: Option<NaiveDate>,

    /// Vendor (sender) name.
    pub vendor: Option<String>,

    /// Extraction metadata.
    #[serde(default)]
    pub metadata: ExtractionMetadata,
}

/// Metadata about the extraction process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Overall extraction confidence (0.0 - 1.0).
    pub confidence: f32,

    /// Source document type.
    pub source_type: SourceType,

    /// Processing time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,

    /// Warnings or issues encountered during extraction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Fields that could not be extracted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,

    /// Field-level confidence scores.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub field_confidence: HashMap<String, f32>,
}

/// Source document type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Plain text, typically OCR output.
    Text,
    /// Text layer of a PDF.
    TextPdf,
    /// Standard input.
    Stdin,
    /// Unknown source.
    #[default]
    Unknown,
}

impl InvoiceRecord {
    /// Create a record with no extracted fields.
    pub fn new(filename: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: None,
            filename: filename.into(),
            extracted_text: String::new(),
            category: category.into(),
            amount: None,
            date: None,
            vendor: None,
            metadata: ExtractionMetadata::default(),
        }
    }

    /// Drop the raw text, keeping only the extracted fields.
    pub fn without_text(mut self) -> Self {
        self.extracted_text.clear();
        self
    }

    /// Report fields that could not be extracted.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.amount.is_none() {
            issues.push("Missing amount".to_string());
        }

        if self.date.is_none() {
            issues.push("Missing date".to_string());
        }

        match &self.vendor {
            None => issues.push("Missing vendor".to_string()),
            Some(v) if v.is_empty() => issues.push("Vendor marker has no name".to_string()),
            Some(_) => {}
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn sample() -> InvoiceRecord {
        let mut record = InvoiceRecord::new("invoice1.pdf", "Office Supplies");
        record.id = Some(1);
        record.amount = Some(Decimal::from_str("1234.56").unwrap());
        record.date = NaiveDate::from_ymd_opt(2024, 7, 14);
        record.vendor = Some("Acme Corp".to_string());
        record
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["filename"], "invoice1.pdf");
        assert_eq!(json["category"], "Office Supplies");
        assert_eq!(json["id"], 1);
        assert_eq!(json["date"], "2024-07-14");
        assert_eq!(json["vendor"], "Acme Corp");
        assert!(json.get("extracted_text").is_none());
    }

    #[test]
    fn test_record_reads_back_without_text() {
        let json = serde_json::to_string(&sample()).unwrap();
        let back: InvoiceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_validate() {
        assert!(sample().validate().is_empty());

        let empty = InvoiceRecord::new("blank.txt", "Uncategorized");
        assert_eq!(
            empty.validate(),
            ["Missing amount", "Missing date", "Missing vendor"]
        );
    }
}
