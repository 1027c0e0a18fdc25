//! WASM bindings for invoice field extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! PDF loading is not available here; callers pass text they already have.

use rust_decimal::prelude::ToPrimitive;
use wasm_bindgen::prelude::*;

use invx_core::{InvoiceParser, InvoiceRecord, RuleBasedParser};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract the invoice total from text.
#[wasm_bindgen(js_name = extractAmount)]
pub fn extract_amount(text: &str) -> Option<f64> {
    invx_core::extract_amount(text).and_then(|d| d.to_f64())
}

/// Extract the invoice date from text as `YYYY-MM-DD`.
#[wasm_bindgen(js_name = extractDate)]
pub fn extract_date(text: &str) -> Option<String> {
    invx_core::extract_date(text).map(|d| d.to_string())
}

/// Extract the vendor name from text.
#[wasm_bindgen(js_name = extractVendor)]
pub fn extract_vendor(text: &str) -> Option<String> {
    invx_core::extract_vendor(text)
}

/// Extract a full invoice record from text.
///
/// Amounts are serialized as strings to keep their exact decimal value.
#[wasm_bindgen(js_name = extractInvoice)]
pub fn extract_invoice(text: &str) -> Result<JsValue, JsValue> {
    InvoiceExtractor::new().extract(text)
}

/// Invoice extractor class for browser use.
#[wasm_bindgen]
pub struct InvoiceExtractor {
    parser: RuleBasedParser,
}

#[wasm_bindgen]
impl InvoiceExtractor {
    /// Create a new invoice extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: RuleBasedParser::new(),
        }
    }

    /// Reject inputs longer than `limit` characters.
    #[wasm_bindgen(js_name = setMaxInputChars)]
    pub fn set_max_input_chars(&mut self, limit: usize) {
        let parser = std::mem::take(&mut self.parser);
        self.parser = parser.with_max_input_chars(limit);
    }

    /// Extract invoice from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        let record = self.parse(text)?.record;
        to_js(&record)
    }

    /// Get extraction result with warnings and timing.
    #[wasm_bindgen(js_name = extractWithMetadata)]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.parse(text)?;

        #[derive(serde::Serialize)]
        struct ExtractResult {
            invoice: InvoiceRecord,
            warnings: Vec<String>,
            processing_time_ms: u64,
        }

        to_js(&ExtractResult {
            invoice: result.record,
            warnings: result.warnings,
            processing_time_ms: result.processing_time_ms,
        })
    }
}

impl InvoiceExtractor {
    fn parse(&self, text: &str) -> Result<invx_core::ExtractionResult, JsValue> {
        self.parser
            .parse(text)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for InvoiceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const SAMPLE: &str = "Acme Corp\nInvoice Date: 14/07/2024\nTotal: $1,234.56";

    #[wasm_bindgen_test]
    fn test_extract_amount() {
        let amount = extract_amount(SAMPLE);
        assert!(amount.is_some());
        assert!((amount.unwrap() - 1234.56).abs() < 0.001);
        assert_eq!(extract_amount("no numbers here"), None);
    }

    #[wasm_bindgen_test]
    fn test_extract_date() {
        assert_eq!(extract_date(SAMPLE).as_deref(), Some("2024-07-14"));
    }

    #[wasm_bindgen_test]
    fn test_extract_vendor() {
        assert_eq!(extract_vendor(SAMPLE).as_deref(), Some("Acme Corp"));
        assert_eq!(extract_vendor("   \n\t\n"), None);
    }

    #[wasm_bindgen_test]
    fn test_extract_invoice() {
        assert!(extract_invoice(SAMPLE).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_input_limit() {
        let mut extractor = InvoiceExtractor::new();
        extractor.set_max_input_chars(5);
        assert!(extractor.extract(SAMPLE).is_err());
    }
}
