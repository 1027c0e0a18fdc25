//! Common regex patterns for invoice field extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// A fixed keyword anchor paired with the pattern that locates its value.
///
/// Cascades are ordered slices of these; the first pattern that yields a
/// usable value wins.
#[derive(Debug)]
pub struct LabeledPattern {
    /// Name of the label, as it appears on the invoice.
    pub label: &'static str,
    /// Pattern whose first capture group holds the raw value.
    pub pattern: Regex,
}

impl LabeledPattern {
    fn new(label: &'static str, pattern: &str) -> Self {
        Self {
            label,
            pattern: Regex::new(pattern).unwrap(),
        }
    }
}

/// Value portion of a labeled amount: optional `$`, digits and commas,
/// optional decimal point, up to two decimals.
const LABELED_AMOUNT: &str = r"\s*[:\-]?\s*\$?([0-9,]+\.?[0-9]{0,2})";

/// Any of the four accepted date shapes, slash first.
const DATE_TOKEN: &str = r"\s*[:\-]?\s*([0-9]{2}/[0-9]{2}/[0-9]{4}|[0-9]{4}-[0-9]{2}-[0-9]{2}|[0-9]{2}-[0-9]{2}-[0-9]{4}|[0-9]{2}\.[0-9]{2}\.[0-9]{4})";

lazy_static! {
    // Labeled totals, in priority order
    pub static ref AMOUNT_LABELS: Vec<LabeledPattern> = vec![
        LabeledPattern::new("total", &format!(r"(?i)total{LABELED_AMOUNT}")),
        LabeledPattern::new("amount due", &format!(r"(?i)amount due{LABELED_AMOUNT}")),
        LabeledPattern::new("grand total", &format!(r"(?i)grand total{LABELED_AMOUNT}")),
    ];

    // Currency-shaped values: $1,234.56, USD 1234.56, 1234.56
    pub static ref CURRENCY_VALUE: Regex = Regex::new(
        r"(?:\$|USD\s?)?([0-9]{1,3}(?:,[0-9]{3})*(?:\.[0-9]{2})|[0-9]+\.[0-9]{2})"
    ).unwrap();

    // Labeled dates, in priority order
    pub static ref DATE_LABELS: Vec<LabeledPattern> = vec![
        LabeledPattern::new("invoice date", &format!(r"(?i)invoice date{DATE_TOKEN}")),
        LabeledPattern::new("date", &format!(r"(?i)date{DATE_TOKEN}")),
        LabeledPattern::new("due date", &format!(r"(?i)due date{DATE_TOKEN}")),
    ];

    // Bare date shapes, in fallback order
    pub static ref DATE_SLASH: Regex = Regex::new(r"([0-9]{2}/[0-9]{2}/[0-9]{4})").unwrap();

    pub static ref DATE_ISO: Regex = Regex::new(r"([0-9]{4}-[0-9]{2}-[0-9]{2})").unwrap();

    pub static ref DATE_DASH: Regex = Regex::new(r"([0-9]{2}-[0-9]{2}-[0-9]{4})").unwrap();

    pub static ref DATE_DOT: Regex = Regex::new(r"([0-9]{2}\.[0-9]{2}\.[0-9]{4})").unwrap();
}

/// Line markers that introduce the sender, checked case-insensitively.
pub const VENDOR_MARKERS: [&str; 4] = ["from:", "supplier:", "billed by:", "seller:"];

/// Substrings that mark a line as invoice metadata rather than a vendor name.
pub const VENDOR_IGNORE: [&str; 9] = [
    "invoice", "date", "number", "total", "amount", "due", "bill", "to:", "for:",
];
