//! Invoice total extraction.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{trace, warn};

use super::patterns::{AMOUNT_LABELS, CURRENCY_VALUE};
use super::{ExtractionMatch, FieldExtractor, FALLBACK_CONFIDENCE, LABELED_CONFIDENCE};

/// Amount field extractor.
///
/// Prefers the first labeled total (`total`, `amount due`, `grand total`, in
/// that order); without one, falls back to the largest currency-shaped value
/// anywhere in the text.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_labeled(&self, text: &str) -> Option<ExtractionMatch<Decimal>> {
        for label in AMOUNT_LABELS.iter() {
            let Some(caps) = label.pattern.captures(text) else {
                continue;
            };
            let full_match = caps.get(0)?;
            match parse_amount(&caps[1]) {
                Some(amount) => {
                    trace!("amount matched label '{}': {}", label.label, full_match.as_str());
                    return Some(
                        ExtractionMatch::new(amount, LABELED_CONFIDENCE, full_match.as_str())
                            .with_position(full_match.start(), full_match.end()),
                    );
                }
                None => {
                    trace!("skipping unparsable '{}' capture: {:?}", label.label, &caps[1]);
                }
            }
        }

        None
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        if let Some(labeled) = self.extract_labeled(text) {
            return Some(labeled);
        }

        let largest = self
            .extract_all(text)
            .into_iter()
            .max_by(|a, b| a.value.cmp(&b.value));

        if let Some(found) = &largest {
            trace!("amount from largest currency value: {}", found.source);
        }

        largest
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in CURRENCY_VALUE.captures_iter(text) {
            let Some(full_match) = caps.get(0) else {
                continue;
            };
            if let Some(amount) = parse_amount(&caps[1]) {
                results.push(
                    ExtractionMatch::new(amount, FALLBACK_CONFIDENCE, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

/// Extract the best-guess invoice total from text.
pub fn extract_amount(text: &str) -> Option<Decimal> {
    AmountExtractor::new().extract(text).map(|m| m.value)
}

/// Parse a captured amount such as `1,234.56`, `99` or `12.`.
///
/// Thousands separators are dropped. Returns `None` when nothing numeric
/// remains. Values beyond the `Decimal` range saturate to [`Decimal::MAX`],
/// so a huge labeled total still wins its label and a huge fallback value
/// still wins the comparison.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned = raw.replace(',', "");
    if !cleaned.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let cleaned = cleaned.trim_end_matches('.');
    let normalized = if cleaned.starts_with('.') {
        format!("0{cleaned}")
    } else {
        cleaned.to_string()
    };

    match Decimal::from_str(&normalized) {
        Ok(amount) => Some(amount),
        Err(_) => {
            warn!("amount {} is out of range, using {}", raw, Decimal::MAX);
            Some(Decimal::MAX)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("99"), Some(dec("99")));
        assert_eq!(parse_amount("12."), Some(dec("12")));
        assert_eq!(parse_amount(",.5"), Some(dec("0.5")));
        assert_eq!(parse_amount(","), None);
        assert_eq!(parse_amount(",."), None);
    }

    #[test]
    fn test_parse_amount_out_of_range() {
        assert_eq!(parse_amount("123456789012345678901234567890"), Some(Decimal::MAX));
        assert_eq!(
            parse_amount("79,228,162,514,264,337,593,543,950,335"),
            Some(Decimal::MAX)
        );
    }

    #[test]
    fn test_huge_labeled_total_keeps_its_label() {
        let text = "Total: 123456789012345678901234567890\nAmount Due $99.00";
        assert_eq!(extract_amount(text), Some(Decimal::MAX));
    }

    #[test]
    fn test_huge_fallback_value_is_still_largest() {
        let text = "Ref 123456789012345678901234567890.00\nItem $5.00";
        assert_eq!(extract_amount(text), Some(Decimal::MAX));
    }

    #[test]
    fn test_labeled_total() {
        let text = "ACME CORP\nItem A $50.00\nTotal: $1,234.56\nThanks!";
        assert_eq!(extract_amount(text), Some(dec("1234.56")));
    }

    #[test]
    fn test_amount_due_without_total() {
        let text = "Widget 12.00\nAmount Due $99.00";
        assert_eq!(extract_amount(text), Some(dec("99.00")));
    }

    #[test]
    fn test_total_takes_priority_over_amount_due() {
        let text = "Amount Due: $10.00\nTotal: $20.00";
        assert_eq!(extract_amount(text), Some(dec("20.00")));
    }

    #[test]
    fn test_total_label_also_matches_subtotal() {
        let text = "Subtotal: $50.00\nTax: $5.00\nTotal: $55.00";
        assert_eq!(extract_amount(text), Some(dec("50.00")));
    }

    #[test]
    fn test_unparsable_label_falls_through() {
        let text = "Total: , pending\nAmount Due $99.00";
        assert_eq!(extract_amount(text), Some(dec("99.00")));
    }

    #[test]
    fn test_fallback_largest_value() {
        let text = "Coffee $50.00\nCatering $120.00\nNapkins 3.50";
        assert_eq!(extract_amount(text), Some(dec("120.00")));
    }

    #[test]
    fn test_fallback_with_thousands_and_usd_prefix() {
        let text = "Deposit USD 980.00\nBalance $12,500.00";
        assert_eq!(extract_amount(text), Some(dec("12500.00")));
    }

    #[test]
    fn test_no_currency_values() {
        assert_eq!(extract_amount("Thank you for your business"), None);
        assert_eq!(extract_amount("Qty 3, ref 12345"), None);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(extract_amount(""), None);
    }

    #[test]
    fn test_labeled_match_metadata() {
        let text = "Grand Total - $75.25";
        let found = AmountExtractor::new().extract(text).unwrap();

        assert_eq!(found.value, dec("75.25"));
        assert_eq!(found.confidence, LABELED_CONFIDENCE);
        assert_eq!(found.source, "Total - $75.25");
        assert_eq!(found.position, Some((6, 20)));
    }

    #[test]
    fn test_extract_all_amounts() {
        let extractor = AmountExtractor::new();
        let text = "Price: 100.00, Shipping: $1,234.56";

        let results = extractor.extract_all(text);
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].source, "$1,234.56");
    }

    #[test]
    fn test_idempotent() {
        let text = "Amount Due $42.10\n$7.00";
        assert_eq!(extract_amount(text), extract_amount(text));
    }
}
