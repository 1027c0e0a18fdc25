//! Invoice date extraction.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::trace;

use super::patterns::{DATE_DASH, DATE_DOT, DATE_ISO, DATE_LABELS, DATE_SLASH};
use super::{ExtractionMatch, FieldExtractor, FALLBACK_CONFIDENCE, LABELED_CONFIDENCE};

/// Accepted date layouts, tried in order.
///
/// Slash and dash layouts are day-first. A month-first token such as
/// `07/14/2024` matches no layout and is skipped.
pub const DATE_FORMATS: [&str; 4] = ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%d.%m.%Y"];

/// Date field extractor.
///
/// Prefers a date next to `invoice date`, then `date`, then `due date`;
/// without one, takes the first bare date of each shape in turn.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }

    fn shapes() -> [&'static Regex; 4] {
        [&*DATE_SLASH, &*DATE_ISO, &*DATE_DASH, &*DATE_DOT]
    }

    fn extract_labeled(&self, text: &str) -> Option<ExtractionMatch<NaiveDate>> {
        for label in DATE_LABELS.iter() {
            let Some(caps) = label.pattern.captures(text) else {
                continue;
            };
            let full_match = caps.get(0)?;
            if let Some(date) = parse_date(&caps[1]) {
                trace!("date matched label '{}': {}", label.label, full_match.as_str());
                return Some(
                    ExtractionMatch::new(date, LABELED_CONFIDENCE, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        None
    }

    fn extract_bare(&self, text: &str) -> Option<ExtractionMatch<NaiveDate>> {
        for shape in Self::shapes() {
            let Some(found) = shape.find(text) else {
                continue;
            };
            if let Some(date) = parse_date(found.as_str()) {
                trace!("date from bare token: {}", found.as_str());
                return Some(
                    ExtractionMatch::new(date, FALLBACK_CONFIDENCE, found.as_str())
                        .with_position(found.start(), found.end()),
                );
            }
        }

        None
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_labeled(text).or_else(|| self.extract_bare(text))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for shape in Self::shapes() {
            for found in shape.find_iter(text) {
                if let Some(date) = parse_date(found.as_str()) {
                    results.push(
                        ExtractionMatch::new(date, FALLBACK_CONFIDENCE, found.as_str())
                            .with_position(found.start(), found.end()),
                    );
                }
            }
        }

        results.sort_by_key(|m| m.position);
        results
    }
}

/// Extract the most relevant invoice date from text.
///
/// The returned date displays (and serializes) as ISO 8601, `YYYY-MM-DD`.
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    DateExtractor::new().extract(text).map(|m| m.value)
}

/// Parse a date token against [`DATE_FORMATS`], first success wins.
pub fn parse_date(token: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(token, fmt).ok())
        .find(|date| date.year() >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn iso(text: &str) -> Option<String> {
        extract_date(text).map(|d| d.to_string())
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 7, 14);
        assert_eq!(parse_date("14/07/2024"), expected);
        assert_eq!(parse_date("2024-07-14"), expected);
        assert_eq!(parse_date("14-07-2024"), expected);
        assert_eq!(parse_date("14.07.2024"), expected);
    }

    #[test]
    fn test_parse_date_rejects_month_first() {
        assert_eq!(parse_date("07/14/2024"), None);
        assert_eq!(parse_date("31/02/2024"), None);
        assert_eq!(parse_date("0000-01-01"), None);
    }

    #[test]
    fn test_invoice_date_label() {
        let text = "Invoice #1001\nInvoice Date: 14/07/2024\nDue Date: 28/07/2024";
        assert_eq!(iso(text), Some("2024-07-14".to_string()));
    }

    #[test]
    fn test_date_label() {
        let text = "Receipt\nDate: 2024-07-14\nPaid in full";
        assert_eq!(iso(text), Some("2024-07-14".to_string()));
    }

    #[test]
    fn test_invoice_date_preferred_over_earlier_date() {
        let text = "Date - 01-02-2023\nInvoice Date 05.06.2023";
        assert_eq!(iso(text), Some("2023-06-05".to_string()));
    }

    #[test]
    fn test_unparsable_labeled_date_falls_through() {
        let text = "Invoice Date: 07/14/2024\nDue Date: 2024-08-01";
        assert_eq!(iso(text), Some("2024-08-01".to_string()));
    }

    #[test]
    fn test_bare_dot_date() {
        let text = "ACME\nShipped 10.08.2023\nThanks";
        assert_eq!(iso(text), Some("2023-08-10".to_string()));
    }

    #[test]
    fn test_bare_shapes_tried_in_order() {
        // The slash shape is tried before the ISO shape regardless of position.
        let text = "2023-01-02 then 03/04/2023";
        assert_eq!(iso(text), Some("2023-04-03".to_string()));
    }

    #[test]
    fn test_month_first_bare_token_is_skipped() {
        assert_eq!(iso("Paid 07/14/2024"), None);
        assert_eq!(iso("Paid 07/14/2024 on 2024-07-15"), Some("2024-07-15".to_string()));
    }

    #[test]
    fn test_no_dates() {
        assert_eq!(iso("no dates here, only 12/2024"), None);
        assert_eq!(iso(""), None);
    }

    #[test]
    fn test_extract_all_in_text_order() {
        let extractor = DateExtractor::new();
        let text = "2024-01-15 and 20.01.2024 and 99/99/2024";

        let dates: Vec<String> = extractor
            .extract_all(text)
            .into_iter()
            .map(|m| m.value.to_string())
            .collect();
        assert_eq!(dates, ["2024-01-15", "2024-01-20"]);
    }

    #[test]
    fn test_labeled_match_metadata() {
        let found = DateExtractor::new().extract("DATE: 14.07.2024").unwrap();
        assert_eq!(found.confidence, LABELED_CONFIDENCE);
        assert_eq!(found.source, "DATE: 14.07.2024");
        assert_eq!(found.position, Some((0, 16)));
    }
}
