//! Vendor (sender) name extraction.

use tracing::trace;

use super::patterns::{VENDOR_IGNORE, VENDOR_MARKERS};
use super::{ExtractionMatch, FieldExtractor, LABELED_CONFIDENCE};

/// Lines scanned for an explicit sender marker.
const MARKER_SCAN_LINES: usize = 15;

/// Lines scanned for a letterhead.
const LETTERHEAD_SCAN_LINES: usize = 10;

/// Confidence for an unlabeled letterhead line.
const LETTERHEAD_CONFIDENCE: f32 = 0.6;

/// Confidence for the bare first-line default.
const FIRST_LINE_CONFIDENCE: f32 = 0.4;

/// Vendor field extractor.
///
/// Looks for a `from:`/`supplier:`/`billed by:`/`seller:` line near the top,
/// then for a letterhead line that carries no invoice metadata, and finally
/// settles for the first non-blank line.
pub struct VendorExtractor;

impl VendorExtractor {
    pub fn new() -> Self {
        Self
    }

    fn from_marker(&self, lines: &[(usize, &str)]) -> Option<ExtractionMatch<String>> {
        lines.iter().take(MARKER_SCAN_LINES).find_map(|&(start, line)| {
            let lower = line.to_lowercase();
            if !VENDOR_MARKERS.iter().any(|m| lower.contains(m)) {
                return None;
            }
            let (head, rest) = line.split_once(':')?;
            let offset = start + head.len() + 1 + leading_ws(rest);
            trace!("vendor from marker line: {}", line);
            Some(span_match(trim_blank(rest), LABELED_CONFIDENCE, line, offset))
        })
    }

    fn from_letterhead(&self, lines: &[(usize, &str)]) -> Option<ExtractionMatch<String>> {
        lines.iter().take(LETTERHEAD_SCAN_LINES).find_map(|&(start, line)| {
            if trim_blank(line).is_empty() {
                return None;
            }
            let lower = line.to_lowercase();
            if VENDOR_IGNORE.iter().any(|w| lower.contains(w)) {
                return None;
            }
            trace!("vendor from letterhead line: {}", line);
            Some(span_match(trim_blank(line), LETTERHEAD_CONFIDENCE, line, start + leading_ws(line)))
        })
    }

    fn from_first_line(&self, lines: &[(usize, &str)]) -> Option<ExtractionMatch<String>> {
        lines
            .iter()
            .find(|(_, line)| !trim_blank(line).is_empty())
            .map(|&(start, line)| {
                trace!("vendor defaulted to first line: {}", line);
                span_match(trim_blank(line), FIRST_LINE_CONFIDENCE, line, start + leading_ws(line))
            })
    }
}

impl Default for VendorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for VendorExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let lines = line_spans(text);

        self.from_marker(&lines)
            .or_else(|| self.from_letterhead(&lines))
            .or_else(|| self.from_first_line(&lines))
    }

    /// Candidates from each step of the cascade, highest priority first.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let lines = line_spans(text);

        [
            self.from_marker(&lines),
            self.from_letterhead(&lines),
            self.from_first_line(&lines),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Extract a best-guess vendor name from text.
///
/// Only text without any non-blank line yields `None`. A marker line with
/// nothing after its colon yields an empty name.
pub fn extract_vendor(text: &str) -> Option<String> {
    VendorExtractor::new().extract(text).map(|m| m.value)
}

/// Split text into lines on every Unicode line boundary.
///
/// `\r\n` counts as one break and a trailing break does not produce an
/// empty final line.
pub fn split_lines(text: &str) -> Vec<&str> {
    line_spans(text).into_iter().map(|(_, line)| line).collect()
}

fn line_spans(text: &str) -> Vec<(usize, &str)> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        spans.push((start, &text[start..i]));

        let mut end = i + c.len_utf8();
        if c == '\r' && matches!(chars.peek(), Some(&(_, '\n'))) {
            chars.next();
            end += 1;
        }
        start = end;
    }

    if start < text.len() {
        spans.push((start, &text[start..]));
    }

    spans
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Characters trimmed from vendor lines: Unicode whitespace plus the
/// information separators `\u{1c}`..`\u{1f}`.
fn is_blank(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\u{1c}'..='\u{1f}')
}

fn trim_blank(s: &str) -> &str {
    s.trim_matches(is_blank)
}

fn leading_ws(s: &str) -> usize {
    s.len() - s.trim_start_matches(is_blank).len()
}

fn span_match(value: &str, confidence: f32, line: &str, start: usize) -> ExtractionMatch<String> {
    ExtractionMatch::new(value.to_string(), confidence, line).with_position(start, start + value.len())
}
