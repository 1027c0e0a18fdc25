//! Expense analytics over extracted invoice records.
//!
//! Totals are grouped by category, vendor and date. A record whose grouping
//! key is absent is left out of that grouping, and an absent amount counts
//! as zero.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::record::InvoiceRecord;

/// Aggregate totals for a set of invoices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of invoices summarized.
    pub invoice_count: usize,

    /// Sum of all amounts.
    pub total_amount: Decimal,

    /// Totals per category, sorted by category.
    pub by_category: Vec<GroupTotal<String>>,

    /// Totals per vendor, sorted by vendor.
    pub by_vendor: Vec<GroupTotal<String>>,

    /// Totals per invoice date, oldest first.
    pub by_date: Vec<GroupTotal<NaiveDate>>,
}

/// Total amount for one group key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal<K> {
    pub key: K,
    pub total: Decimal,
}

impl Summary {
    /// Summarize a set of records.
    pub fn from_records(records: &[InvoiceRecord]) -> Self {
        let amount = |r: &InvoiceRecord| r.amount.unwrap_or(Decimal::ZERO);

        Self {
            invoice_count: records.len(),
            total_amount: records.iter().map(amount).sum(),
            by_category: group_totals(records.iter().map(|r| (Some(r.category.clone()), amount(r)))),
            by_vendor: group_totals(records.iter().map(|r| (r.vendor.clone(), amount(r)))),
            by_date: group_totals(records.iter().map(|r| (r.date, amount(r)))),
        }
    }

    /// Whether there is nothing to report.
    pub fn is_empty(&self) -> bool {
        self.invoice_count == 0
    }
}

/// Format an amount with two decimals and thousands separators
/// (`1234.5` with `$` becomes `$1,234.50`).
pub fn format_amount(amount: Decimal, symbol: &str) -> String {
    let s = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let Some((integer_part, decimal_part)) = digits.split_once('.') else {
        return format!("{sign}{symbol}{digits}");
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    format!("{sign}{symbol}{formatted}.{decimal_part}")
}

fn group_totals<K: Ord>(items: impl Iterator<Item = (Option<K>, Decimal)>) -> Vec<GroupTotal<K>> {
    let mut groups: BTreeMap<K, Decimal> = BTreeMap::new();

    for (key, amount) in items {
        if let Some(key) = key {
            *groups.entry(key).or_insert(Decimal::ZERO) += amount;
        }
    }

    groups
        .into_iter()
        .map(|(key, total)| GroupTotal { key, total })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn record(category: &str, vendor: Option<&str>, date: Option<(i32, u32, u32)>, amount: Option<&str>) -> InvoiceRecord {
        let mut r = InvoiceRecord::new("x.txt", category);
        r.vendor = vendor.map(String::from);
        r.date = date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        r.amount = amount.map(|a| Decimal::from_str(a).unwrap());
        r
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec("1234.56"), "$"), "$1,234.56");
        assert_eq!(format_amount(dec("12345678.9"), "$"), "$12,345,678.90");
        assert_eq!(format_amount(dec("99"), ""), "99.00");
        assert_eq!(format_amount(dec("-1500"), "$"), "-$1,500.00");
        assert_eq!(format_amount(Decimal::ZERO, "$"), "$0.00");
    }

    #[test]
    fn test_empty_summary() {
        let summary = Summary::from_records(&[]);
        assert!(summary.is_empty());
        assert_eq!(summary.total_amount, Decimal::ZERO);
        assert!(summary.by_category.is_empty());
    }

    #[test]
    fn test_grouped_totals() {
        let records = vec![
            record("Travel", Some("Travel Co"), Some((2024, 7, 10)), Some("567.89")),
            record("Office Supplies", Some("Acme Corp"), Some((2024, 7, 14)), Some("1234.56")),
            record("Office Supplies", Some("Acme Corp"), Some((2024, 7, 14)), Some("10.00")),
            record("Travel", None, None, None),
        ];

        let summary = Summary::from_records(&records);

        assert_eq!(summary.invoice_count, 4);
        assert_eq!(summary.total_amount, dec("1812.45"));
        assert_eq!(
            summary.by_category,
            vec![
                GroupTotal { key: "Office Supplies".to_string(), total: dec("1244.56") },
                GroupTotal { key: "Travel".to_string(), total: dec("567.89") },
            ]
        );
        assert_eq!(
            summary.by_vendor,
            vec![
                GroupTotal { key: "Acme Corp".to_string(), total: dec("1244.56") },
                GroupTotal { key: "Travel Co".to_string(), total: dec("567.89") },
            ]
        );
        assert_eq!(
            summary.by_date.iter().map(|g| g.key.to_string()).collect::<Vec<_>>(),
            ["2024-07-10", "2024-07-14"]
        );
    }
}
