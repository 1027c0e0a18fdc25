//! Summary command - expense totals over saved invoice records.

use std::fmt::Display;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Deserialize;
use tracing::debug;

use invx_core::{format_amount, GroupTotal, InvoiceRecord, Summary};

/// Arguments for the summary command.
#[derive(Args)]
pub struct SummaryArgs {
    /// JSON record files written by `process` or `batch`
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

/// A saved file holds either one record or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    One(Box<InvoiceRecord>),
    Many(Vec<InvoiceRecord>),
}

pub async fn run(args: SummaryArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let mut records = Vec::new();
    for input in &args.inputs {
        let content = fs::read_to_string(input)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", input.display(), e))?;
        let parsed: RecordFile = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("{} is not an invoice record file: {}", input.display(), e))?;

        match parsed {
            RecordFile::One(record) => records.push(*record),
            RecordFile::Many(many) => records.extend(many),
        }
    }

    debug!("Loaded {} records from {} files", records.len(), args.inputs.len());

    let summary = Summary::from_records(&records);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_summary(&summary, &config.output.currency_symbol));
    }

    Ok(())
}

/// Render the expense summary as plain text.
pub fn render_summary(summary: &Summary, currency_symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", style("Invoice Analytics").bold()));

    if summary.is_empty() {
        output.push_str("No invoices found. Process some invoices first!\n");
        return output;
    }

    output.push_str(&format!("Invoices:     {}\n", summary.invoice_count));
    output.push_str(&format!(
        "Total Amount: {}\n",
        format_amount(summary.total_amount, currency_symbol)
    ));

    push_group(&mut output, "Expenses by Category", &summary.by_category, currency_symbol);
    push_group(&mut output, "Expenses by Vendor", &summary.by_vendor, currency_symbol);
    push_group(&mut output, "Expenses Over Time", &summary.by_date, currency_symbol);

    output
}

fn push_group<K: Display>(output: &mut String, title: &str, groups: &[GroupTotal<K>], currency_symbol: &str) {
    output.push('\n');
    output.push_str(&format!("{}\n", style(title).bold()));

    if groups.is_empty() {
        output.push_str("  (none)\n");
        return;
    }

    let keys: Vec<String> = groups.iter().map(|g| g.key.to_string()).collect();
    let width = keys.iter().map(|k| k.chars().count()).max().unwrap_or(0);

    for (key, group) in keys.iter().zip(groups) {
        output.push_str(&format!(
            "  {:<width$}  {:>14}\n",
            key,
            format_amount(group.total, currency_symbol),
            width = width
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_empty_summary() {
        let text = render_summary(&Summary::default(), "$");
        assert!(text.contains("No invoices found"));
    }

    #[test]
    fn test_render_groups() {
        let mut record = InvoiceRecord::new("a.txt", "Travel");
        record.amount = "567.89".parse().ok();
        record.vendor = Some("Travel Co".to_string());

        let text = render_summary(&Summary::from_records(&[record]), "$");
        assert!(text.contains("Total Amount: $567.89"));
        assert!(text.contains("Expenses by Vendor"));
        assert!(text.contains("Travel Co"));
        assert_eq!(text.lines().filter(|l| l.contains("(none)")).count(), 1);
    }

    #[test]
    fn test_record_file_shapes() {
        let one: RecordFile = serde_json::from_str(
            r#"{"filename": "a.txt", "category": "Travel", "amount": "1.00", "date": null, "vendor": null}"#,
        )
        .unwrap();
        assert!(matches!(one, RecordFile::One(_)));

        let many: RecordFile = serde_json::from_str("[]").unwrap();
        assert!(matches!(many, RecordFile::Many(v) if v.is_empty()));
    }
}
