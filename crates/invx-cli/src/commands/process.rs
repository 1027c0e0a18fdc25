//! Process command - extract fields from a single invoice file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use invx_core::models::config::InvxConfig;
use invx_core::source::STDIN_NAME;
use invx_core::{format_amount, load_reader, load_text, InvoiceExtractor, InvoiceRecord, RuleBasedParser};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (OCR text or PDF), or `-` for standard input
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Keep the extracted text in JSON output
    #[arg(long)]
    include_text: bool,

    /// Show extraction confidence scores
    #[arg(long)]
    show_confidence: bool,

    /// Report fields that could not be extracted
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for outputs in this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let is_stdin = args.input.as_os_str() == STDIN_NAME;
    if !is_stdin && !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing {}", args.input.display());

    let record = process_file(&args.input, &config)?;

    if args.validate {
        let issues = record.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let include_text = args.include_text || config.output.include_text;
    let output = format_record(&record, args.format, include_text, &config)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        eprintln!();
        eprintln!(
            "{} Extraction confidence: {:.1}%",
            style("ℹ").blue(),
            record.metadata.confidence * 100.0
        );
        let mut fields: Vec<_> = record.metadata.field_confidence.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        for (field, confidence) in fields {
            eprintln!("   {:<8} {:.0}%", field, confidence * 100.0);
        }
        if let Some(time_ms) = record.metadata.processing_time_ms {
            eprintln!("{} Processing time: {}ms", style("ℹ").blue(), time_ms);
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Load one document and extract its record.
pub fn process_file(path: &Path, config: &InvxConfig) -> anyhow::Result<InvoiceRecord> {
    let document = if path.as_os_str() == STDIN_NAME {
        load_reader(STDIN_NAME, io::stdin().lock(), &config.source)?
    } else {
        load_text(path, &config.source)?
    };

    let parser = RuleBasedParser::from_config(&config.extraction);
    Ok(parser.extract(&document)?)
}

/// Render a record in the requested format.
pub fn format_record(
    record: &InvoiceRecord,
    format: OutputFormat,
    include_text: bool,
    config: &InvxConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            if include_text {
                Ok(serde_json::to_string_pretty(record)?)
            } else {
                Ok(serde_json::to_string_pretty(&record.clone().without_text())?)
            }
        }
        OutputFormat::Csv => format_csv(std::slice::from_ref(record)),
        OutputFormat::Text => Ok(format_text(record, &config.output.currency_symbol)),
    }
}

/// Render records as CSV with a header row.
pub fn format_csv(records: &[InvoiceRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["id", "filename", "category", "amount", "date", "vendor"])?;

    for record in records {
        wtr.write_record([
            &record.id.map(|id| id.to_string()).unwrap_or_default(),
            &record.filename,
            &record.category,
            &record.amount.map(|a| a.to_string()).unwrap_or_default(),
            &record.date.map(|d| d.to_string()).unwrap_or_default(),
            &record.vendor.clone().unwrap_or_default(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &InvoiceRecord, currency_symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("File:     {}\n", record.filename));
    output.push_str(&format!(
        "Vendor:   {}\n",
        record.vendor.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!(
        "Date:     {}\n",
        record.date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
    ));
    output.push_str(&format!(
        "Amount:   {}\n",
        record
            .amount
            .map(|a| format_amount(a, currency_symbol))
            .unwrap_or_else(|| "-".to_string())
    ));
    output.push_str(&format!("Category: {}\n", record.category));

    output
}
