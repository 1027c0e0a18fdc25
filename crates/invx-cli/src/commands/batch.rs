//! Batch processing command for multiple invoice files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use invx_core::{DocumentKind, InvoiceRecord, Summary};

use super::process::{format_csv, format_record, process_file, OutputFormat};
use super::summary::render_summary;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write a summary CSV and print expense totals
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Batch summary file name.
const SUMMARY_FILE: &str = "summary.csv";

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    record: Option<InvoiceRecord>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .filter(|p| !matches!(DocumentKind::from_path(p), DocumentKind::Unsupported(_)))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    let mut claimed = ClaimedNames::default();
    if args.summary && args.output_dir.is_some() {
        claimed.outputs.insert(SUMMARY_FILE.to_string());
    }
    let mut next_id = 1u64;

    for path in files {
        let file_start = Instant::now();
        let result = claimed
            .claim(&path, args.output_dir.as_ref().map(|_| args.format))
            .and_then(|_| process_file(&path, &config));
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(mut record) => {
                record.id = Some(next_id);
                next_id += 1;
                results.push(ProcessResult {
                    path,
                    record: Some(record),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        record: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    let successful: Vec<&ProcessResult> = results.iter().filter(|r| r.record.is_some()).collect();
    let failed: Vec<&ProcessResult> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            let Some(record) = &result.record else {
                continue;
            };
            let output_path = output_dir.join(output_name(&result.path, args.format));

            let content = format_record(record, args.format, config.output.include_text, &config)?;
            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join(SUMMARY_FILE))
            .unwrap_or_else(|| PathBuf::from(SUMMARY_FILE));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );

        let records: Vec<InvoiceRecord> = successful
            .iter()
            .filter_map(|r| r.record.clone())
            .collect();
        println!();
        print!("{}", render_summary(&Summary::from_records(&records), &config.output.currency_symbol));
    } else if args.output_dir.is_none() {
        let records: Vec<InvoiceRecord> = successful
            .iter()
            .filter_map(|r| r.record.clone())
            .collect();
        print!("{}", format_csv(&records)?);
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// File and output names already taken in this run.
#[derive(Default)]
struct ClaimedNames {
    inputs: HashSet<String>,
    outputs: HashSet<String>,
}

impl ClaimedNames {
    /// Reserve the input file name and, when outputs are written, the
    /// output file name. Fails if either is already taken.
    fn claim(&mut self, path: &Path, format: Option<OutputFormat>) -> anyhow::Result<()> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        if self.inputs.contains(&name) {
            anyhow::bail!("duplicate file name: {}", name);
        }

        if let Some(format) = format {
            let output = output_name(path, format);
            if !self.outputs.insert(output.clone()) {
                anyhow::bail!("output {} would overwrite an earlier output", output);
            }
        }

        self.inputs.insert(name);
        Ok(())
    }
}

/// Output file name for an input: its stem plus the format's extension.
fn output_name(path: &Path, format: OutputFormat) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("invoice");
    format!("{}.{}", stem, format.extension())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "id",
        "filename",
        "status",
        "category",
        "amount",
        "date",
        "vendor",
        "confidence",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let time_ms = result.processing_time_ms.to_string();

        if let Some(record) = &result.record {
            let id = record.id.map(|id| id.to_string()).unwrap_or_default();
            let amount = record.amount.map(|a| a.to_string()).unwrap_or_default();
            let date = record.date.map(|d| d.to_string()).unwrap_or_default();
            let confidence = format!("{:.2}", record.metadata.confidence);

            wtr.write_record([
                id.as_str(),
                filename,
                "success",
                record.category.as_str(),
                amount.as_str(),
                date.as_str(),
                record.vendor.as_deref().unwrap_or(""),
                confidence.as_str(),
                time_ms.as_str(),
                "",
            ])?;
        } else {
            wtr.write_record([
                "",
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                time_ms.as_str(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
