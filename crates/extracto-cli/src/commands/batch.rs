//! Batch processing command for multiple statement files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use extracto_core::models::config::PdfConfig;
use extracto_core::statement::{ExtractionResult, StatementParser, StructuredStatementParser};

use super::parse::{build_parser, format_result, read_document, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files (PDF or plain text)
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    result: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::config::load(config_path)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
        })
        .collect();
    files.sort();

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

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(build_parser(&config));
    let pdf_config = Arc::new(config.pdf.clone());
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));

    debug!("Processing {} files with {} workers", files.len(), args.jobs.max(1));

    let tasks: Vec<_> = files
        .into_iter()
        .map(|path| {
            let parser = Arc::clone(&parser);
            let pdf_config = Arc::clone(&pdf_config);
            let semaphore = Arc::clone(&semaphore);

            tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let file_start = Instant::now();

                let task_path = path.clone();
                let outcome = tokio::task::spawn_blocking(move || {
                    process_single_file(&task_path, &parser, &pdf_config)
                })
                .await
                .unwrap_or_else(|e| Err(anyhow::anyhow!("worker failed: {}", e)));

                (path, outcome, file_start.elapsed().as_millis() as u64)
            })
        })
        .collect();

    // Awaiting in spawn order keeps results in file order
    let mut results = Vec::with_capacity(tasks.len());
    for task in tasks {
        let (path, outcome, processing_time_ms) = task.await?;

        match outcome {
            Ok(result) => {
                results.push(ProcessResult {
                    path,
                    result: Some(result),
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
                        result: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    let successful: Vec<_> = results.iter().filter(|r| r.result.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for item in &successful {
            if let Some(result) = &item.result {
                let output_name = item
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("statement");

                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));
                fs::write(&output_path, format_result(result, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
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
        for item in &failed {
            println!(
                "  - {}: {}",
                item.path.display(),
                item.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(
    path: &Path,
    parser: &StructuredStatementParser,
    pdf_config: &PdfConfig,
) -> anyhow::Result<ExtractionResult> {
    let content = read_document(path, pdf_config)?;
    Ok(parser.parse(&content))
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "strategy",
        "transactions",
        "total_amount",
        "upcoming_months",
        "processing_time_ms",
        "error",
    ])?;

    for item in results {
        let filename = item.path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        let time_ms = item.processing_time_ms.to_string();

        if let Some(result) = &item.result {
            let total: Decimal = result.transactions.iter().map(|t| t.amount).sum();
            let strategy = format!("{:?}", result.strategy).to_lowercase();

            wtr.write_record([
                filename,
                "success",
                strategy.as_str(),
                result.transactions.len().to_string().as_str(),
                total.to_string().as_str(),
                result.upcoming.len().to_string().as_str(),
                time_ms.as_str(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                time_ms.as_str(),
                item.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
