//! Parse command - extract transactions from a single statement.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tracing::{debug, info};

use extracto_core::models::config::{ExtractoConfig, PdfConfig};
use extracto_core::models::statement::DocumentContent;
use extracto_core::statement::rules::format_amount;
use extracto_core::statement::{ExtractionResult, StatementParser, StructuredStatementParser};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Skip the upcoming installments summary
    #[arg(long)]
    no_upcoming: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per transaction
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension used when writing to a directory.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::config::load(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Parsing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Reading statement...");
    pb.set_position(10);
    let content = read_document(&args.input, &config.pdf)?;

    pb.set_message("Extracting transactions...");
    pb.set_position(60);
    let parser = build_parser(&config)
        .with_upcoming(config.extraction.extract_upcoming && !args.no_upcoming);
    let result = parser.parse(&content);

    pb.finish_and_clear();

    for warning in &result.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    let output = format_result(&result, args.format)?;

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

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Build the statement parser from the loaded configuration.
pub fn build_parser(config: &ExtractoConfig) -> StructuredStatementParser {
    StructuredStatementParser::from_config(&config.extraction)
}

/// Read a statement into text: `.txt` as UTF-8, `.pdf` through the PDF extractor.
pub fn read_document(path: &Path, pdf: &PdfConfig) -> anyhow::Result<DocumentContent> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let content = match extension.as_str() {
        "txt" => DocumentContent::from_text(fs::read_to_string(path)?),
        "pdf" => extracto_core::pdf::load_document(path, pdf)?,
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    };

    if content.is_blank() {
        anyhow::bail!("No text could be extracted from {}", path.display());
    }

    Ok(content)
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "date",
        "description",
        "amount",
        "type",
        "installment_current",
        "installment_total",
        "installments_remaining",
    ])?;

    for tx in &result.transactions {
        let (current, total, remaining) = match tx.installment {
            Some(i) => (i.current.to_string(), i.total.to_string(), i.remaining.to_string()),
            None => Default::default(),
        };

        let date = tx.date.to_string();
        let amount = tx.amount.to_string();

        wtr.write_record([
            date.as_str(),
            tx.description.as_str(),
            amount.as_str(),
            tx.kind.as_str(),
            current.as_str(),
            total.as_str(),
            remaining.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Transactions: {} ({:?})\n\n",
        result.transactions.len(),
        result.strategy
    ));

    for tx in &result.transactions {
        let installment = tx
            .installment
            .map(|i| format!("  cuota {}/{}", i.current, i.total))
            .unwrap_or_default();
        output.push_str(&format!(
            "  {}  {:<40} $ {:>14}{}\n",
            tx.date,
            tx.description,
            format_amount(tx.amount),
            installment
        ));
    }

    let total: Decimal = result.transactions.iter().map(|t| t.amount).sum();
    output.push_str(&format!("\nTotal: $ {}\n", format_amount(total)));

    if !result.upcoming.is_empty() {
        output.push_str("\nUpcoming installments:\n");
        for entry in &result.upcoming {
            let label = if entry.open_ended { " onward" } else { "" };
            output.push_str(&format!(
                "  {:<9} $ {:>14}{}\n",
                entry.key(),
                format_amount(entry.amount),
                label
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "DETALLE DEL CONSUMO\n\
                          15-10-24 * SUPERMERCADO, ABC 12/12 664719 3.423,50\n\
                          20-01-26 K DISNEY PLUS 052084 18.399,00\n\
                          TOTAL A PAGAR $21.822,50\n\
                          Cuotas a vencer: Marzo/26 $10.000,00\n";

    fn sample_result() -> ExtractionResult {
        StructuredStatementParser::new().parse(&DocumentContent::from_text(SAMPLE))
    }

    #[test]
    fn test_csv_quotes_and_blank_installments() {
        let csv = format_result(&sample_result(), OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date,description,amount,type"));
        assert_eq!(lines[1], "2024-10-15,\"SUPERMERCADO, ABC\",3423.50,expense,12,12,0");
        assert_eq!(lines[2], "2026-01-20,DISNEY PLUS,18399.00,expense,,,");
    }

    #[test]
    fn test_text_uses_local_amounts() {
        let text = format_result(&sample_result(), OutputFormat::Text).unwrap();

        assert!(text.contains("Transactions: 2 (Structured)"));
        assert!(text.contains("3.423,50"));
        assert!(text.contains("cuota 12/12"));
        assert!(text.contains("Total: $ 21.822,50"));
        assert!(text.contains("2026-03"));
    }

    #[test]
    fn test_read_document_rejects_unknown_extension() {
        let err = read_document(Path::new("statement.docx"), &PdfConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));
    }
}
