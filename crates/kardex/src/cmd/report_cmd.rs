//! kardex-report - Reconstruct and export kardex reports.
//!
//! # Usage
//!
//! ```bash
//! kardex-report item.json lines
//! kardex-report item.json lines --layout physical
//! kardex-report item.json totals
//! kardex-report item.json export --format workbook --output out/kardex.xml
//! kardex-report item.json export --format csv --layout physical
//! ```
//!
//! # Commands
//!
//! - `lines` - Print the ledger as an aligned table
//! - `totals` - Print period totals and the accounting cross-check
//! - `export` - Render a workbook, printable HTML, CSV or JSON document

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use kardex_core::KardexReport;
use kardex_export::{
    build_table, export, format_decimal, CsvExporter, DocumentInfo, DocumentSink, ExportConfig,
    Exporter, FileSink, JsonExporter, Layout, Paper, PrintableExporter, ReportMetadata,
    WorkbookExporter, WriterSink,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::input::KardexInput;

/// Reconstruct kardex reports from inventory movements.
#[derive(Parser, Debug)]
#[command(name = "kardex-report")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The kardex input document (JSON)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,

    /// First day of the reporting period (YYYY-MM-DD)
    #[arg(long, global = true, value_name = "DATE")]
    pub period_start: Option<NaiveDate>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the ledger lines
    Lines {
        /// Layout to print
        #[arg(short, long, default_value = "valorized")]
        layout: Layout,
    },
    /// Print period totals and the cross-check
    Totals,
    /// Render a document
    Export {
        /// Output format
        #[arg(short, long, value_enum)]
        format: Format,

        /// Restrict to one layout (workbook and html include both by default)
        #[arg(short, long)]
        layout: Option<Layout>,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Paper size for printable output
        #[arg(long, default_value = "a4")]
        paper: Paper,

        /// Date format for date cells
        #[arg(long, value_name = "FORMAT")]
        date_format: Option<String>,

        /// Leave out the metadata header
        #[arg(long)]
        no_metadata: bool,
    },
}

/// Document formats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// SpreadsheetML workbook
    Workbook,
    /// Printable HTML
    Html,
    /// CSV
    Csv,
    /// JSON
    Json,
}

/// Main entry point for the report command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut stdout = io::stdout().lock();
    match run(&args, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("kardex=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kardex=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Run a parsed command, writing report output to `writer`.
pub fn run<W: Write>(args: &Args, writer: &mut W) -> Result<()> {
    if !args.file.exists() {
        anyhow::bail!("file not found: {}", args.file.display());
    }

    let input = KardexInput::load(&args.file)?;
    let (report, metadata) = input.into_report(args.period_start)?;

    match &args.command {
        Command::Lines { layout } => {
            write_lines(&report, &metadata, *layout, &ExportConfig::default(), writer)?;
        }
        Command::Totals => {
            write_totals(&report, writer)?;
        }
        Command::Export {
            format,
            layout,
            output,
            paper,
            date_format,
            no_metadata,
        } => {
            let mut config = ExportConfig::default().with_paper(*paper);
            if let Some(date_format) = date_format {
                config = config.with_date_format(date_format.as_str())?;
            }
            if *no_metadata {
                config = config.without_metadata();
            }
            export_report(
                &report,
                &metadata,
                *format,
                *layout,
                config,
                output.as_deref(),
                writer,
            )?;
        }
    }

    Ok(())
}

/// Print one layout as an aligned text table.
pub fn write_lines<W: Write>(
    report: &KardexReport,
    metadata: &ReportMetadata,
    layout: Layout,
    config: &ExportConfig,
    writer: &mut W,
) -> Result<()> {
    let table = build_table(layout, report, metadata, config);

    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.cells.iter().map(kardex_export::Cell::display).collect())
        .collect();
    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.label.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    writeln!(writer, "{}", table.title)?;
    for (label, value) in &table.metadata {
        writeln!(writer, "{label}: {value}")?;
    }
    writeln!(writer)?;

    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, &width)| format!("{:<width$}", column.label))
        .collect();
    writeln!(writer, "{}", header.join("  ").trim_end())?;
    let total_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    writeln!(writer, "{}", "=".repeat(total_width))?;

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&table.columns)
            .zip(&widths)
            .map(|((text, column), &width)| {
                if column.kind.is_numeric() {
                    format!("{text:>width$}")
                } else {
                    format!("{text:<width$}")
                }
            })
            .collect();
        writeln!(writer, "{}", line.join("  ").trim_end())?;
    }

    Ok(())
}

/// Print period totals and whether they reconcile with the final balance.
pub fn write_totals<W: Write>(report: &KardexReport, writer: &mut W) -> Result<()> {
    let totals = &report.totals;
    let balance = &report.final_balance;
    let money = |v| format_decimal(v, kardex_export::layout::MONEY_SCALE);
    let qty = |v| format_decimal(v, kardex_export::layout::QUANTITY_SCALE);

    writeln!(writer, "Kardex Totals")?;
    writeln!(writer, "{}", "=".repeat(40))?;
    writeln!(writer)?;
    writeln!(writer, "{:<22}{:>18}", "Opening quantity", qty(report.opening.quantity))?;
    writeln!(writer, "{:<22}{:>18}", "Opening cost", money(report.opening.total_cost))?;
    writeln!(writer, "{:<22}{:>18}", "Entries quantity", qty(totals.entries_physical))?;
    writeln!(writer, "{:<22}{:>18}", "Entries cost", money(totals.entries_monetary))?;
    writeln!(writer, "{:<22}{:>18}", "Exits quantity", qty(totals.exits_physical))?;
    writeln!(writer, "{:<22}{:>18}", "Exits cost", money(totals.exits_monetary))?;
    writeln!(writer, "{:<22}{:>18}", "Movement lines", report.movement_lines().count())?;
    writeln!(writer)?;
    writeln!(writer, "{:<22}{:>18}", "Closing quantity", qty(balance.quantity))?;
    writeln!(
        writer,
        "{:<22}{:>18}",
        "Closing unit cost",
        format_decimal(balance.unit_cost(), kardex_export::layout::UNIT_COST_SCALE)
    )?;
    writeln!(writer, "{:<22}{:>18}", "Closing cost", money(balance.total_cost))?;
    writeln!(writer)?;

    let status = if report.is_consistent() {
        "OK"
    } else {
        "MISMATCH"
    };
    writeln!(writer, "{:<22}{:>18}", "Cross-check", status)?;

    Ok(())
}

/// Render a document and deliver it to `output`, or to `writer` when no
/// output path is given.
pub fn export_report<W: Write>(
    report: &KardexReport,
    metadata: &ReportMetadata,
    format: Format,
    layout: Option<Layout>,
    config: ExportConfig,
    output: Option<&Path>,
    writer: &mut W,
) -> Result<DocumentInfo> {
    let layouts = layout.map_or_else(|| Layout::BOTH.to_vec(), |l| vec![l]);

    match format {
        Format::Workbook => deliver(
            &WorkbookExporter::new(config).with_layouts(layouts),
            report,
            metadata,
            output,
            writer,
        ),
        Format::Html => deliver(
            &PrintableExporter::new(config).with_layouts(layouts),
            report,
            metadata,
            output,
            writer,
        ),
        Format::Csv => deliver(
            &CsvExporter::new(layout.unwrap_or(Layout::Valorized), config),
            report,
            metadata,
            output,
            writer,
        ),
        Format::Json => deliver(&JsonExporter, report, metadata, output, writer),
    }
}

fn deliver<E: Exporter, W: Write>(
    exporter: &E,
    report: &KardexReport,
    metadata: &ReportMetadata,
    output: Option<&Path>,
    writer: &mut W,
) -> Result<DocumentInfo> {
    match output {
        Some(path) => {
            let info = deliver_to(exporter, report, metadata, FileSink::new(path))
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = info.len, "wrote {}", info.media_type);
            Ok(info)
        }
        None => deliver_to(exporter, report, metadata, WriterSink::new(writer)),
    }
}

fn deliver_to<E: Exporter, S: DocumentSink>(
    exporter: &E,
    report: &KardexReport,
    metadata: &ReportMetadata,
    sink: S,
) -> Result<DocumentInfo> {
    Ok(export(exporter, report, metadata, sink)?)
}
