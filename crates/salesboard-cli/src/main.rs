//! salesboard CLI - Sales Reports by Branch
//!
//! Command-line interface for loading sales tables, comparing branches,
//! and exporting reports.

mod config;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use salesboard_core::{
    BranchDetail, DailyTotal, ProductTotal, Ranking, Renderer, SalesReport, SalesTable,
};
use salesboard_render::{ExcelRenderer, MarkdownRenderer, TextRenderer};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;

/// Output path meaning standard output
const STDOUT_PATH: &str = "-";

#[derive(Parser)]
#[command(name = "salesboard")]
#[command(author, version, about = "Sales reporting by branch", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ./salesboard.toml when present)
    #[arg(short, long, value_name = "PATH", global = true, env = "SALESBOARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the distinct branches of a sales table
    Branches {
        /// Input file path (defaults to `data_file` from the config)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Compare one branch against the cross-branch average
    Dashboard {
        /// Input file path (defaults to `data_file` from the config)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Branch to inspect
        #[arg(short, long)]
        branch: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = DashboardFormat::Text)]
        format: DashboardFormat,
    },

    /// Print total sold per branch, highest first
    Summary {
        /// Input file path (defaults to `data_file` from the config)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = SummaryFormat::Text)]
        format: SummaryFormat,
    },

    /// Export the sales report to a file
    Report {
        /// Input file path (defaults to `data_file` from the config)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Include the detail section for this branch
        #[arg(short, long)]
        branch: Option<String>,

        /// Output file (`-` for stdout; defaults to `report_path` from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (inferred from the output extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<ReportFormat>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DashboardFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SummaryFormat {
    Text,
    Markdown,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Markdown,
    Xlsx,
}

impl ReportFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Some(Self::Text),
            "md" | "markdown" => Some(Self::Markdown),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }
}

/// `summary --format json` payload
///
/// Series are omitted when the table lacks the date or product column.
#[derive(Serialize)]
struct SummaryJson<'a> {
    #[serde(flatten)]
    report: &'a SalesReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    daily_totals: Option<Vec<DailyTotal>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_totals: Option<Vec<ProductTotal>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Some(Commands::Branches { file }) => cmd_branches(&config, file),
        Some(Commands::Dashboard {
            file,
            branch,
            format,
        }) => cmd_dashboard(&config, file, &branch, format),
        Some(Commands::Summary { file, format }) => cmd_summary(&config, file, format),
        Some(Commands::Report {
            file,
            branch,
            output,
            format,
        }) => cmd_report(&config, file, branch, output, format),
        None => {
            println!("salesboard - Sales Reports by Branch");
            println!("Run with --help for usage information");
            Ok(())
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the `-v` level
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load(config: &Config, file: Option<PathBuf>) -> Result<SalesTable> {
    let path = file.unwrap_or_else(|| config.data_file.clone());
    let table = salesboard_loader::load_file(&path)
        .with_context(|| format!("Failed to load '{}'", path.display()))?;
    info!(
        path = %path.display(),
        records = table.len(),
        branches = table.branches().len(),
        "loaded sales table"
    );
    Ok(table)
}

fn build_report(config: &Config, table: &SalesTable, branch: Option<String>) -> SalesReport {
    let mut builder = SalesReport::builder(config.title.clone()).currency(config.currency.clone());
    if let Some(branch) = branch {
        builder = builder.branch(branch);
    }
    builder.build(table)
}

fn cmd_branches(config: &Config, file: Option<PathBuf>) -> Result<()> {
    let table = load(config, file)?;
    let branches = table.branches();
    if branches.is_empty() {
        warn!("no branches in the data");
    }
    for branch in branches {
        println!("{branch}");
    }
    Ok(())
}

fn cmd_dashboard(
    config: &Config,
    file: Option<PathBuf>,
    branch: &str,
    format: DashboardFormat,
) -> Result<()> {
    let table = load(config, file)?;
    if !table.branches().iter().any(|b| b == branch) {
        warn!(branch, "branch not found in the data");
    }
    let detail = BranchDetail::compute(&table, branch);

    match format {
        DashboardFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
        DashboardFormat::Text => {
            print!(
                "{}",
                TextRenderer::new().render_branch_detail(&detail, &config.currency)
            );
            if detail.average.is_none() {
                println!("\nComparison unavailable: the data has no branches.");
            }
            if detail.ranking == Ranking::Unavailable {
                println!("\nSalesperson ranking unavailable: no salesperson column.");
            }
        }
    }
    Ok(())
}

fn cmd_summary(config: &Config, file: Option<PathBuf>, format: SummaryFormat) -> Result<()> {
    let table = load(config, file)?;
    let report = build_report(config, &table, None);

    let output = match format {
        SummaryFormat::Text => TextRenderer::new().render(&report)?,
        SummaryFormat::Markdown => MarkdownRenderer::new().render(&report)?,
        SummaryFormat::Json => {
            let payload = SummaryJson {
                report: &report,
                daily_totals: table.daily_totals(),
                product_totals: table.product_totals(),
            };
            format!("{}\n", serde_json::to_string_pretty(&payload)?)
        }
    };
    print!("{output}");
    Ok(())
}

fn cmd_report(
    config: &Config,
    file: Option<PathBuf>,
    branch: Option<String>,
    output: Option<PathBuf>,
    format: Option<ReportFormat>,
) -> Result<()> {
    let output = output.unwrap_or_else(|| config.report_path.clone());
    let to_stdout = output.as_os_str() == STDOUT_PATH;
    let format = match format {
        Some(format) => format,
        None if to_stdout => ReportFormat::Text,
        None => ReportFormat::from_path(&output).ok_or_else(|| {
            anyhow!(
                "Cannot infer report format from '{}'; pass --format",
                output.display()
            )
        })?,
    };

    let table = load(config, file)?;
    let report = build_report(config, &table, branch);

    let bytes = match format {
        ReportFormat::Text => TextRenderer::new().render(&report)?.into_bytes(),
        ReportFormat::Markdown => MarkdownRenderer::new().render(&report)?.into_bytes(),
        ReportFormat::Xlsx => {
            if to_stdout {
                bail!("xlsx reports need an output file path");
            }
            ExcelRenderer::new().render(&report)?
        }
    };

    if to_stdout {
        std::io::stdout().write_all(&bytes)?;
    } else {
        std::fs::write(&output, &bytes)
            .with_context(|| format!("Failed to write '{}'", output.display()))?;
        info!(path = %output.display(), ?format, "report written");
        println!("Report written: {}", output.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn report_format_from_extension() {
        assert_eq!(
            ReportFormat::from_path(Path::new("out/relatorio.XLSX")),
            Some(ReportFormat::Xlsx)
        );
        assert_eq!(
            ReportFormat::from_path(Path::new("relatorio.md")),
            Some(ReportFormat::Markdown)
        );
        assert_eq!(
            ReportFormat::from_path(Path::new("relatorio.txt")),
            Some(ReportFormat::Text)
        );
        assert_eq!(ReportFormat::from_path(Path::new("relatorio.pdf")), None);
        assert_eq!(ReportFormat::from_path(Path::new("relatorio")), None);
    }

    #[test]
    fn dashboard_requires_branch() {
        let result = Cli::try_parse_from(["salesboard", "dashboard", "vendas.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["salesboard", "-vv", "branches"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
