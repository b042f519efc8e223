//! # salesboard-render
//!
//! Report exporters for salesboard.
//!
//! This crate provides:
//! - Plain text reports (terminal, `.txt`)
//! - Markdown reports (for wikis and chat tools)
//! - Excel workbooks with a summary sheet and an optional branch detail sheet
//!
//! ## Example
//!
//! ```rust,ignore
//! use salesboard_core::{Renderer, SalesReport};
//! use salesboard_render::{ExcelRenderer, MarkdownRenderer, TextRenderer};
//!
//! let report = SalesReport::builder("Sales by Branch").branch("Centro").build(&table);
//!
//! let text = TextRenderer::new().render(&report)?;
//! let markdown = MarkdownRenderer::new().render(&report)?;
//! let xlsx_bytes = ExcelRenderer::new().render(&report)?;
//! std::fs::write("relatorio_vendas.xlsx", xlsx_bytes)?;
//! ```

pub mod excel;
pub mod markdown;

pub use excel::ExcelRenderer;
pub use markdown::MarkdownRenderer;

use rust_decimal::{Decimal, RoundingStrategy};
use salesboard_core::{BranchDetail, Ranking, RenderError, Renderer, SalesReport};

/// Timestamp layout used in report headers
pub const GENERATED_AT_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Format an amount as `R$ 1,234.56`
///
/// Two decimals, `,` thousands separator, midpoint rounded away from zero.
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().to_string();
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if currency.is_empty() {
        format!("{sign}{grouped}.{frac_part}")
    } else {
        format!("{currency} {sign}{grouped}.{frac_part}")
    }
}

/// Plain text report renderer
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Width of the branch column in characters
    pub branch_width: usize,
    /// Whether to print the generation timestamp
    pub show_generated: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            branch_width: 30,
            show_generated: true,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure branch column width
    pub fn branch_width(mut self, width: usize) -> Self {
        self.branch_width = width;
        self
    }

    /// Omit the generation timestamp
    pub fn no_timestamp(mut self) -> Self {
        self.show_generated = false;
        self
    }

    fn row(&self, label: &str, value: &str) -> String {
        format!("{:<width$} | {}\n", label, value, width = self.branch_width)
    }

    /// Render the metrics and ranking block for one branch
    pub fn render_branch_detail(&self, detail: &BranchDetail, currency: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("Branch: {}\n", detail.branch));
        out.push_str(&format!(
            "  Branch total:    {}\n",
            format_money(detail.branch_total, currency)
        ));
        match (detail.average, detail.status) {
            (Some(avg), Some(status)) => {
                out.push_str(&format!("  Overall average: {}\n", format_money(avg, currency)));
                out.push_str(&format!("  Status:          {}\n", status));
            }
            _ => out.push_str("  Overall average: unavailable\n"),
        }

        match &detail.ranking {
            Ranking::Unavailable => {}
            Ranking::Ranked(entries) if entries.is_empty() => {
                out.push_str("\nNo sales for this branch.\n");
            }
            Ranking::Ranked(entries) => {
                out.push_str("\nSalesperson ranking:\n");
                let name_width = entries
                    .iter()
                    .map(|e| e.salesperson.chars().count())
                    .max()
                    .unwrap_or(0);
                for (pos, entry) in entries.iter().enumerate() {
                    out.push_str(&format!(
                        "  {:>2}. {:<width$}  {}\n",
                        pos + 1,
                        entry.salesperson,
                        format_money(entry.total, currency),
                        width = name_width
                    ));
                }
            }
        }
        out
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, report: &SalesReport) -> Result<String, RenderError> {
        let currency = report.currency.as_str();
        let mut out = String::new();

        out.push_str(&report.title);
        out.push('\n');
        if self.show_generated {
            out.push_str(&format!(
                "Generated: {}\n",
                report.generated_at.format(GENERATED_AT_FORMAT)
            ));
        }
        out.push('\n');

        out.push_str(&self.row("Branch", &format!("Total Sold ({currency})")));
        out.push_str(&format!("{}-+-{}\n", "-".repeat(self.branch_width), "-".repeat(16)));

        if report.summary.is_empty() {
            out.push_str("(no branches)\n");
        }
        for entry in &report.summary {
            out.push_str(&self.row(&entry.branch, &format_money(entry.total, currency)));
        }

        out.push_str(&format!("{}-+-{}\n", "-".repeat(self.branch_width), "-".repeat(16)));
        out.push_str(&self.row("GRAND TOTAL", &format_money(report.grand_total, currency)));

        if let Some(detail) = &report.branch_detail {
            out.push('\n');
            out.push_str(&self.render_branch_detail(detail, currency));
        }

        Ok(out)
    }
}
