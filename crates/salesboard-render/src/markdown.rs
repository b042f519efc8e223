//! Markdown report renderer
//!
//! ## Example Output
//!
//! ```text
//! # Sales Report by Branch
//!
//! _Generated: 01/06/2025 14:05_
//!
//! | Branch | Total Sold (R$) |
//! |--------|----------------:|
//! | Sul | R$ 200.00 |
//! | Norte | R$ 150.00 |
//! | **GRAND TOTAL** | **R$ 350.00** |
//! ```

use salesboard_core::{BranchDetail, Ranking, RenderError, Renderer, SalesReport};

use crate::{format_money, GENERATED_AT_FORMAT};

/// Markdown report renderer
#[derive(Clone, Debug)]
pub struct MarkdownRenderer {
    /// Heading level for the report title (1 = `#`)
    pub heading_level: usize,
    /// Whether to include the branch detail section
    pub include_detail: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self {
            heading_level: 1,
            include_detail: true,
        }
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title heading level (clamped to 1..=5)
    pub fn heading_level(mut self, level: usize) -> Self {
        self.heading_level = level.clamp(1, 5);
        self
    }

    /// Omit the branch detail section
    pub fn no_detail(mut self) -> Self {
        self.include_detail = false;
        self
    }

    /// Escape characters that would break a table cell
    fn escape(text: &str) -> String {
        text.replace('|', "\\|").replace(['\n', '\r'], " ")
    }

    fn render_detail(&self, detail: &BranchDetail, currency: &str, out: &mut String) {
        let sub = "#".repeat(self.heading_level + 1);
        out.push_str(&format!("\n{} Branch {}\n\n", sub, Self::escape(&detail.branch)));
        out.push_str("| Metric | Value |\n|--------|------:|\n");
        out.push_str(&format!(
            "| Branch total | {} |\n",
            format_money(detail.branch_total, currency)
        ));
        match (detail.average, detail.status) {
            (Some(avg), Some(status)) => {
                out.push_str(&format!("| Overall average | {} |\n", format_money(avg, currency)));
                out.push_str(&format!("| Status | {} |\n", status));
            }
            _ => out.push_str("| Overall average | unavailable |\n"),
        }

        match &detail.ranking {
            Ranking::Unavailable => {}
            Ranking::Ranked(entries) if entries.is_empty() => {
                out.push_str("\n_No sales for this branch._\n");
            }
            Ranking::Ranked(entries) => {
                out.push_str(&format!("\n{}# Salesperson ranking\n\n", sub));
                out.push_str("| # | Salesperson | Total |\n|---|-------------|------:|\n");
                for (pos, entry) in entries.iter().enumerate() {
                    out.push_str(&format!(
                        "| {} | {} | {} |\n",
                        pos + 1,
                        Self::escape(&entry.salesperson),
                        format_money(entry.total, currency)
                    ));
                }
            }
        }
    }
}

impl Renderer for MarkdownRenderer {
    type Output = String;

    fn render(&self, report: &SalesReport) -> Result<String, RenderError> {
        let currency = report.currency.as_str();
        let mut out = String::new();

        out.push_str(&format!(
            "{} {}\n\n",
            "#".repeat(self.heading_level),
            Self::escape(&report.title)
        ));
        out.push_str(&format!(
            "_Generated: {}_\n\n",
            report.generated_at.format(GENERATED_AT_FORMAT)
        ));

        out.push_str(&format!("| Branch | Total Sold ({}) |\n", currency));
        out.push_str("|--------|----------------:|\n");
        for entry in &report.summary {
            out.push_str(&format!(
                "| {} | {} |\n",
                Self::escape(&entry.branch),
                format_money(entry.total, currency)
            ));
        }
        out.push_str(&format!(
            "| **GRAND TOTAL** | **{}** |\n",
            format_money(report.grand_total, currency)
        ));

        if self.include_detail {
            if let Some(detail) = &report.branch_detail {
                self.render_detail(detail, currency, &mut out);
            }
        }

        Ok(out)
    }
}
