//! Excel report renderer
//!
//! Generates an XLSX workbook with:
//! - Summary: one row per branch (highest total first) plus a grand total row
//! - Branch Detail: metrics and salesperson ranking for the selected branch,
//!   only when the report carries a branch detail
//!
//! ## Example Output Structure
//!
//! ```text
//! Sheet: Summary
//! | Sales Report by Branch          |
//! | Generated: | 01/06/2025 14:05   |
//! |                                 |
//! | Branch      | Total Sold (R$)   |
//! |-------------|-------------------|
//! | Sul         | 200.00            |
//! | Norte       | 150.00            |
//! | GRAND TOTAL | 350.00            |
//! ```
//!
//! Amounts are written as numbers with a currency number format so the
//! sheet stays usable for further calculation.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use salesboard_core::{BranchDetail, Ranking, RenderError, Renderer, SalesReport};

use crate::GENERATED_AT_FORMAT;

/// Excel report renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Currency symbol override (defaults to the report currency)
    pub currency: Option<String>,
    /// Whether to include the Branch Detail sheet
    pub include_detail: bool,
    /// Width of the branch/salesperson column
    pub name_column_width: f64,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            currency: None,
            include_detail: true,
            name_column_width: 30.0,
        }
    }
}

struct ExcelFormats {
    title: Format,
    header: Format,
    text: Format,
    currency: Format,
    total_row: Format,
    total_currency: Format,
}

fn xlsx_err(e: XlsxError) -> RenderError {
    RenderError::Format(e.to_string())
}

fn amount(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override currency symbol
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Disable the Branch Detail sheet
    pub fn no_detail(mut self) -> Self {
        self.include_detail = false;
        self
    }

    /// Set the name column width
    pub fn name_column_width(mut self, width: f64) -> Self {
        self.name_column_width = width;
        self
    }

    fn currency_for<'a>(&'a self, report: &'a SalesReport) -> &'a str {
        self.currency.as_deref().unwrap_or(&report.currency)
    }

    /// Create reusable formats
    fn create_formats(&self, currency: &str) -> ExcelFormats {
        let num_format = format!("\"{}\" #,##0.00", currency.replace('"', ""));

        let title = Format::new().set_bold().set_font_size(14);

        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(0x4472C4)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        let text = Format::new().set_border(FormatBorder::Thin);

        let currency = Format::new()
            .set_num_format(&num_format)
            .set_border(FormatBorder::Thin);

        let total_row = Format::new()
            .set_bold()
            .set_background_color(0xE2EFDA)
            .set_border(FormatBorder::Thin);

        let total_currency = Format::new()
            .set_bold()
            .set_num_format(&num_format)
            .set_background_color(0xE2EFDA)
            .set_border(FormatBorder::Thin);

        ExcelFormats {
            title,
            header,
            text,
            currency,
            total_row,
            total_currency,
        }
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, report: &SalesReport) -> Result<Vec<u8>, RenderError> {
        let currency = self.currency_for(report);
        let formats = self.create_formats(currency);
        let mut workbook = Workbook::new();

        self.add_summary_sheet(&mut workbook, report, currency, &formats)?;

        if self.include_detail {
            if let Some(detail) = &report.branch_detail {
                self.add_detail_sheet(&mut workbook, detail, &formats)?;
            }
        }

        let bytes = workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))?;
        tracing::debug!(
            branches = report.summary.len(),
            detail = report.branch_detail.is_some(),
            bytes = bytes.len(),
            "rendered workbook"
        );
        Ok(bytes)
    }

    /// Add Summary sheet
    fn add_summary_sheet(
        &self,
        workbook: &mut Workbook,
        report: &SalesReport,
        currency: &str,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary").map_err(xlsx_err)?;

        sheet
            .write_with_format(0, 0, report.title.as_str(), &formats.title)
            .map_err(xlsx_err)?;
        sheet.write(1, 0, "Generated:").map_err(xlsx_err)?;
        sheet
            .write(1, 1, report.generated_at.format(GENERATED_AT_FORMAT).to_string())
            .map_err(xlsx_err)?;

        let header_row = 3;
        sheet
            .write_with_format(header_row, 0, "Branch", &formats.header)
            .map_err(xlsx_err)?;
        sheet
            .write_with_format(
                header_row,
                1,
                format!("Total Sold ({currency})"),
                &formats.header,
            )
            .map_err(xlsx_err)?;

        let mut row = header_row + 1;
        for entry in &report.summary {
            sheet
                .write_with_format(row, 0, entry.branch.as_str(), &formats.text)
                .map_err(xlsx_err)?;
            sheet
                .write_with_format(row, 1, amount(entry.total), &formats.currency)
                .map_err(xlsx_err)?;
            row += 1;
        }

        sheet
            .write_with_format(row, 0, "GRAND TOTAL", &formats.total_row)
            .map_err(xlsx_err)?;
        sheet
            .write_with_format(row, 1, amount(report.grand_total), &formats.total_currency)
            .map_err(xlsx_err)?;

        self.set_widths(sheet);
        Ok(())
    }

    /// Add Branch Detail sheet with metrics and ranking
    fn add_detail_sheet(
        &self,
        workbook: &mut Workbook,
        detail: &BranchDetail,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Branch Detail").map_err(xlsx_err)?;

        sheet
            .write_with_format(0, 0, format!("Branch: {}", detail.branch), &formats.title)
            .map_err(xlsx_err)?;

        sheet
            .write_with_format(2, 0, "Branch total", &formats.text)
            .map_err(xlsx_err)?;
        sheet
            .write_with_format(2, 1, amount(detail.branch_total), &formats.currency)
            .map_err(xlsx_err)?;

        sheet
            .write_with_format(3, 0, "Overall average", &formats.text)
            .map_err(xlsx_err)?;
        sheet
            .write_with_format(4, 0, "Status", &formats.text)
            .map_err(xlsx_err)?;
        match (detail.average, detail.status) {
            (Some(avg), Some(status)) => {
                sheet
                    .write_with_format(3, 1, amount(avg), &formats.currency)
                    .map_err(xlsx_err)?;
                sheet
                    .write_with_format(4, 1, status.as_str(), &formats.text)
                    .map_err(xlsx_err)?;
            }
            _ => {
                sheet
                    .write_with_format(3, 1, "unavailable", &formats.text)
                    .map_err(xlsx_err)?;
                sheet
                    .write_with_format(4, 1, "unavailable", &formats.text)
                    .map_err(xlsx_err)?;
            }
        }

        match &detail.ranking {
            Ranking::Unavailable => {}
            Ranking::Ranked(entries) if entries.is_empty() => {
                sheet.write(6, 0, "No sales for this branch.").map_err(xlsx_err)?;
            }
            Ranking::Ranked(entries) => {
                sheet
                    .write_with_format(6, 0, "Salesperson", &formats.header)
                    .map_err(xlsx_err)?;
                sheet
                    .write_with_format(6, 1, "Total", &formats.header)
                    .map_err(xlsx_err)?;
                for (row, entry) in (7u32..).zip(entries) {
                    sheet
                        .write_with_format(row, 0, entry.salesperson.as_str(), &formats.text)
                        .map_err(xlsx_err)?;
                    sheet
                        .write_with_format(row, 1, amount(entry.total), &formats.currency)
                        .map_err(xlsx_err)?;
                }
            }
        }

        self.set_widths(sheet);
        Ok(())
    }

    fn set_widths(&self, sheet: &mut Worksheet) {
        sheet.set_column_width(0, self.name_column_width).ok();
        sheet.set_column_width(1, 20).ok();
    }
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, report: &SalesReport) -> Result<Vec<u8>, RenderError> {
        if report.summary.is_empty() {
            return Err(RenderError::InvalidData("No branches to render".into()));
        }
        self.render_to_bytes(report)
    }
}
