//! Sales report assembly
//!
//! A [`SalesReport`] is the renderer-agnostic payload handed to exporters:
//! the branch summary table, its grand total and, when a branch was selected,
//! that branch's comparison and salesperson ranking.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//! use salesboard_core::{SalesRecord, SalesReport, SalesTable, Schema};
//!
//! let table = SalesTable::new(
//!     Schema::default(),
//!     vec![
//!         SalesRecord::new("A", Decimal::from(100)),
//!         SalesRecord::new("B", Decimal::from(200)),
//!     ],
//! );
//! let at = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(9, 30, 0).unwrap();
//!
//! let report = SalesReport::builder("Sales by Branch").generated_at(at).build(&table);
//! assert_eq!(report.summary[0].branch, "B");
//! assert_eq!(report.grand_total, Decimal::from(300));
//! ```

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{aggregate, AggregateError, BranchSummary, PerformanceStatus, Ranking, SalesTable};

/// Default currency symbol
pub const DEFAULT_CURRENCY: &str = "R$";

/// Detail block for the selected branch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchDetail {
    pub branch: String,
    pub branch_total: Decimal,
    /// Cross-branch average; `None` when no comparison is possible
    pub average: Option<Decimal>,
    pub status: Option<PerformanceStatus>,
    pub ranking: Ranking,
}

impl BranchDetail {
    /// Compute the detail block for a branch of the table
    pub fn compute(table: &SalesTable, branch: &str) -> Self {
        let records = table.records();
        let branch_total = aggregate::branch_total(records, branch);
        let (average, status) = match aggregate::overall_average(records) {
            Ok(avg) => (Some(avg), Some(aggregate::classify(branch_total, avg))),
            Err(AggregateError::NoComparableData) => (None, None),
        };
        Self {
            branch: branch.to_string(),
            branch_total,
            average,
            status,
            ranking: table.ranking_for_branch(branch),
        }
    }
}

/// Renderer input: summary table plus optional branch detail
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesReport {
    pub title: String,
    pub generated_at: NaiveDateTime,
    pub currency: String,
    pub summary: Vec<BranchSummary>,
    pub grand_total: Decimal,
    pub branch_detail: Option<BranchDetail>,
}

impl SalesReport {
    pub fn builder(title: impl Into<String>) -> SalesReportBuilder {
        SalesReportBuilder {
            title: title.into(),
            currency: DEFAULT_CURRENCY.to_string(),
            generated_at: None,
            branch: None,
        }
    }
}

/// Builder for [`SalesReport`]
#[derive(Clone, Debug)]
pub struct SalesReportBuilder {
    title: String,
    currency: String,
    generated_at: Option<NaiveDateTime>,
    branch: Option<String>,
}

impl SalesReportBuilder {
    /// Set currency symbol
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Fix the generation timestamp (defaults to local now)
    pub fn generated_at(mut self, at: NaiveDateTime) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Include the detail block for a branch
    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn build(self, table: &SalesTable) -> SalesReport {
        let summary = table.summary_table();
        let grand_total = summary.iter().map(|s| s.total).sum();
        let branch_detail = self
            .branch
            .as_deref()
            .map(|branch| BranchDetail::compute(table, branch));

        SalesReport {
            title: self.title,
            generated_at: self
                .generated_at
                .unwrap_or_else(|| chrono::Local::now().naive_local()),
            currency: self.currency,
            summary,
            grand_total,
            branch_detail,
        }
    }
}
