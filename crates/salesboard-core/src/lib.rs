//! # salesboard-core
//!
//! Core domain model and aggregation kernel for salesboard.
//!
//! This crate provides:
//! - Domain types: `SalesRecord`, `SalesTable`, `Schema`, `BranchSummary`, `SalespersonRanking`, `DailyTotal`, `ProductTotal`
//! - The sales aggregator (see [`aggregate`])
//! - Report assembly (see [`report`]) and the `Renderer` trait
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use salesboard_core::{aggregate, SalesRecord};
//!
//! let records = vec![
//!     SalesRecord::new("A", Decimal::from(100)),
//!     SalesRecord::new("A", Decimal::from(50)),
//!     SalesRecord::new("B", Decimal::from(200)),
//! ];
//!
//! let average = aggregate::overall_average(&records).unwrap();
//! assert_eq!(average, Decimal::from(175));
//! assert_eq!(aggregate::branch_total(&records, "A"), Decimal::from(150));
//! ```

pub mod aggregate;
pub mod report;

pub use aggregate::BranchTotals;
pub use report::{BranchDetail, SalesReport};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Records
// ============================================================================

/// One row of the input table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Branch identifier (null cells load as `None`)
    pub branch: Option<String>,
    /// Monetary value, may be zero or negative
    pub amount: Decimal,
    pub salesperson: Option<String>,
    pub date: Option<NaiveDate>,
    pub product: Option<String>,
}

impl SalesRecord {
    /// Create a record for the given branch
    pub fn new(branch: impl Into<String>, amount: Decimal) -> Self {
        Self {
            branch: Some(branch.into()),
            amount,
            salesperson: None,
            date: None,
            product: None,
        }
    }

    /// Create a record whose branch cell was empty
    pub fn without_branch(amount: Decimal) -> Self {
        Self {
            branch: None,
            amount,
            salesperson: None,
            date: None,
            product: None,
        }
    }

    /// Set the salesperson
    pub fn salesperson(mut self, salesperson: impl Into<String>) -> Self {
        self.salesperson = Some(salesperson.into());
        self
    }

    /// Set the sale date
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the product
    pub fn product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    /// Branch usable as a grouping key (non-null, non-empty)
    pub fn branch_key(&self) -> Option<&str> {
        self.branch.as_deref().filter(|b| !b.is_empty())
    }

    /// Salesperson usable as a grouping key (non-null, non-empty)
    pub fn salesperson_key(&self) -> Option<&str> {
        self.salesperson.as_deref().filter(|s| !s.is_empty())
    }
}

// ============================================================================
// Schema & Table
// ============================================================================

/// Optional columns present in the loaded table
///
/// Resolved once by the loader. The required `branch` and `amount` columns
/// are always present on a validated table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub has_salesperson: bool,
    pub has_date: bool,
    pub has_product: bool,
}

impl Schema {
    /// Schema with every optional column present
    pub fn full() -> Self {
        Self {
            has_salesperson: true,
            has_date: true,
            has_product: true,
        }
    }

    pub fn with_salesperson(mut self) -> Self {
        self.has_salesperson = true;
        self
    }

    pub fn with_date(mut self) -> Self {
        self.has_date = true;
        self
    }

    pub fn with_product(mut self) -> Self {
        self.has_product = true;
        self
    }
}

/// A validated, immutable table of sales records
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesTable {
    schema: Schema,
    records: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn new(schema: Schema, records: Vec<SalesRecord>) -> Self {
        Self { schema, records }
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct branches, sorted, for a branch selector
    pub fn branches(&self) -> Vec<String> {
        aggregate::branches(&self.records)
    }

    /// Salesperson ranking within one branch, gated on the schema
    pub fn ranking_for_branch(&self, branch: &str) -> Ranking {
        if !self.schema.has_salesperson {
            return Ranking::Unavailable;
        }
        let subset = aggregate::filter_by_branch(&self.records, branch);
        Ranking::Ranked(aggregate::rank_salespersons(&subset))
    }

    /// Branch total against the cross-branch average
    pub fn compare_branch(&self, branch: &str) -> Result<BranchComparison, AggregateError> {
        aggregate::compare_branch(&self.records, branch)
    }

    pub fn summary_table(&self) -> Vec<BranchSummary> {
        aggregate::summary_table(&self.records)
    }

    /// Per-day totals, ascending; `None` without a date column
    pub fn daily_totals(&self) -> Option<Vec<DailyTotal>> {
        self.schema.has_date.then(|| {
            aggregate::totals_by_date(&self.records)
                .into_iter()
                .map(|(date, total)| DailyTotal { date, total })
                .collect()
        })
    }

    /// Per-product totals, highest first; `None` without a product column
    pub fn product_totals(&self) -> Option<Vec<ProductTotal>> {
        self.schema.has_product.then(|| {
            aggregate::totals_by_product(&self.records)
                .into_iter()
                .map(|(product, total)| ProductTotal { product, total })
                .collect()
        })
    }
}

// ============================================================================
// Derived Entities
// ============================================================================

/// Total sold by one branch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSummary {
    pub branch: String,
    pub total: Decimal,
}

impl BranchSummary {
    pub fn new(branch: impl Into<String>, total: Decimal) -> Self {
        Self {
            branch: branch.into(),
            total,
        }
    }
}

/// Total sold by one salesperson inside a branch subset
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalespersonRanking {
    pub salesperson: String,
    pub total: Decimal,
}

impl SalespersonRanking {
    pub fn new(salesperson: impl Into<String>, total: Decimal) -> Self {
        Self {
            salesperson: salesperson.into(),
            total,
        }
    }
}

/// Outcome of a salesperson ranking request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entries", rename_all = "snake_case")]
pub enum Ranking {
    /// The table has no salesperson column
    Unavailable,
    /// Ranked salespeople; empty when the branch has no sales
    Ranked(Vec<SalespersonRanking>),
}

impl Ranking {
    pub fn is_available(&self) -> bool {
        matches!(self, Ranking::Ranked(_))
    }

    /// Entries when the ranking is available
    pub fn entries(&self) -> Option<&[SalespersonRanking]> {
        match self {
            Ranking::Ranked(entries) => Some(entries),
            Ranking::Unavailable => None,
        }
    }
}

/// Branch performance relative to the cross-branch average
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceStatus {
    /// Branch total strictly below the average
    BelowAverage,
    /// Branch total equal to or above the average
    AtOrAboveAverage,
}

impl PerformanceStatus {
    /// Get the display string for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceStatus::BelowAverage => "Below average",
            PerformanceStatus::AtOrAboveAverage => "At or above average",
        }
    }

    pub fn is_below(&self) -> bool {
        matches!(self, PerformanceStatus::BelowAverage)
    }
}

impl std::fmt::Display for PerformanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dashboard metric pair for a selected branch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchComparison {
    pub branch: String,
    pub branch_total: Decimal,
    pub average: Decimal,
    pub status: PerformanceStatus,
}

/// Amount sold on one day
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: Decimal,
}

/// Amount sold for one product
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTotal {
    pub product: String,
    pub total: Decimal,
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a sales report to the output format
    fn render(&self, report: &SalesReport) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Aggregation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("No comparable data: the table has no branches")]
    NoComparableData,
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn record_builder() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let record = SalesRecord::new("Centro", dec!(99.90))
            .salesperson("Ana")
            .product("Notebook")
            .date(date);

        assert_eq!(record.branch.as_deref(), Some("Centro"));
        assert_eq!(record.amount, dec!(99.90));
        assert_eq!(record.salesperson.as_deref(), Some("Ana"));
        assert_eq!(record.product.as_deref(), Some("Notebook"));
        assert_eq!(record.date, Some(date));
    }

    #[test]
    fn empty_branch_has_no_key() {
        assert_eq!(SalesRecord::new("", dec!(1)).branch_key(), None);
        assert_eq!(SalesRecord::without_branch(dec!(1)).branch_key(), None);
        assert_eq!(SalesRecord::new("Norte", dec!(1)).branch_key(), Some("Norte"));
    }

    #[test]
    fn ranking_unavailable_without_salesperson_column() {
        let table = SalesTable::new(
            Schema::default(),
            vec![SalesRecord::new("A", dec!(10)).salesperson("X")],
        );
        assert_eq!(table.ranking_for_branch("A"), Ranking::Unavailable);
        assert!(table.ranking_for_branch("A").entries().is_none());
    }

    #[test]
    fn ranking_empty_for_unknown_branch() {
        let table = SalesTable::new(
            Schema::default().with_salesperson(),
            vec![SalesRecord::new("A", dec!(10)).salesperson("X")],
        );
        let ranking = table.ranking_for_branch("Z");
        assert!(ranking.is_available());
        assert_eq!(ranking.entries(), Some(&[][..]));
    }

    #[test]
    fn series_follow_schema() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let records = vec![
            SalesRecord::new("A", dec!(10)).date(day).product("Mouse"),
            SalesRecord::new("B", dec!(30)).date(day).product("Cabo"),
        ];

        let bare = SalesTable::new(Schema::default(), records.clone());
        assert_eq!(bare.daily_totals(), None);
        assert_eq!(bare.product_totals(), None);

        let table = SalesTable::new(Schema::default().with_date().with_product(), records);
        assert_eq!(
            table.daily_totals(),
            Some(vec![DailyTotal {
                date: day,
                total: dec!(40)
            }])
        );
        let products = table.product_totals().unwrap();
        assert_eq!(products[0].product, "Cabo");
        assert_eq!(products[1].product, "Mouse");
    }

    #[test]
    fn schema_builders() {
        let schema = Schema::default().with_date().with_product();
        assert!(!schema.has_salesperson);
        assert!(schema.has_date);
        assert!(schema.has_product);
        assert_eq!(Schema::full(), schema.with_salesperson());
    }

    #[test]
    fn status_display() {
        assert_eq!(PerformanceStatus::BelowAverage.to_string(), "Below average");
        assert!(PerformanceStatus::BelowAverage.is_below());
        assert!(!PerformanceStatus::AtOrAboveAverage.is_below());
    }

    #[test]
    fn error_display() {
        let msg = AggregateError::NoComparableData.to_string();
        assert!(msg.contains("no branches"));

        let err = RenderError::InvalidData("empty summary".into());
        assert!(err.to_string().contains("empty summary"));
    }
}
