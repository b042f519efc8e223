//! Sales aggregation
//!
//! Stateless functions over a slice of [`SalesRecord`]s. Every derived value
//! is recomputed from the records passed in; nothing is cached.
//!
//! Two-stage averaging: [`overall_average`] is the mean of the per-branch
//! totals, so a branch with many small sales weighs the same as a branch with
//! a single large one.
//!
//! ```text
//! records ──► branch_totals ──► summary_table (sorted desc, stable)
//!    │                 └──────► overall_average ──┐
//!    └──► filter_by_branch ──► branch_total ──────┴─► classify
//!                      └─────► rank_salespersons
//! ```

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    AggregateError, BranchComparison, BranchSummary, PerformanceStatus, SalesRecord,
    SalespersonRanking,
};

// ============================================================================
// Branch Totals
// ============================================================================

/// Per-branch sums
///
/// Lookup is by branch name. Iteration follows first-encounter order, which
/// [`summary_table`] relies on for its tie order; callers should not treat it
/// as a meaningful ordering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BranchTotals {
    entries: Vec<BranchSummary>,
    index: HashMap<String, usize>,
}

impl BranchTotals {
    fn add(&mut self, branch: &str, amount: Decimal) {
        match self.index.get(branch) {
            Some(&idx) => self.entries[idx].total += amount,
            None => {
                self.index.insert(branch.to_string(), self.entries.len());
                self.entries.push(BranchSummary::new(branch, amount));
            }
        }
    }

    /// Total for a branch, if it appears in the records
    pub fn get(&self, branch: &str) -> Option<Decimal> {
        self.index.get(branch).map(|&idx| self.entries[idx].total)
    }

    pub fn contains(&self, branch: &str) -> bool {
        self.index.contains_key(branch)
    }

    /// Number of distinct branches
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries.iter().map(|e| (e.branch.as_str(), e.total))
    }

    pub fn values(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.entries.iter().map(|e| e.total)
    }

    /// Sum of all branch totals
    pub fn sum(&self) -> Decimal {
        self.values().sum()
    }

    /// Mean of the branch totals
    pub fn mean(&self) -> Result<Decimal, AggregateError> {
        if self.entries.is_empty() {
            return Err(AggregateError::NoComparableData);
        }
        Ok(self.sum() / Decimal::from(self.entries.len()))
    }

    fn into_entries(self) -> Vec<BranchSummary> {
        self.entries
    }
}

/// Group records by branch and sum their amounts
///
/// Records with a null or empty branch are skipped.
pub fn branch_totals(records: &[SalesRecord]) -> BranchTotals {
    let mut totals = BranchTotals::default();
    for record in records {
        if let Some(branch) = record.branch_key() {
            totals.add(branch, record.amount);
        }
    }
    totals
}

/// Mean of the per-branch totals
///
/// Returns [`AggregateError::NoComparableData`] when no record carries a branch.
pub fn overall_average(records: &[SalesRecord]) -> Result<Decimal, AggregateError> {
    let totals = branch_totals(records);
    if totals.is_empty() {
        debug!(records = records.len(), "no branches to average");
    }
    totals.mean()
}

// ============================================================================
// Branch Filter
// ============================================================================

/// Records whose branch matches exactly
///
/// Records with a null or empty branch never match, so an empty `branch`
/// selects nothing.
pub fn filter_by_branch(records: &[SalesRecord], branch: &str) -> Vec<SalesRecord> {
    records
        .iter()
        .filter(|r| r.branch_key() == Some(branch))
        .cloned()
        .collect()
}

/// Sum of amounts for one branch; zero when the branch has no records
pub fn branch_total(records: &[SalesRecord], branch: &str) -> Decimal {
    records
        .iter()
        .filter(|r| r.branch_key() == Some(branch))
        .map(|r| r.amount)
        .sum()
}

// ============================================================================
// Rankings & Summaries
// ============================================================================

/// Sum amounts per key in first-encounter order
fn sum_by_key<'a, F>(records: &'a [SalesRecord], key: F) -> Vec<(&'a str, Decimal)>
where
    F: Fn(&'a SalesRecord) -> Option<&'a str>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut sums: Vec<(&str, Decimal)> = Vec::new();
    for record in records {
        let Some(k) = key(record) else { continue };
        match index.get(k) {
            Some(&idx) => sums[idx].1 += record.amount,
            None => {
                index.insert(k, sums.len());
                sums.push((k, record.amount));
            }
        }
    }
    sums
}

/// Rank salespeople by summed amount, highest first
///
/// Expects a branch-filtered subset. Records without a salesperson are not
/// ranked. Ties keep the order in which salespeople first appear.
pub fn rank_salespersons(records: &[SalesRecord]) -> Vec<SalespersonRanking> {
    let mut ranking: Vec<SalespersonRanking> = sum_by_key(records, |r| r.salesperson_key())
        .into_iter()
        .map(|(name, total)| SalespersonRanking::new(name, total))
        .collect();
    // sort_by is stable
    ranking.sort_by(|a, b| b.total.cmp(&a.total));
    ranking
}

/// Branch totals sorted by total, highest first
///
/// Ties keep first-encounter order, so the result is deterministic for a
/// given input order.
pub fn summary_table(records: &[SalesRecord]) -> Vec<BranchSummary> {
    let mut summary = branch_totals(records).into_entries();
    summary.sort_by(|a, b| b.total.cmp(&a.total));
    debug!(branches = summary.len(), "built summary table");
    summary
}

/// Sum of amounts over records that carry a branch
pub fn grand_total(records: &[SalesRecord]) -> Decimal {
    records
        .iter()
        .filter(|r| r.branch_key().is_some())
        .map(|r| r.amount)
        .sum()
}

/// Distinct branches, sorted ascending
pub fn branches(records: &[SalesRecord]) -> Vec<String> {
    let mut names: Vec<String> = branch_totals(records)
        .iter()
        .map(|(name, _)| name.to_string())
        .collect();
    names.sort();
    names
}

// ============================================================================
// Comparison
// ============================================================================

/// Classify a branch total against the average
///
/// Equality counts as at-or-above.
pub fn classify(branch_total: Decimal, average: Decimal) -> PerformanceStatus {
    if branch_total < average {
        PerformanceStatus::BelowAverage
    } else {
        PerformanceStatus::AtOrAboveAverage
    }
}

/// Branch total, overall average and the resulting classification
pub fn compare_branch(
    records: &[SalesRecord],
    branch: &str,
) -> Result<BranchComparison, AggregateError> {
    let average = overall_average(records)?;
    let total = branch_total(records, branch);
    Ok(BranchComparison {
        branch: branch.to_string(),
        branch_total: total,
        average,
        status: classify(total, average),
    })
}

// ============================================================================
// Series
// ============================================================================

/// Daily totals, ascending by date; undated records are skipped
pub fn totals_by_date(records: &[SalesRecord]) -> Vec<(NaiveDate, Decimal)> {
    let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.date {
            *days.entry(date).or_default() += record.amount;
        }
    }
    days.into_iter().collect()
}

/// Product totals, highest first; records without a product are skipped
pub fn totals_by_product(records: &[SalesRecord]) -> Vec<(String, Decimal)> {
    let mut products: Vec<(String, Decimal)> =
        sum_by_key(records, |r| r.product.as_deref().filter(|p| !p.is_empty()))
            .into_iter()
            .map(|(name, total)| (name.to_string(), total))
            .collect();
    products.sort_by(|a, b| b.1.cmp(&a.1));
    products
}

// ============================================================================
// Tests
// ============================================================================
