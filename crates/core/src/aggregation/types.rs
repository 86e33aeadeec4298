//! Aggregation result types.

use propledger_shared::types::{AnalysisPeriod, RecordId, YearMonth};
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budget::BudgetComparison;
use crate::records::{AttachmentRef, Category, CategoryCatalog, RecordIssue};

/// Total of one category. Amounts are positive magnitudes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Category label.
    pub category: Category,
    /// Summed magnitude.
    pub amount: Decimal,
}

/// Totals of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTotal {
    /// Month.
    pub month: YearMonth,
    /// Revenue.
    pub revenue: Decimal,
    /// Expenses, as a positive magnitude.
    pub expenses: Decimal,
    /// `revenue - expenses`.
    pub net: Decimal,
}

impl MonthTotal {
    /// A month with no activity.
    #[must_use]
    pub const fn zero(month: YearMonth) -> Self {
        Self {
            month,
            revenue: Decimal::ZERO,
            expenses: Decimal::ZERO,
            net: Decimal::ZERO,
        }
    }
}

/// One segment of a breakdown group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment label (category or source).
    pub label: String,
    /// Positive magnitude.
    pub amount: Decimal,
}

/// Totals of one building (building mode) or one section (project mode).
///
/// Building segments are expense categories; section segments are the
/// expense sources (invoices, orders, labour).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBreakdown {
    /// Building ID or section label.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Revenue of the group.
    pub revenue: Decimal,
    /// Expenses of the group, as a positive magnitude.
    pub expenses: Decimal,
    /// Segments in display order.
    pub segments: Vec<Segment>,
}

impl GroupBreakdown {
    /// Sum of the segments.
    #[must_use]
    pub fn segment_total(&self) -> Decimal {
        self.segments.iter().map(|s| s.amount).sum()
    }

    /// `revenue - expenses`.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.revenue - self.expenses
    }
}

/// A record excluded from totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Record ID.
    pub record_id: RecordId,
    /// Reason.
    pub issue: RecordIssue,
}

/// Summary metrics of a selection over an analysis period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Analysis period.
    pub period: AnalysisPeriod,
    /// Total revenue.
    pub total_revenue: Decimal,
    /// Total expenses, as a positive magnitude.
    pub total_expenses: Decimal,
    /// `total_revenue - total_expenses`.
    pub net_cashflow: Decimal,
    /// Investment basis used for ROI.
    pub investment_basis: Decimal,
    /// `net_cashflow / investment_basis × 100`, 2 decimals.
    pub roi: Decimal,
    /// Revenue per category.
    pub revenue_by_category: Vec<CategoryTotal>,
    /// Expenses per category (or section).
    pub expense_by_category: Vec<CategoryTotal>,
    /// One entry per month of the period.
    pub by_month: Vec<MonthTotal>,
    /// Per-building or per-section totals.
    pub breakdown: Vec<GroupBreakdown>,
    /// Budget comparison, project mode only.
    pub budget: Option<BudgetComparison>,
    /// Number of records included in the totals.
    pub record_count: usize,
    /// Records excluded as malformed.
    pub skipped: Vec<SkippedRecord>,
    /// Referenced documents, in record order, without duplicates.
    pub attachments: Vec<AttachmentRef>,
}

impl AggregationResult {
    /// Number of excluded records.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Builds a result from precomputed category and month totals.
    ///
    /// Totals are recomputed from the category lists so the cashflow
    /// identity holds, and missing months are filled with zeros.
    #[must_use]
    pub fn from_totals(
        period: AnalysisPeriod,
        revenue_by_category: Vec<CategoryTotal>,
        expense_by_category: Vec<CategoryTotal>,
        months: &[MonthTotal],
        investment_basis: Decimal,
    ) -> Self {
        let total_revenue: Decimal = revenue_by_category.iter().map(|c| c.amount).sum();
        let total_expenses: Decimal = expense_by_category.iter().map(|c| c.amount).sum();
        let net_cashflow = total_revenue - total_expenses;

        let by_month = period
            .months()
            .into_iter()
            .map(|month| {
                months
                    .iter()
                    .find(|m| m.month == month)
                    .map_or_else(
                        || MonthTotal::zero(month),
                        |m| MonthTotal {
                            net: m.revenue - m.expenses,
                            ..*m
                        },
                    )
            })
            .collect();

        Self {
            period,
            total_revenue,
            total_expenses,
            net_cashflow,
            investment_basis,
            roi: roi(net_cashflow, investment_basis),
            revenue_by_category,
            expense_by_category,
            by_month,
            breakdown: Vec::new(),
            budget: None,
            record_count: 0,
            skipped: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Category total by label.
    #[must_use]
    pub fn expense_for(&self, label: &str) -> Decimal {
        self.expense_by_category
            .iter()
            .find(|c| c.category.as_str() == label)
            .map_or(Decimal::ZERO, |c| c.amount)
    }
}

/// ROI in percent, rounded to 2 decimals; 0 for a zero or negative basis
/// and when the ratio does not fit a decimal.
#[must_use]
pub fn roi(net_cashflow: Decimal, basis: Decimal) -> Decimal {
    if basis <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    net_cashflow
        .checked_div(basis)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Decimal::ZERO, |roi| roi.round_dp(2))
}

/// Sum of the magnitudes of `amounts`, or `None` if it overflows.
///
/// Every partial total (per kind, category, month or group) and every
/// difference of two of them is bounded by this volume, so amounts whose
/// volume fits can be summed without checks.
#[must_use]
pub fn gross_volume(amounts: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |volume, amount| volume.checked_add(amount.abs()))
}

/// Sums amounts per category and orders the totals.
///
/// Catalog categories come first, in catalog order and zero when absent;
/// labels outside the catalog follow in lexical order.
pub fn ordered_totals(
    catalog: Option<CategoryCatalog>,
    amounts: impl IntoIterator<Item = (Category, Decimal)>,
) -> Vec<CategoryTotal> {
    let mut sums: BTreeMap<Category, Decimal> = BTreeMap::new();
    for (category, amount) in amounts {
        *sums.entry(category).or_default() += amount;
    }

    let mut totals: Vec<CategoryTotal> = catalog
        .iter()
        .flat_map(CategoryCatalog::categories)
        .map(|category| {
            let amount = sums.remove(&category).unwrap_or_default();
            CategoryTotal { category, amount }
        })
        .collect();

    totals.extend(
        sums.into_iter()
            .map(|(category, amount)| CategoryTotal { category, amount }),
    );
    totals
}
