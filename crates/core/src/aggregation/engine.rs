//! Aggregation engine.

use std::collections::{BTreeMap, HashSet};

use propledger_shared::types::{AnalysisPeriod, YearMonth};
use rust_decimal::Decimal;
use tracing::debug;

use super::scope::Scope;
use super::types::{
    AggregationResult, CategoryTotal, GroupBreakdown, MonthTotal, Segment, SkippedRecord,
    ordered_totals, roi,
};
use crate::budget::BudgetService;
use crate::records::{
    AttachmentRef, Category, CategoryCatalog, FinancialRecord, RecordIssue, RecordKind,
    RecordOwner, RecordSource,
};

/// Pure aggregation engine: same inputs, same result.
pub struct AggregationEngine;

/// A record that passed scope, validity and period filtering.
struct Included<'a> {
    record: &'a FinancialRecord,
    month: YearMonth,
    /// Positive magnitude.
    magnitude: Decimal,
}

impl AggregationEngine {
    /// Aggregates `records` for `scope` over `period`, using the scope's
    /// default investment basis.
    #[must_use]
    pub fn aggregate(
        records: &[FinancialRecord],
        period: &AnalysisPeriod,
        scope: &Scope,
    ) -> AggregationResult {
        Self::aggregate_with_basis(records, period, scope, None)
    }

    /// Aggregates with an explicit investment basis overriding the scope's.
    ///
    /// Records owned outside the scope are ignored. Malformed records in
    /// scope are excluded and listed in `skipped`; well-formed records
    /// outside the period are ignored.
    #[must_use]
    pub fn aggregate_with_basis(
        records: &[FinancialRecord],
        period: &AnalysisPeriod,
        scope: &Scope,
        basis_override: Option<Decimal>,
    ) -> AggregationResult {
        let mut skipped = Vec::new();
        let mut included = Vec::new();
        let mut volume = Decimal::ZERO;

        for record in records.iter().filter(|r| scope.owns(&r.owner)) {
            let issue = match record.check() {
                Ok((_, date)) if !period.contains(date) => continue,
                Ok((amount, date)) => match volume.checked_add(amount.abs()) {
                    Some(total) => {
                        volume = total;
                        included.push(Included {
                            record,
                            month: YearMonth::from_date(date),
                            magnitude: amount.abs(),
                        });
                        continue;
                    }
                    None => RecordIssue::AmountOutOfRange,
                },
                Err(issue) => issue,
            };
            skipped.push(SkippedRecord {
                record_id: record.id.clone(),
                issue,
            });
        }

        debug!(
            included = included.len(),
            skipped = skipped.len(),
            months = period.month_count(),
            "Aggregating records"
        );

        let (total_revenue, total_expenses) = sum_by_kind(included.iter());
        let net_cashflow = total_revenue - total_expenses;
        let investment_basis = basis_override.unwrap_or_else(|| scope.investment_basis());

        let revenue_by_category =
            category_totals(scope.revenue_catalog(), &included, RecordKind::Revenue);
        let expense_by_category =
            category_totals(Some(scope.expense_catalog()), &included, RecordKind::Expense);

        let budget = match scope {
            Scope::Project(project) => Some(BudgetService::compare(project.budget, total_expenses)),
            Scope::Buildings(_) => None,
        };

        AggregationResult {
            period: *period,
            total_revenue,
            total_expenses,
            net_cashflow,
            investment_basis,
            roi: roi(net_cashflow, investment_basis),
            revenue_by_category,
            expense_by_category,
            by_month: month_totals(period, &included),
            breakdown: breakdown(scope, &included),
            budget,
            record_count: included.len(),
            skipped,
            attachments: attachments(&included),
        }
    }
}

fn sum_by_kind<'a, 'r: 'a>(
    records: impl Iterator<Item = &'a Included<'r>>,
) -> (Decimal, Decimal) {
    records.fold((Decimal::ZERO, Decimal::ZERO), |(revenue, expenses), r| {
        match r.record.kind {
            RecordKind::Revenue => (revenue + r.magnitude, expenses),
            RecordKind::Expense => (revenue, expenses + r.magnitude),
        }
    })
}

fn category_totals(
    catalog: Option<CategoryCatalog>,
    included: &[Included<'_>],
    kind: RecordKind,
) -> Vec<CategoryTotal> {
    ordered_totals(
        catalog,
        included
            .iter()
            .filter(|r| r.record.kind == kind)
            .map(|r| (r.record.category.clone(), r.magnitude)),
    )
}

fn month_totals(period: &AnalysisPeriod, included: &[Included<'_>]) -> Vec<MonthTotal> {
    let mut months: BTreeMap<YearMonth, MonthTotal> = period
        .months()
        .into_iter()
        .map(|month| (month, MonthTotal::zero(month)))
        .collect();

    for r in included {
        if let Some(total) = months.get_mut(&r.month) {
            match r.record.kind {
                RecordKind::Revenue => total.revenue += r.magnitude,
                RecordKind::Expense => total.expenses += r.magnitude,
            }
            total.net = total.revenue - total.expenses;
        }
    }
    months.into_values().collect()
}

fn breakdown(scope: &Scope, included: &[Included<'_>]) -> Vec<GroupBreakdown> {
    match scope {
        Scope::Buildings(buildings) => buildings
            .iter()
            .map(|building| {
                let owned: Vec<&Included<'_>> = included
                    .iter()
                    .filter(|r| {
                        matches!(&r.record.owner, RecordOwner::Building(id) if *id == building.id)
                    })
                    .collect();
                let (revenue, expenses) = sum_by_kind(owned.iter().copied());

                let expenses_by_category = owned
                    .iter()
                    .filter(|r| r.record.kind == RecordKind::Expense)
                    .map(|r| (r.record.category.clone(), r.magnitude));
                let segments =
                    ordered_totals(Some(CategoryCatalog::BUILDING_EXPENSE), expenses_by_category)
                        .into_iter()
                        .filter(|t| !t.amount.is_zero())
                        .map(|t| Segment {
                            label: t.category.as_str().to_string(),
                            amount: t.amount,
                        })
                        .collect();

                GroupBreakdown {
                    key: building.id.to_string(),
                    label: building.name.clone(),
                    revenue,
                    expenses,
                    segments,
                }
            })
            .collect(),
        Scope::Project(_) => {
            let mut sections: BTreeMap<&Category, Vec<&Included<'_>>> = BTreeMap::new();
            for r in included {
                sections.entry(&r.record.category).or_default().push(r);
            }

            let section_totals = sections.iter().map(|(category, records)| {
                (
                    (*category).clone(),
                    records.iter().map(|r| r.magnitude).sum::<Decimal>(),
                )
            });

            ordered_totals(Some(CategoryCatalog::PROJECT_SECTIONS), section_totals)
                .into_iter()
                .filter_map(|total| {
                    let records = sections.get(&total.category)?;
                    let (revenue, expenses) = sum_by_kind(records.iter().copied());
                    let segments = RecordSource::PROJECT_SOURCES
                        .iter()
                        .map(|source| Segment {
                            label: source.label().to_string(),
                            amount: records
                                .iter()
                                .filter(|r| r.record.source == *source)
                                .map(|r| r.magnitude)
                                .sum(),
                        })
                        .filter(|s| !s.amount.is_zero())
                        .collect();

                    Some(GroupBreakdown {
                        key: total.category.as_str().to_string(),
                        label: total.category.as_str().to_string(),
                        revenue,
                        expenses,
                        segments,
                    })
                })
                .collect()
        }
    }
}

fn attachments(included: &[Included<'_>]) -> Vec<AttachmentRef> {
    let mut seen = HashSet::new();
    included
        .iter()
        .filter_map(|r| {
            let document_id = r.record.attachment.as_ref()?;
            if !seen.insert(document_id) {
                return None;
            }
            Some(AttachmentRef {
                document_id: document_id.clone(),
                record_id: r.record.id.clone(),
                kind: r.record.kind,
                category: r.record.category.clone(),
                source: r.record.source,
                month: r.month,
            })
        })
        .collect()
}
