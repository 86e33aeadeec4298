//! Server-side analysis summaries.

use propledger_core::aggregation::{
    AggregationResult, MonthTotal, Scope, gross_volume, ordered_totals,
};
use propledger_core::mortgage::MortgageTerms;
use propledger_core::records::{Category, CategoryCatalog};
use propledger_shared::types::{AnalysisPeriod, BuildingId, YearMonth};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde_json::Value;

use crate::dto::IntoDomain;
use crate::error::ClientError;
use crate::lenient;

/// Month entry of a profitability summary.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthSummaryDto {
    #[serde(default, deserialize_with = "lenient::opt_decimal")]
    year: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::opt_decimal")]
    month: Option<Decimal>,
    #[serde(default, alias = "revenus", deserialize_with = "lenient::opt_decimal")]
    revenue: Option<Decimal>,
    #[serde(default, alias = "depenses", deserialize_with = "lenient::opt_decimal")]
    expenses: Option<Decimal>,
}

impl MonthSummaryDto {
    fn month_total(&self) -> Option<MonthTotal> {
        let year = self.year?.to_i32()?;
        let month = self.month?.to_u32()?;
        let month = YearMonth::new(year, month).ok()?;
        let revenue = self.revenue.unwrap_or_default().abs();
        let expenses = self.expenses.unwrap_or_default().abs();
        Some(MonthTotal {
            month,
            revenue,
            expenses,
            net: revenue - expenses,
        })
    }
}

/// `GET /analysis/profitability` response.
///
/// Category totals may come as a `{label: amount}` map or a list of
/// `{category, amount}` objects.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfitabilitySummary {
    #[serde(
        default,
        alias = "investmentBasis",
        alias = "purchase_price",
        deserialize_with = "lenient::opt_decimal"
    )]
    investment_basis: Option<Decimal>,
    #[serde(default, alias = "revenueByCategory")]
    revenue_by_category: Value,
    #[serde(default, alias = "expensesByCategory", alias = "expense_by_category")]
    expenses_by_category: Value,
    #[serde(default, alias = "monthly", alias = "by_month")]
    months: Vec<MonthSummaryDto>,
}

impl ProfitabilitySummary {
    /// Converts the summary into an aggregation result for `scope`.
    ///
    /// Categories are mapped onto the scope's catalogs, totals are recomputed
    /// from them and missing months are zero-filled. Breakdown, skipped
    /// records and attachments are taken from `details`, the client-side
    /// aggregation of the same selection.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the summary amounts overflow a decimal
    /// when added up.
    pub fn into_result(
        self,
        period: AnalysisPeriod,
        scope: &Scope,
        details: &AggregationResult,
    ) -> Result<AggregationResult, ClientError> {
        let revenue_catalog = scope.revenue_catalog();
        let expense_catalog = scope.expense_catalog();

        let revenue_amounts = category_amounts(&self.revenue_by_category);
        let expense_amounts = category_amounts(&self.expenses_by_category);
        let months: Vec<MonthTotal> = self
            .months
            .iter()
            .filter_map(MonthSummaryDto::month_total)
            .collect();

        let amounts = revenue_amounts
            .iter()
            .chain(&expense_amounts)
            .map(|(_, amount)| *amount)
            .chain(months.iter().flat_map(|m| [m.revenue, m.expenses]));
        if gross_volume(amounts).is_none() {
            return Err(ClientError::decode("profitability totals out of range"));
        }

        let revenue = ordered_totals(
            revenue_catalog,
            revenue_amounts
                .into_iter()
                .map(|(label, amount)| (resolve(revenue_catalog, &label), amount)),
        );
        let expenses = ordered_totals(
            Some(expense_catalog),
            expense_amounts
                .into_iter()
                .map(|(label, amount)| (expense_catalog.resolve(Some(&label)), amount)),
        );
        let basis = self
            .investment_basis
            .unwrap_or_else(|| scope.investment_basis());

        let mut result = AggregationResult::from_totals(period, revenue, expenses, &months, basis);
        result.breakdown.clone_from(&details.breakdown);
        result.budget.clone_from(&details.budget);
        result.record_count = details.record_count;
        result.skipped.clone_from(&details.skipped);
        result.attachments.clone_from(&details.attachments);
        Ok(result)
    }
}

fn resolve(catalog: Option<CategoryCatalog>, label: &str) -> Category {
    catalog.map_or_else(|| Category::new(label), |c| c.resolve(Some(label)))
}

/// Reads `{label: amount}` or `[{category, amount}]` as magnitudes.
fn category_amounts(value: &Value) -> Vec<(String, Decimal)> {
    match value {
        Value::Object(map) => map
            .iter()
            .filter_map(|(label, amount)| Some((label.clone(), lenient::decimal(amount)?.abs())))
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| {
                let label = item
                    .get("category")
                    .or_else(|| item.get("label"))
                    .and_then(lenient::text)
                    .unwrap_or_default();
                let amount = item
                    .get("amount")
                    .or_else(|| item.get("total"))
                    .and_then(lenient::decimal)?;
                Some((label, amount.abs()))
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// `GET /analysis/mortgage` item.
#[derive(Debug, Clone, Deserialize)]
pub struct MortgageDto {
    #[serde(default, alias = "buildingId", deserialize_with = "lenient::opt_id")]
    building_id: Option<BuildingId>,
    #[serde(
        default,
        alias = "amount",
        alias = "loan_amount",
        deserialize_with = "lenient::opt_decimal"
    )]
    principal: Option<Decimal>,
    #[serde(
        default,
        alias = "rate",
        alias = "interest_rate",
        deserialize_with = "lenient::opt_decimal"
    )]
    annual_rate: Option<Decimal>,
    #[serde(
        default,
        alias = "amortization",
        alias = "years",
        deserialize_with = "lenient::opt_decimal"
    )]
    amortization_years: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::opt_decimal")]
    payments_per_year: Option<Decimal>,
}

/// Mortgage terms held by one building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MortgageSummary {
    /// Building the mortgage is on, when given.
    pub building_id: Option<BuildingId>,
    /// Terms.
    pub terms: MortgageTerms,
}

impl IntoDomain for MortgageDto {
    type Output = MortgageSummary;

    fn into_domain(self) -> Result<MortgageSummary, String> {
        let principal = self.principal.ok_or("hypothèque sans capital")?;
        let annual_rate = self.annual_rate.ok_or("hypothèque sans taux")?;
        let years = self
            .amortization_years
            .and_then(|y| y.to_u32())
            .ok_or("hypothèque sans amortissement")?;
        let payments_per_year = self
            .payments_per_year
            .and_then(|p| p.to_u32())
            .unwrap_or(12);

        Ok(MortgageSummary {
            building_id: self.building_id,
            terms: MortgageTerms {
                principal,
                annual_rate,
                amortization_years: years,
                payments_per_year,
            },
        })
    }
}
