//! Budget comparison logic.

use rust_decimal::Decimal;

use super::types::{BudgetComparison, VarianceStatus};

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Compare actual expenses against a budget.
    ///
    /// `actual` is the positive expense magnitude. An absent budget is
    /// treated as zero, which makes any spending over budget and the
    /// utilization percentage zero. A percentage too large for a decimal is
    /// also reported as zero.
    #[must_use]
    pub fn compare(budget: Option<Decimal>, actual: Decimal) -> BudgetComparison {
        let budget = budget.unwrap_or(Decimal::ZERO);
        let remaining = budget.saturating_sub(actual);

        let status = match remaining.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => VarianceStatus::Favorable,
            std::cmp::Ordering::Less => VarianceStatus::Unfavorable,
            std::cmp::Ordering::Equal => VarianceStatus::OnBudget,
        };

        let percentage_used = actual
            .checked_div(budget)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map_or(Decimal::ZERO, |pct| pct.round_dp(2));

        BudgetComparison {
            budget,
            actual,
            remaining,
            is_over_budget: actual > budget,
            percentage_used,
            status,
        }
    }
}
