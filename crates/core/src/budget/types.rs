//! Budget comparison types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Variance status of actual spending against a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceStatus {
    /// Spent less than budgeted.
    Favorable,
    /// Spent more than budgeted.
    Unfavorable,
    /// Spent exactly the budget.
    OnBudget,
}

impl VarianceStatus {
    /// French label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Favorable => "Favorable",
            Self::Unfavorable => "Défavorable",
            Self::OnBudget => "Conforme au budget",
        }
    }
}

/// Budget versus actual expenses of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetComparison {
    /// Budgeted amount (zero when the project has none).
    pub budget: Decimal,
    /// Actual expenses, as a positive magnitude.
    pub actual: Decimal,
    /// `budget - actual`, negative when over budget.
    pub remaining: Decimal,
    /// True when actual expenses exceed the budget.
    pub is_over_budget: bool,
    /// `actual / budget × 100`, 0 when the budget is 0.
    pub percentage_used: Decimal,
    /// Variance status.
    pub status: VarianceStatus,
}
