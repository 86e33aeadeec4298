//! Property-based tests for budget module.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::BudgetService;
use super::types::VarianceStatus;

proptest! {
    /// remaining = budget - actual, and the status follows its sign.
    #[test]
    fn test_remaining_and_status(
        budget in 0i64..1_000_000_000,
        actual in 0i64..1_000_000_000,
    ) {
        let budget = Decimal::from(budget);
        let actual = Decimal::from(actual);

        let result = BudgetService::compare(Some(budget), actual);

        prop_assert_eq!(result.remaining, budget - actual);
        prop_assert_eq!(result.is_over_budget, actual > budget);

        if result.remaining > Decimal::ZERO {
            prop_assert_eq!(result.status, VarianceStatus::Favorable);
        } else if result.remaining < Decimal::ZERO {
            prop_assert_eq!(result.status, VarianceStatus::Unfavorable);
        } else {
            prop_assert_eq!(result.status, VarianceStatus::OnBudget);
        }
    }

    /// Utilization never goes negative for non-negative inputs.
    #[test]
    fn test_percentage_used_non_negative(
        budget in 1i64..1_000_000_000,
        actual in 0i64..1_000_000_000,
    ) {
        let result = BudgetService::compare(Some(Decimal::from(budget)), Decimal::from(actual));
        prop_assert!(result.percentage_used >= Decimal::ZERO);
    }
}

mod unit_tests {
    use super::*;

    #[test]
    fn test_over_budget_project() {
        let result = BudgetService::compare(Some(dec!(10000)), dec!(12000));

        assert!(result.is_over_budget);
        assert_eq!(result.remaining, dec!(-2000));
        assert_eq!(result.percentage_used, dec!(120));
        assert_eq!(result.status, VarianceStatus::Unfavorable);
    }

    #[test]
    fn test_under_budget_project() {
        let result = BudgetService::compare(Some(dec!(10000)), dec!(2500));

        assert!(!result.is_over_budget);
        assert_eq!(result.remaining, dec!(7500));
        assert_eq!(result.percentage_used, dec!(25));
        assert_eq!(result.status, VarianceStatus::Favorable);
    }

    #[test]
    fn test_exactly_on_budget() {
        let result = BudgetService::compare(Some(dec!(5000)), dec!(5000));

        assert!(!result.is_over_budget);
        assert_eq!(result.status, VarianceStatus::OnBudget);
    }

    #[test]
    fn test_missing_budget_is_zero() {
        let result = BudgetService::compare(None, dec!(500));

        assert_eq!(result.budget, Decimal::ZERO);
        assert_eq!(result.percentage_used, Decimal::ZERO);
        assert!(result.is_over_budget);
    }

    #[test]
    fn test_percentage_rounded_to_cents() {
        let result = BudgetService::compare(Some(dec!(3)), dec!(1));
        assert_eq!(result.percentage_used, dec!(33.33));
    }
}
