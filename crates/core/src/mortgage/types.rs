//! Mortgage types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Terms of a fixed-rate mortgage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageTerms {
    /// Amount borrowed.
    pub principal: Decimal,
    /// Annual nominal rate, in percent.
    pub annual_rate: Decimal,
    /// Amortization period in years.
    pub amortization_years: u32,
    /// Payments per year (12 for monthly).
    #[serde(default = "default_payments_per_year")]
    pub payments_per_year: u32,
}

const fn default_payments_per_year() -> u32 {
    12
}

impl MortgageTerms {
    /// Monthly-payment terms.
    #[must_use]
    pub const fn monthly(principal: Decimal, annual_rate: Decimal, amortization_years: u32) -> Self {
        Self {
            principal,
            annual_rate,
            amortization_years,
            payments_per_year: 12,
        }
    }

    /// Total number of payments.
    #[must_use]
    pub const fn payment_count(&self) -> u32 {
        self.amortization_years * self.payments_per_year
    }

    /// Rate applied at each payment, as a fraction.
    #[must_use]
    pub fn periodic_rate(&self) -> Decimal {
        self.annual_rate / Decimal::ONE_HUNDRED / Decimal::from(self.payments_per_year.max(1))
    }
}

/// One line of an amortization schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    /// Payment number, starting at 1.
    pub number: u32,
    /// Amount paid.
    pub payment: Decimal,
    /// Interest part.
    pub interest: Decimal,
    /// Principal part.
    pub principal: Decimal,
    /// Balance after the payment.
    pub balance: Decimal,
}

/// Debt-service view of a building's cashflow.
///
/// Annual figures are extrapolated from the analysis period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageAnalysis {
    /// Terms analyzed.
    pub terms: MortgageTerms,
    /// Periodic payment.
    pub payment: Decimal,
    /// Total interest over the amortization.
    pub total_interest: Decimal,
    /// Payments over one year.
    pub annual_debt_service: Decimal,
    /// Revenue extrapolated to a year.
    pub annual_revenue: Decimal,
    /// Expenses other than mortgage payments, extrapolated to a year.
    pub annual_operating_expenses: Decimal,
    /// Net operating income.
    pub net_operating_income: Decimal,
    /// NOI minus debt service.
    pub cashflow_after_debt_service: Decimal,
    /// NOI / debt service, 2 decimals; 0 without debt service.
    pub debt_service_coverage: Decimal,
}
