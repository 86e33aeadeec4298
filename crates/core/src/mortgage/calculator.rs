//! Mortgage calculator.

use rust_decimal::Decimal;

use super::error::MortgageError;
use super::types::{Installment, MortgageAnalysis, MortgageTerms};
use crate::aggregation::AggregationResult;
use crate::records::category::MORTGAGE_LABEL;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Mortgage calculator.
pub struct MortgageCalculator;

impl MortgageCalculator {
    /// Periodic payment, rounded to cents.
    ///
    /// `P·r / (1 − (1 + r)^−n)`, or `P / n` at a zero rate.
    pub fn payment(terms: &MortgageTerms) -> Result<Decimal, MortgageError> {
        Self::validate(terms)?;
        let n = terms.payment_count();
        let rate = terms.periodic_rate();

        if rate.is_zero() {
            return Ok((terms.principal / Decimal::from(n)).round_dp(2));
        }

        // P·r / (1 − (1 + r)^−n) == P·r·f / (f − 1) with f = (1 + r)^n
        let factor = compound(Decimal::ONE + rate, n)?;
        let numerator = terms
            .principal
            .checked_mul(rate)
            .and_then(|v| v.checked_mul(factor))
            .ok_or(MortgageError::Overflow)?;
        let payment = numerator
            .checked_div(factor - Decimal::ONE)
            .ok_or(MortgageError::Overflow)?;
        Ok(payment.round_dp(2))
    }

    /// Full amortization schedule. The last payment clears the balance.
    pub fn schedule(terms: &MortgageTerms) -> Result<Vec<Installment>, MortgageError> {
        let payment = Self::payment(terms)?;
        let rate = terms.periodic_rate();
        let count = terms.payment_count();
        let mut balance = terms.principal;
        let mut installments = Vec::with_capacity(count as usize);

        for number in 1..=count {
            let interest = (balance * rate).round_dp(2);
            let mut principal = payment - interest;
            if number == count || principal > balance {
                principal = balance;
            }
            balance -= principal;
            installments.push(Installment {
                number,
                payment: principal + interest,
                interest,
                principal,
                balance,
            });
        }
        Ok(installments)
    }

    /// Total interest paid over the schedule.
    pub fn total_interest(terms: &MortgageTerms) -> Result<Decimal, MortgageError> {
        Ok(Self::schedule(terms)?.iter().map(|i| i.interest).sum())
    }

    /// Debt-service analysis of an aggregation result.
    ///
    /// Mortgage payments recorded as expenses are excluded from operating
    /// expenses so they are not counted twice.
    pub fn analyze(
        terms: &MortgageTerms,
        result: &AggregationResult,
    ) -> Result<MortgageAnalysis, MortgageError> {
        let payment = Self::payment(terms)?;
        let total_interest = Self::total_interest(terms)?;
        let annual_debt_service = payment
            .checked_mul(Decimal::from(terms.payments_per_year))
            .ok_or(MortgageError::Overflow)?;

        let months = Decimal::from(result.period.month_count().max(1));
        let annualize = |amount: Decimal| {
            amount
                .checked_mul(MONTHS_PER_YEAR)
                .and_then(|v| v.checked_div(months))
                .map(|v| v.round_dp(2))
                .ok_or(MortgageError::Overflow)
        };

        let annual_revenue = annualize(result.total_revenue)?;
        let annual_operating_expenses =
            annualize(result.total_expenses - result.expense_for(MORTGAGE_LABEL))?;
        let net_operating_income = annual_revenue
            .checked_sub(annual_operating_expenses)
            .ok_or(MortgageError::Overflow)?;
        let cashflow_after_debt_service = net_operating_income
            .checked_sub(annual_debt_service)
            .ok_or(MortgageError::Overflow)?;

        let debt_service_coverage = if annual_debt_service.is_zero() {
            Decimal::ZERO
        } else {
            net_operating_income
                .checked_div(annual_debt_service)
                .ok_or(MortgageError::Overflow)?
                .round_dp(2)
        };

        Ok(MortgageAnalysis {
            terms: *terms,
            payment,
            total_interest,
            annual_debt_service,
            annual_revenue,
            annual_operating_expenses,
            net_operating_income,
            cashflow_after_debt_service,
            debt_service_coverage,
        })
    }

    fn validate(terms: &MortgageTerms) -> Result<(), MortgageError> {
        if terms.principal <= Decimal::ZERO {
            return Err(MortgageError::InvalidPrincipal);
        }
        if terms.annual_rate < Decimal::ZERO {
            return Err(MortgageError::NegativeRate);
        }
        if terms.amortization_years == 0
            || terms.payments_per_year == 0
            || terms
                .amortization_years
                .checked_mul(terms.payments_per_year)
                .is_none()
        {
            return Err(MortgageError::InvalidTerm);
        }
        Ok(())
    }
}

fn compound(base: Decimal, exponent: u32) -> Result<Decimal, MortgageError> {
    (0..exponent).try_fold(Decimal::ONE, |acc, _| {
        acc.checked_mul(base).ok_or(MortgageError::Overflow)
    })
}
