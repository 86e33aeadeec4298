//! Mortgage error types.

use thiserror::Error;

/// Mortgage calculation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MortgageError {
    /// Principal is zero or negative.
    #[error("Principal must be positive")]
    InvalidPrincipal,

    /// Rate is negative.
    #[error("Interest rate cannot be negative")]
    NegativeRate,

    /// Amortization or payment frequency is zero.
    #[error("Amortization years and payments per year must be positive")]
    InvalidTerm,

    /// Intermediate value out of range.
    #[error("Calculation overflow")]
    Overflow,
}
