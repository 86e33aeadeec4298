//! Mortgage payments and debt-service analysis.

pub mod calculator;
pub mod error;
pub mod types;

pub use calculator::MortgageCalculator;
pub use error::MortgageError;
pub use types::{Installment, MortgageAnalysis, MortgageTerms};
