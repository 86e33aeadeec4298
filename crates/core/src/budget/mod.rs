//! Project budget versus actual spending.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::BudgetService;
pub use types::{BudgetComparison, VarianceStatus};
