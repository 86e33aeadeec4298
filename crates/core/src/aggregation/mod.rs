//! Aggregation of financial records into summary metrics.
//!
//! The engine is the single place where records are summed: every total,
//! percentage and breakdown shown in a report or chart comes from an
//! [`AggregationResult`] computed here.

pub mod engine;
pub mod scope;
pub mod types;

#[cfg(test)]
mod tests;

pub use engine::AggregationEngine;
pub use scope::Scope;
pub use types::{
    AggregationResult, CategoryTotal, GroupBreakdown, MonthTotal, Segment, SkippedRecord,
    gross_volume, ordered_totals,
};
