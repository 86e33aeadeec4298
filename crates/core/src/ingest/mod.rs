//! Conversion of entities into financial records.
//!
//! This is the ingestion boundary where the canonical sign convention is
//! applied: sources that store costs as positive numbers are negated here,
//! so every expense record downstream carries a negative amount.

pub mod lease;
pub mod project;

pub use lease::{rent_records, rent_records_for};
pub use project::project_records;
