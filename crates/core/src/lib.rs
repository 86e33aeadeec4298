//! Core analysis logic for Propledger.
//!
//! This crate contains pure logic with ZERO network or storage dependencies.
//! Records, aggregation, charts and report composition all live here; the
//! client and export crates feed it data and consume its output.
//!
//! # Modules
//!
//! - `records` - Financial records, entities and category catalogs
//! - `ingest` - Lease rent expansion and project expense ledger
//! - `aggregation` - Totals, category and monthly breakdowns, ROI
//! - `budget` - Project budget versus actual
//! - `mortgage` - Mortgage payments and debt-service analysis
//! - `chart` - Chart-ready data
//! - `report` - Format-agnostic report documents

pub mod aggregation;
pub mod budget;
pub mod chart;
pub mod ingest;
pub mod mortgage;
pub mod records;
pub mod report;
