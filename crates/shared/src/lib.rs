//! Shared types, errors, and configuration for Propledger.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for entities served by the property-management API
//! - Year/month analysis periods
//! - Money formatting with a single currency rule per report
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
