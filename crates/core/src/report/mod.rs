//! Format-agnostic report composition.
//!
//! The composer turns an aggregation result into a [`ReportDocument`]:
//! ordered sections of paragraphs, key/value lists, tables and notices with
//! every amount already formatted. Renderers only lay the blocks out.

pub mod composer;
pub mod document;
pub mod error;


pub use composer::ReportComposer;
pub use document::{Block, KeyValue, ReportDocument, Section, SectionKind, Table};
pub use error::ReportError;
