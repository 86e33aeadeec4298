//! Data fetch layer for Propledger.
//!
//! Talks to the property-management REST API: entity lists (with envelope
//! normalization, lenient decoding and a fallback cache), document binaries
//! and the server-side analysis endpoints.

pub mod analysis;
pub mod api;
pub mod cache;
pub mod dto;
pub mod envelope;
pub mod error;
pub mod fetcher;
pub mod kind;
pub mod lenient;
pub mod source;

pub use analysis::{MortgageSummary, ProfitabilitySummary};
pub use api::ApiClient;
pub use cache::{FallbackCache, MokaFallbackCache, NoopCache};
pub use envelope::Envelope;
pub use error::ClientError;
pub use fetcher::{EntityFetcher, FetchOutcome, FetchSource};
pub use kind::{EntityFilter, EntityKind};
pub use source::{AnalysisSource, DocumentStore, EntitySource};
