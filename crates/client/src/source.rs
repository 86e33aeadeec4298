//! Capabilities the fetch layer and pipeline depend on.
//!
//! [`crate::ApiClient`] implements all of them over HTTP; tests substitute
//! in-memory implementations.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use propledger_shared::types::{BuildingId, DocumentId};
use serde_json::Value;

use crate::analysis::{MortgageSummary, ProfitabilitySummary};
use crate::error::ClientError;
use crate::kind::{EntityFilter, EntityKind};

/// Source of raw entity lists.
pub trait EntitySource: Send + Sync {
    /// Fetches the raw response body of a list endpoint.
    fn list(
        &self,
        kind: EntityKind,
        filter: &EntityFilter,
    ) -> impl Future<Output = Result<Value, ClientError>> + Send;
}

/// Store of attachment binaries.
pub trait DocumentStore: Send + Sync {
    /// Fetches the bytes of a stored document (`GET /documents/{id}`).
    fn fetch_document(
        &self,
        id: &DocumentId,
    ) -> impl Future<Output = Result<Bytes, ClientError>> + Send;
}

/// Server-side analysis endpoints.
pub trait AnalysisSource: Send + Sync {
    /// `GET /analysis/profitability`
    fn profitability(
        &self,
        filter: &EntityFilter,
    ) -> impl Future<Output = Result<ProfitabilitySummary, ClientError>> + Send;

    /// `GET /analysis/mortgage`
    fn mortgages(
        &self,
        building_ids: &[BuildingId],
    ) -> impl Future<Output = Result<Vec<MortgageSummary>, ClientError>> + Send;
}

impl<T: EntitySource> EntitySource for Arc<T> {
    fn list(
        &self,
        kind: EntityKind,
        filter: &EntityFilter,
    ) -> impl Future<Output = Result<Value, ClientError>> + Send {
        (**self).list(kind, filter)
    }
}

impl<T: DocumentStore> DocumentStore for Arc<T> {
    fn fetch_document(
        &self,
        id: &DocumentId,
    ) -> impl Future<Output = Result<Bytes, ClientError>> + Send {
        (**self).fetch_document(id)
    }
}

impl<T: AnalysisSource> AnalysisSource for Arc<T> {
    fn profitability(
        &self,
        filter: &EntityFilter,
    ) -> impl Future<Output = Result<ProfitabilitySummary, ClientError>> + Send {
        (**self).profitability(filter)
    }

    fn mortgages(
        &self,
        building_ids: &[BuildingId],
    ) -> impl Future<Output = Result<Vec<MortgageSummary>, ClientError>> + Send {
        (**self).mortgages(building_ids)
    }
}
