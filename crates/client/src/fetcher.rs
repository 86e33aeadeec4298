//! Entity fetcher with cache fallback.

use std::sync::Arc;

use propledger_core::records::{
    Building, FinancialRecord, Lease, Project, Punch, PurchaseOrder, SubcontractorInvoice,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::FallbackCache;
use crate::dto::{
    BuildingDto, InvoiceDto, IntoDomain, LeaseDto, OrderDto, ProjectDto, PunchDto, TransactionDto,
};
use crate::envelope::normalize;
use crate::kind::{EntityFilter, EntityKind};
use crate::source::EntitySource;

/// Where the items of a fetch come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    /// Fresh from the API.
    Live,
    /// Last cached list after a failed fetch.
    Cached,
    /// Nothing available after a failed fetch.
    Empty,
}

/// Result of a fetch. Never an error: failures degrade.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome<T> {
    /// Items.
    pub items: Vec<T>,
    /// Origin of the items.
    pub source: FetchSource,
    /// Items dropped because they could not be decoded.
    pub dropped: usize,
    /// Human-readable warnings for the caller.
    pub warnings: Vec<String>,
}

impl<T> FetchOutcome<T> {
    /// Returns true if the items did not come fresh from the API.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.source != FetchSource::Live
    }
}

impl FetchOutcome<Value> {
    /// Decodes each item independently, dropping the ones that fail.
    #[must_use]
    pub fn decode<D>(self, kind: EntityKind) -> FetchOutcome<D::Output>
    where
        D: DeserializeOwned + IntoDomain,
    {
        let mut warnings = self.warnings;
        let mut dropped = self.dropped;
        let mut items = Vec::with_capacity(self.items.len());

        for (index, item) in self.items.into_iter().enumerate() {
            let decoded = serde_json::from_value::<D>(item)
                .map_err(|e| e.to_string())
                .and_then(IntoDomain::into_domain);
            match decoded {
                Ok(value) => items.push(value),
                Err(reason) => {
                    warn!(%kind, index, %reason, "Dropping undecodable item");
                    warnings.push(format!("{kind}[{index}] ignoré: {reason}"));
                    dropped += 1;
                }
            }
        }

        FetchOutcome {
            items,
            source: self.source,
            dropped,
            warnings,
        }
    }
}

/// Fetches entity lists, degrading to the fallback cache on failure.
pub struct EntityFetcher<S> {
    source: S,
    cache: Arc<dyn FallbackCache>,
}

impl<S: EntitySource> EntityFetcher<S> {
    /// Creates a fetcher.
    pub fn new(source: S, cache: Arc<dyn FallbackCache>) -> Self {
        Self { source, cache }
    }

    /// Underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches and normalizes one list.
    ///
    /// A single attempt is made. On success the list is cached and returned
    /// as `Live`; on transport or decode failure the cached list is returned
    /// as `Cached`, or an empty list as `Empty`.
    pub async fn fetch_entities(&self, kind: EntityKind, filter: &EntityFilter) -> FetchOutcome<Value> {
        let key = filter.cache_key(kind);
        debug!(%kind, %key, "Fetching entities");

        let fetched = match self.source.list(kind, filter).await {
            Ok(body) => normalize(body, kind),
            Err(err) => Err(err),
        };

        match fetched {
            Ok(items) => {
                debug!(%kind, count = items.len(), "Fetched entities");
                let items = Arc::new(items);
                self.cache.set(&key, Arc::clone(&items));
                FetchOutcome {
                    items: Arc::unwrap_or_clone(items),
                    source: FetchSource::Live,
                    dropped: 0,
                    warnings: Vec::new(),
                }
            }
            Err(err) => {
                let (items, source) = match self.cache.get(&key) {
                    Some(items) => (Arc::unwrap_or_clone(items), FetchSource::Cached),
                    None => (Vec::new(), FetchSource::Empty),
                };
                warn!(%kind, error = %err, ?source, "Fetch failed, degrading");
                let fallback = match source {
                    FetchSource::Cached => "données en cache utilisées",
                    _ => "aucune donnée disponible",
                };
                FetchOutcome {
                    items,
                    source,
                    dropped: 0,
                    warnings: vec![format!("{kind}: {err} ({fallback})")],
                }
            }
        }
    }

    /// Fetches a list and decodes it item by item.
    pub async fn fetch<D>(&self, kind: EntityKind, filter: &EntityFilter) -> FetchOutcome<D::Output>
    where
        D: DeserializeOwned + IntoDomain,
    {
        self.fetch_entities(kind, filter).await.decode::<D>(kind)
    }

    /// Buildings matching the filter.
    pub async fn buildings(&self, filter: &EntityFilter) -> FetchOutcome<Building> {
        self.fetch::<BuildingDto>(EntityKind::Buildings, filter).await
    }

    /// Leases matching the filter.
    pub async fn leases(&self, filter: &EntityFilter) -> FetchOutcome<Lease> {
        self.fetch::<LeaseDto>(EntityKind::Leases, filter).await
    }

    /// Building transactions as financial records.
    pub async fn transactions(&self, filter: &EntityFilter) -> FetchOutcome<FinancialRecord> {
        self.fetch::<TransactionDto>(EntityKind::Transactions, filter).await
    }

    /// Projects matching the filter.
    pub async fn projects(&self, filter: &EntityFilter) -> FetchOutcome<Project> {
        self.fetch::<ProjectDto>(EntityKind::Projects, filter).await
    }

    /// Subcontractor invoices matching the filter.
    pub async fn invoices(&self, filter: &EntityFilter) -> FetchOutcome<SubcontractorInvoice> {
        self.fetch::<InvoiceDto>(EntityKind::SubcontractorInvoices, filter).await
    }

    /// Purchase orders matching the filter.
    pub async fn orders(&self, filter: &EntityFilter) -> FetchOutcome<PurchaseOrder> {
        self.fetch::<OrderDto>(EntityKind::Orders, filter).await
    }

    /// Time punches matching the filter.
    pub async fn punches(&self, filter: &EntityFilter) -> FetchOutcome<Punch> {
        self.fetch::<PunchDto>(EntityKind::Punches, filter).await
    }
}
