//! Entity kinds and list filters.

use std::fmt;

use propledger_shared::types::{AnalysisPeriod, BuildingId, ProjectId};

/// A list endpoint of the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// `/buildings`
    Buildings,
    /// `/leases`
    Leases,
    /// `/transactions`
    Transactions,
    /// `/invoices-subcontractor`
    SubcontractorInvoices,
    /// `/orders`
    Orders,
    /// `/punches`
    Punches,
    /// `/projects`
    Projects,
}

impl EntityKind {
    /// Endpoint path.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Buildings => "/buildings",
            Self::Leases => "/leases",
            Self::Transactions => "/transactions",
            Self::SubcontractorInvoices => "/invoices-subcontractor",
            Self::Orders => "/orders",
            Self::Punches => "/punches",
            Self::Projects => "/projects",
        }
    }

    /// Key holding the list in a named envelope, e.g. `{"leases": [...]}`.
    #[must_use]
    pub const fn envelope_key(self) -> &'static str {
        match self {
            Self::Buildings => "buildings",
            Self::Leases => "leases",
            Self::Transactions => "transactions",
            Self::SubcontractorInvoices => "invoices",
            Self::Orders => "orders",
            Self::Punches => "punches",
            Self::Projects => "projects",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.envelope_key())
    }
}

/// Filter sent as query parameters to list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityFilter {
    /// Buildings to include.
    pub building_ids: Vec<BuildingId>,
    /// Project to include.
    pub project_id: Option<ProjectId>,
    /// Period to include.
    pub period: Option<AnalysisPeriod>,
}

impl EntityFilter {
    /// Filter for a set of buildings over a period.
    #[must_use]
    pub fn buildings(ids: &[BuildingId], period: AnalysisPeriod) -> Self {
        Self {
            building_ids: ids.to_vec(),
            project_id: None,
            period: Some(period),
        }
    }

    /// Filter for one project over a period.
    #[must_use]
    pub fn project(id: &ProjectId, period: AnalysisPeriod) -> Self {
        Self {
            building_ids: Vec::new(),
            project_id: Some(id.clone()),
            period: Some(period),
        }
    }

    /// Same filter without the period.
    #[must_use]
    pub fn without_period(&self) -> Self {
        Self {
            period: None,
            ..self.clone()
        }
    }

    /// Query parameters, in a stable order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.building_ids.is_empty() {
            let ids: Vec<&str> = self.building_ids.iter().map(BuildingId::as_str).collect();
            pairs.push(("building_ids", ids.join(",")));
        }
        if let Some(project_id) = &self.project_id {
            pairs.push(("project_id", project_id.to_string()));
        }
        if let Some(period) = &self.period {
            pairs.push(("start_year", period.start().year().to_string()));
            pairs.push(("start_month", period.start().month().to_string()));
            pairs.push(("end_year", period.end().year().to_string()));
            pairs.push(("end_month", period.end().month().to_string()));
        }
        pairs
    }

    /// Cache key of a list fetched with this filter.
    #[must_use]
    pub fn cache_key(&self, kind: EntityKind) -> String {
        let query: Vec<String> = self
            .query_pairs()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        format!("{}?{}", kind.path(), query.join("&"))
    }
}
