//! Shared test data and in-memory sources.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use chrono::{NaiveDate, NaiveDateTime};
use propledger_client::{
    AnalysisSource, ClientError, DocumentStore, EntityFilter, EntityKind, EntitySource,
    MortgageSummary, ProfitabilitySummary,
};
use propledger_core::aggregation::{AggregationEngine, Scope};
use propledger_core::records::{
    Building, Category, FinancialRecord, Project, RecordKind, RecordOwner, RecordSource,
};
use propledger_core::report::{ReportComposer, ReportDocument};
use propledger_shared::types::{
    AnalysisPeriod, BuildingId, Currency, DocumentId, Locale, MoneyFormatter, ProjectId, YearMonth,
};
use rust_decimal_macros::dec;
use serde_json::Value;

pub fn generated_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 4, 2)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

pub fn first_quarter() -> AnalysisPeriod {
    AnalysisPeriod::new(
        YearMonth::new(2025, 1).unwrap(),
        YearMonth::new(2025, 3).unwrap(),
    )
    .unwrap()
}

fn composer() -> ReportComposer {
    ReportComposer::new(
        MoneyFormatter::new(Currency::Cad, Locale::FrCa),
        generated_at(),
    )
}

/// Building report for March 2025.
pub fn building_document() -> ReportDocument {
    let scope = Scope::Buildings(vec![Building {
        id: BuildingId::new("A"),
        name: "Le Plateau".to_string(),
        address: Some("123 rue Rachel".to_string()),
        purchase_price: Some(dec!(350000)),
    }]);
    let period = AnalysisPeriod::single(YearMonth::new(2025, 3).unwrap());
    let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let owner = RecordOwner::Building(BuildingId::new("A"));
    let records = vec![
        FinancialRecord::new(
            "r1",
            RecordKind::Revenue,
            dec!(500),
            day,
            Category::new("Loyers"),
            owner.clone(),
            RecordSource::Transaction,
        ),
        FinancialRecord::new(
            "e1",
            RecordKind::Expense,
            dec!(-150),
            day,
            Category::new("Assurances"),
            owner,
            RecordSource::Transaction,
        ),
    ];
    let result = AggregationEngine::aggregate(&records, &period, &scope);
    composer().compose(&result, Some(&scope)).unwrap()
}

/// Over-budget project report for the first quarter of 2025.
pub fn project_document() -> ReportDocument {
    let scope = Scope::Project(Project {
        id: ProjectId::new("P1"),
        name: "Duplex Verdun".to_string(),
        budget: Some(dec!(10000)),
        address: None,
    });
    let owner = RecordOwner::Project(ProjectId::new("P1"));
    let records = vec![FinancialRecord::new(
        "inv-1",
        RecordKind::Expense,
        dec!(-12000),
        NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
        Category::new("Charpente"),
        owner,
        RecordSource::SubcontractorInvoice,
    )];
    let result = AggregationEngine::aggregate(&records, &first_quarter(), &scope);
    composer().compose(&result, Some(&scope)).unwrap()
}

/// In-memory document store recording every request.
#[derive(Clone, Default)]
pub struct MockStore {
    documents: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, id: &str, content: &[u8]) -> Self {
        self.documents
            .lock()
            .unwrap()
            .insert(id.to_string(), content.to_vec());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl DocumentStore for MockStore {
    async fn fetch_document(&self, id: &DocumentId) -> Result<Bytes, ClientError> {
        self.requests.lock().unwrap().push(id.to_string());
        self.documents
            .lock()
            .unwrap()
            .get(id.as_str())
            .map(|content| Bytes::from(content.clone()))
            .ok_or_else(|| ClientError::NotFound(format!("/documents/{id}")))
    }
}

/// In-memory API. Unset lists fail with a transport error.
#[derive(Default)]
pub struct MockApi {
    lists: Mutex<HashMap<EntityKind, Value>>,
    profitability: Mutex<Option<Value>>,
    mortgages: Mutex<Option<Vec<MortgageSummary>>>,
    pub store: MockStore,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(self, kind: EntityKind, body: Value) -> Self {
        self.lists.lock().unwrap().insert(kind, body);
        self
    }

    pub fn with_profitability(self, body: Value) -> Self {
        *self.profitability.lock().unwrap() = Some(body);
        self
    }

    pub fn with_mortgages(self, mortgages: Vec<MortgageSummary>) -> Self {
        *self.mortgages.lock().unwrap() = Some(mortgages);
        self
    }

    pub fn with_document(mut self, id: &str, content: &[u8]) -> Self {
        self.store = self.store.with_document(id, content);
        self
    }
}

impl EntitySource for MockApi {
    async fn list(&self, kind: EntityKind, _filter: &EntityFilter) -> Result<Value, ClientError> {
        self.lists
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .ok_or_else(|| ClientError::Transport(format!("{kind}: connection refused")))
    }
}

impl DocumentStore for MockApi {
    async fn fetch_document(&self, id: &DocumentId) -> Result<Bytes, ClientError> {
        self.store.fetch_document(id).await
    }
}

impl AnalysisSource for MockApi {
    async fn profitability(
        &self,
        _filter: &EntityFilter,
    ) -> Result<ProfitabilitySummary, ClientError> {
        let body = self
            .profitability
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ClientError::Status {
                status: 503,
                url: "/analysis/profitability".to_string(),
            })?;
        Ok(serde_json::from_value(body)?)
    }

    async fn mortgages(
        &self,
        _building_ids: &[BuildingId],
    ) -> Result<Vec<MortgageSummary>, ClientError> {
        self.mortgages
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ClientError::Status {
                status: 503,
                url: "/analysis/mortgage".to_string(),
            })
    }
}
