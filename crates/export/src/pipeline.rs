//! End-to-end analysis and export.
//!
//! One analysis fetches its entity lists as a small parallel batch, builds
//! the records, aggregates them and keeps every degradation as a warning.
//! One export composes, plans, packages and delivers.

use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use propledger_client::{
    AnalysisSource, DocumentStore, EntityFetcher, EntityFilter, EntitySource, FallbackCache,
    FetchOutcome,
};
use propledger_core::aggregation::{AggregationEngine, AggregationResult, Scope};
use propledger_core::chart::{ChartData, ChartKind, ChartShaper};
use propledger_core::ingest::{project_records, rent_records_for};
use propledger_core::mortgage::{MortgageAnalysis, MortgageCalculator, MortgageTerms};
use propledger_core::records::{Building, Project};
use propledger_core::report::ReportComposer;
use propledger_shared::AppConfig;
use propledger_shared::types::{AnalysisPeriod, BuildingId, MoneyFormatter, ProjectId};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::archive::ExportArchive;
use crate::error::ExportError;
use crate::plan::FolderPlan;
use crate::render::DocumentRenderer;
use crate::service::ExportService;
use crate::sink::ArchiveSink;

/// Settings of a pipeline.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    /// Use `/analysis/profitability` totals when available.
    pub prefer_server_aggregation: bool,
    /// Amount formatting.
    pub formatter: MoneyFormatter,
    /// Timezone of the generation timestamp.
    pub timezone: Tz,
}

impl PipelineSettings {
    /// Reads settings from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown timezone name.
    pub fn from_config(config: &AppConfig) -> Result<Self, ExportError> {
        let timezone = config
            .export
            .timezone
            .parse::<Tz>()
            .map_err(|e| ExportError::configuration(format!("timezone: {e}")))?;
        Ok(Self {
            prefer_server_aggregation: config.api.prefer_server_aggregation,
            formatter: config.export.money_formatter(),
            timezone,
        })
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            prefer_server_aggregation: false,
            formatter: MoneyFormatter::default(),
            timezone: chrono_tz::America::Toronto,
        }
    }
}

/// Outcome of one analysis.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    /// Selection.
    pub scope: Scope,
    /// Period.
    pub period: AnalysisPeriod,
    /// Aggregated figures.
    pub result: AggregationResult,
    /// Debt-service analysis of a single mortgaged building.
    pub mortgage: Option<MortgageAnalysis>,
    /// Degradations met while fetching.
    pub warnings: Vec<String>,
}

impl AnalysisRun {
    /// Data of every chart.
    #[must_use]
    pub fn charts(&self) -> Vec<(ChartKind, ChartData)> {
        [
            ChartKind::StackedBar,
            ChartKind::ExpensePie,
            ChartKind::RevenuePie,
            ChartKind::Monthly,
        ]
        .into_iter()
        .map(|kind| (kind, ChartShaper::shape(&self.result, kind)))
        .collect()
    }
}

/// A delivered export.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    /// Archive, with fetch and attachment warnings combined.
    pub archive: ExportArchive,
    /// Storage key, when a sink is configured.
    pub location: Option<String>,
}

/// Runs analyses and exports against one API.
pub struct AnalysisPipeline<C> {
    client: Arc<C>,
    fetcher: EntityFetcher<Arc<C>>,
    exporter: ExportService<Arc<C>>,
    sink: Option<ArchiveSink>,
    settings: PipelineSettings,
}

impl<C> AnalysisPipeline<C>
where
    C: EntitySource + DocumentStore + AnalysisSource,
{
    /// Creates a pipeline without delivery.
    pub fn new(
        client: Arc<C>,
        cache: Arc<dyn FallbackCache>,
        renderer: Arc<dyn DocumentRenderer>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            fetcher: EntityFetcher::new(Arc::clone(&client), cache),
            exporter: ExportService::new(renderer, Arc::clone(&client)),
            client,
            sink: None,
            settings,
        }
    }

    /// Delivers every export through `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: ArchiveSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Analyses a set of buildings.
    ///
    /// Buildings missing from the API are kept under a placeholder name so
    /// the selection is never silently narrowed.
    pub async fn analyze_buildings(
        &self,
        ids: &[BuildingId],
        period: AnalysisPeriod,
    ) -> AnalysisRun {
        let filter = EntityFilter::buildings(ids, period);
        let unbounded = filter.without_period();

        let (buildings, leases, transactions, mortgage_terms) = futures::join!(
            self.fetcher.buildings(&unbounded),
            self.fetcher.leases(&unbounded),
            self.fetcher.transactions(&filter),
            self.mortgage_terms(ids),
        );

        let mut warnings = Vec::new();
        let buildings = collect(buildings, &mut warnings);
        let leases = collect(leases, &mut warnings);
        let mut records = collect(transactions, &mut warnings);

        let selected: Vec<Building> = ids
            .iter()
            .map(|id| {
                buildings
                    .iter()
                    .find(|b| &b.id == id)
                    .cloned()
                    .unwrap_or_else(|| {
                        warn!(building_id = %id, "Building not returned by the API");
                        warnings.push(format!("Immeuble {id} introuvable"));
                        Building {
                            id: id.clone(),
                            name: format!("Immeuble {id}"),
                            address: None,
                            purchase_price: None,
                        }
                    })
            })
            .collect();

        let leases: Vec<_> = leases
            .into_iter()
            .filter(|lease| ids.contains(&lease.building_id))
            .collect();
        records.extend(rent_records_for(&leases, &period));

        let scope = Scope::Buildings(selected);
        let details = AggregationEngine::aggregate(&records, &period, &scope);
        let result = if self.settings.prefer_server_aggregation {
            match self
                .client
                .profitability(&filter)
                .await
                .and_then(|summary| summary.into_result(period, &scope, &details))
            {
                Ok(result) => {
                    debug!("Using server profitability summary");
                    result
                }
                Err(e) => {
                    warn!(error = %e, "Server summary unavailable, using client-side totals");
                    warnings.push(format!("Analyse serveur indisponible: {e}"));
                    details
                }
            }
        } else {
            details
        };

        let mortgage = match mortgage_terms {
            Ok(Some(terms)) => match MortgageCalculator::analyze(&terms, &result) {
                Ok(analysis) => Some(analysis),
                Err(e) => {
                    warn!(error = %e, "Mortgage terms rejected");
                    warnings.push(format!("Hypothèque ignorée: {e}"));
                    None
                }
            },
            Ok(None) => None,
            Err(warning) => {
                warnings.push(warning);
                None
            }
        };

        info!(
            buildings = ids.len(),
            records = result.record_count,
            skipped = result.skipped_count(),
            warnings = warnings.len(),
            "Building analysis complete"
        );

        AnalysisRun {
            scope,
            period,
            result,
            mortgage,
            warnings,
        }
    }

    /// Analyses one construction project.
    pub async fn analyze_project(&self, id: &ProjectId, period: AnalysisPeriod) -> AnalysisRun {
        let filter = EntityFilter::project(id, period);
        let unbounded = filter.without_period();

        let (projects, invoices, orders, punches) = futures::join!(
            self.fetcher.projects(&unbounded),
            self.fetcher.invoices(&filter),
            self.fetcher.orders(&filter),
            self.fetcher.punches(&filter),
        );

        let mut warnings = Vec::new();
        let projects = collect(projects, &mut warnings);
        let invoices = collect(invoices, &mut warnings);
        let orders = collect(orders, &mut warnings);
        let punches = collect(punches, &mut warnings);

        let project = projects
            .into_iter()
            .find(|p| &p.id == id)
            .unwrap_or_else(|| {
                warn!(project_id = %id, "Project not returned by the API");
                warnings.push(format!("Projet {id} introuvable"));
                Project {
                    id: id.clone(),
                    name: format!("Projet {id}"),
                    budget: None,
                    address: None,
                }
            });

        let records = project_records(&project, &invoices, &orders, &punches);
        let scope = Scope::Project(project);
        let result = AggregationEngine::aggregate(&records, &period, &scope);

        info!(
            project_id = %id,
            records = result.record_count,
            skipped = result.skipped_count(),
            warnings = warnings.len(),
            "Project analysis complete"
        );

        AnalysisRun {
            scope,
            period,
            result,
            mortgage: None,
            warnings,
        }
    }

    /// Composes, packages and delivers the report of `run`.
    ///
    /// # Errors
    ///
    /// Composition, rendering, archive and delivery failures. No archive is
    /// delivered when any of them occurs.
    pub async fn export(&self, run: &AnalysisRun) -> Result<ExportOutcome, ExportError> {
        let export_id = Uuid::now_v7();
        debug!(%export_id, subject = %run.scope.subject(), "Export started");

        let generated_at = Utc::now()
            .with_timezone(&self.settings.timezone)
            .naive_local();
        let mut composer = ReportComposer::new(self.settings.formatter, generated_at);
        if let Some(mortgage) = &run.mortgage {
            composer = composer.with_mortgage(mortgage.clone());
        }
        let doc = composer.compose(&run.result, Some(&run.scope))?;
        let plan = FolderPlan::for_scope(&run.scope, &run.period);

        let mut archive = self
            .exporter
            .export(&doc, &run.result.attachments, &plan)
            .await?;
        let mut warnings = run.warnings.clone();
        warnings.append(&mut archive.warnings);
        archive.warnings = warnings;

        let location = match &self.sink {
            Some(sink) => Some(sink.deliver(&archive).await?),
            None => None,
        };

        info!(
            %export_id,
            filename = %archive.filename,
            attachments = archive.attachment_count,
            warnings = archive.warnings.len(),
            "Export complete"
        );
        Ok(ExportOutcome { archive, location })
    }

    /// Terms of the mortgage on a single selected building.
    ///
    /// Multi-building selections have no mortgage section. An unreachable
    /// endpoint yields a warning.
    async fn mortgage_terms(&self, ids: &[BuildingId]) -> Result<Option<MortgageTerms>, String> {
        let [id] = ids else {
            return Ok(None);
        };
        match self.client.mortgages(ids).await {
            Ok(summaries) => Ok(summaries
                .into_iter()
                .find(|m| m.building_id.as_ref().is_none_or(|b| b == id))
                .map(|m| m.terms)),
            Err(e) => {
                warn!(building_id = %id, error = %e, "Mortgage summary unavailable");
                Err(format!("Analyse hypothécaire indisponible: {e}"))
            }
        }
    }
}

fn collect<T>(outcome: FetchOutcome<T>, warnings: &mut Vec<String>) -> Vec<T> {
    warnings.extend(outcome.warnings);
    outcome.items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{MockApi, first_quarter};
    use crate::render::DocxRenderer;
    use propledger_client::{EntityKind, MortgageSummary, NoopCache};
    use propledger_shared::config::{ApiConfig, CacheConfig, ExportConfig, StorageProvider};
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::io::{Cursor, Read};

    fn pipeline(api: MockApi, settings: PipelineSettings) -> AnalysisPipeline<MockApi> {
        AnalysisPipeline::new(
            Arc::new(api),
            Arc::new(NoopCache),
            Arc::new(DocxRenderer),
            settings,
        )
    }

    fn server_settings() -> PipelineSettings {
        PipelineSettings {
            prefer_server_aggregation: true,
            ..PipelineSettings::default()
        }
    }

    fn ids(raw: &[&str]) -> Vec<BuildingId> {
        raw.iter().map(|id| BuildingId::new(*id)).collect()
    }

    fn building_api() -> MockApi {
        MockApi::new()
            .with_list(
                EntityKind::Buildings,
                json!({"data": [
                    {"id": "A", "name": "Le Plateau", "purchase_price": "200000"},
                    {"id": "B", "name": "Rosemont"}
                ]}),
            )
            .with_list(
                EntityKind::Leases,
                json!([
                    {"id": "L1", "building_id": "A", "unit": "101", "start_date": "2024-06-01",
                     "monthly_rent": "1000", "document_id": "bail-1"},
                    {"id": "L2", "building_id": "B", "start_date": "2024-06-01", "monthly_rent": "800"}
                ]),
            )
            .with_list(
                EntityKind::Transactions,
                json!({"transactions": [
                    {"id": "t1", "building_id": "A", "type": "expense", "amount": "-300",
                     "category": "Assurances", "date": "2025-02-14", "document_id": "doc1"},
                    {"id": "t2", "building_id": "A", "type": "expense", "amount": "-200",
                     "category": "Déneigement", "date": "2025-01-20", "document_id": "doc123"},
                    {"id": "t3", "building_id": "A", "type": "expense", "amount": "50",
                     "category": "Gestion", "date": "2025-03-02"}
                ]}),
            )
            .with_mortgages(Vec::new())
            .with_document("doc1", b"%PDF-1.4 assurance")
            .with_document("bail-1", b"%PDF-1.4 bail")
    }

    fn project_api() -> MockApi {
        MockApi::new()
            .with_list(
                EntityKind::Projects,
                json!([{"id": "P1", "name": "Duplex Verdun", "budget": "10000"}]),
            )
            .with_list(
                EntityKind::SubcontractorInvoices,
                json!([{"id": "f1", "project_id": "P1", "section": "Charpente", "amount": "8000",
                        "date": "2025-02-10", "document_id": "fac-1"}]),
            )
            .with_list(
                EntityKind::Orders,
                json!([{"id": "o1", "project_id": "P1", "date": "2025-03-01",
                        "supplier": "Matériaux Laval", "document_id": "bc-1",
                        "lines": [{"section": "Toiture", "amount": "3000"},
                                  {"section": "Plomberie", "amount": "1000"}]}]),
            )
            .with_list(
                EntityKind::Punches,
                json!([{"id": "p1", "project_id": "P1", "date": "2025-01-15", "hours": "10",
                        "hourly_rate": "45", "section": "Finition"}]),
            )
            .with_document("fac-1", b"%PDF facture")
            .with_document("bc-1", b"%PDF commande")
    }

    fn entry_names(bytes: &[u8]) -> Vec<String> {
        zip::ZipArchive::new(Cursor::new(bytes))
            .unwrap()
            .file_names()
            .map(String::from)
            .collect()
    }

    fn report_xml(archive: &ExportArchive) -> String {
        let mut outer = zip::ZipArchive::new(Cursor::new(archive.bytes.as_ref())).unwrap();
        let name = archive.filename.replace(".zip", ".docx");
        let mut report = Vec::new();
        outer
            .by_name(&name)
            .unwrap()
            .read_to_end(&mut report)
            .unwrap();

        let mut inner = zip::ZipArchive::new(Cursor::new(report)).unwrap();
        let mut xml = String::new();
        inner
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    #[tokio::test]
    async fn test_building_analysis_combines_rent_and_transactions() {
        let pipeline = pipeline(building_api(), PipelineSettings::default());

        let run = pipeline.analyze_buildings(&ids(&["A"]), first_quarter()).await;

        assert!(run.warnings.is_empty(), "{:?}", run.warnings);
        assert_eq!(run.result.total_revenue, dec!(3000));
        assert_eq!(run.result.total_expenses, dec!(500));
        assert_eq!(run.result.net_cashflow, dec!(2500));
        assert_eq!(run.result.roi, dec!(1.25));
        assert_eq!(run.result.skipped_count(), 1);
        assert_eq!(run.result.skipped[0].record_id.as_str(), "t3");
        assert!(run.mortgage.is_none());

        let documents: Vec<&str> = run
            .result
            .attachments
            .iter()
            .map(|a| a.document_id.as_str())
            .collect();
        assert_eq!(documents, vec!["doc1", "doc123", "bail-1"]);
    }

    #[tokio::test]
    async fn test_missing_document_still_produces_archive() {
        let pipeline = pipeline(building_api(), PipelineSettings::default());
        let run = pipeline.analyze_buildings(&ids(&["A"]), first_quarter()).await;

        let outcome = pipeline.export(&run).await.unwrap();
        let archive = &outcome.archive;

        assert_eq!(archive.filename, "rapport_Le_Plateau_2025-01_2025-03.zip");
        assert_eq!(archive.attachment_count, 2);
        assert_eq!(archive.warnings.len(), 1);
        assert!(archive.warnings[0].contains("doc123"));
        assert!(outcome.location.is_none());

        let names = entry_names(&archive.bytes);
        assert!(names.contains(&"rapport_Le_Plateau_2025-01_2025-03.docx".to_string()));
        assert!(names.contains(&"2025-02/Dépenses/Assurances/t1_doc1.pdf".to_string()));
        assert!(names.contains(&"Baux/L1-2025-01_bail-1.pdf".to_string()));
        assert!(names.contains(&"2025-01/Dépenses/Déneigement/".to_string()));
        assert!(!names.iter().any(|n| n.contains("doc123")));

        let xml = report_xml(archive);
        assert!(xml.contains("Sommaire financier"));
        assert!(xml.contains("Diagnostics"));
    }

    #[tokio::test]
    async fn test_unknown_building_gets_placeholder() {
        let pipeline = pipeline(building_api(), PipelineSettings::default());

        let run = pipeline
            .analyze_buildings(&ids(&["A", "C"]), first_quarter())
            .await;

        assert_eq!(run.scope.subject(), "Le Plateau, Immeuble C");
        assert_eq!(run.warnings, vec!["Immeuble C introuvable".to_string()]);
        assert_eq!(run.result.breakdown.len(), 2);
        assert!(run.mortgage.is_none());
    }

    #[tokio::test]
    async fn test_failed_list_degrades_to_partial_analysis() {
        let api = MockApi::new()
            .with_list(
                EntityKind::Buildings,
                json!([{"id": "A", "name": "Le Plateau"}]),
            )
            .with_list(
                EntityKind::Leases,
                json!([{"id": "L1", "building_id": "A", "start_date": "2025-01-01", "rent": "900"}]),
            )
            .with_mortgages(Vec::new());
        let pipeline = pipeline(api, PipelineSettings::default());

        let run = pipeline.analyze_buildings(&ids(&["A"]), first_quarter()).await;

        assert_eq!(run.warnings.len(), 1);
        assert_eq!(run.result.total_revenue, dec!(2700));
        assert_eq!(run.result.total_expenses, dec!(0));
        assert_eq!(run.result.by_month.len(), 3);
    }

    #[tokio::test]
    async fn test_server_summary_replaces_client_totals() {
        let api = building_api().with_profitability(json!({
            "revenue_by_category": {"Loyers": "4000"},
            "expenses_by_category": [{"category": "Taxes municipales", "amount": "-1200"}],
            "months": [{"year": 2025, "month": 1, "revenue": 4000, "expenses": 1200}]
        }));
        let pipeline = pipeline(api, server_settings());

        let run = pipeline.analyze_buildings(&ids(&["A"]), first_quarter()).await;

        assert!(run.warnings.is_empty());
        assert_eq!(run.result.total_revenue, dec!(4000));
        assert_eq!(run.result.total_expenses, dec!(1200));
        assert_eq!(run.result.net_cashflow, dec!(2800));
        assert_eq!(run.result.by_month.len(), 3);
        assert_eq!(run.result.by_month[1].revenue, dec!(0));
        // Details stay client-side.
        assert_eq!(run.result.breakdown.len(), 1);
        assert_eq!(run.result.skipped_count(), 1);
        assert_eq!(run.result.attachments.len(), 3);
    }

    #[tokio::test]
    async fn test_unavailable_server_summary_falls_back() {
        let pipeline = pipeline(building_api(), server_settings());

        let run = pipeline.analyze_buildings(&ids(&["A"]), first_quarter()).await;

        assert_eq!(run.warnings.len(), 1);
        assert!(run.warnings[0].starts_with("Analyse serveur indisponible"));
        assert_eq!(run.result.total_revenue, dec!(3000));
    }

    #[tokio::test]
    async fn test_single_building_mortgage_section() {
        let api = building_api().with_mortgages(vec![MortgageSummary {
            building_id: Some(BuildingId::new("A")),
            terms: MortgageTerms::monthly(dec!(200000), dec!(6), 25),
        }]);
        let pipeline = pipeline(api, PipelineSettings::default());

        let run = pipeline.analyze_buildings(&ids(&["A"]), first_quarter()).await;
        let mortgage = run.mortgage.as_ref().expect("mortgage analysed");
        assert_eq!(mortgage.payment, dec!(1288.60));
        assert_eq!(mortgage.annual_revenue, dec!(12000));

        let outcome = pipeline.export(&run).await.unwrap();
        assert!(report_xml(&outcome.archive).contains("Analyse hypothécaire"));
    }

    #[tokio::test]
    async fn test_project_analysis_and_export() {
        let pipeline = pipeline(project_api(), PipelineSettings::default());

        let run = pipeline
            .analyze_project(&ProjectId::new("P1"), first_quarter())
            .await;

        assert!(run.warnings.is_empty(), "{:?}", run.warnings);
        assert_eq!(run.result.total_expenses, dec!(12450));
        assert_eq!(run.result.total_revenue, dec!(0));
        let budget = run.result.budget.as_ref().expect("project budget");
        assert!(budget.is_over_budget);
        assert_eq!(budget.remaining, dec!(-2450));

        let outcome = pipeline.export(&run).await.unwrap();
        let archive = outcome.archive;
        assert!(archive.is_complete());
        assert_eq!(archive.attachment_count, 2);

        let names = entry_names(&archive.bytes);
        assert!(names.contains(&"Factures sous-traitants/Charpente/f1_fac-1.pdf".to_string()));
        assert!(names.contains(&"Commandes/Toiture/o1-1_bc-1.pdf".to_string()));
        assert!(names.contains(&"Main-d'œuvre/Excavation/".to_string()));
        assert!(report_xml(&archive).contains("Dépassement de budget"));
    }

    #[tokio::test]
    async fn test_missing_project_keeps_placeholder() {
        let api = project_api().with_list(EntityKind::Projects, json!([]));
        let pipeline = pipeline(api, PipelineSettings::default());

        let run = pipeline
            .analyze_project(&ProjectId::new("P1"), first_quarter())
            .await;

        assert_eq!(run.scope.subject(), "Projet P1");
        assert_eq!(run.warnings.len(), 1);
        assert_eq!(run.result.total_expenses, dec!(12450));
    }

    #[tokio::test]
    async fn test_composition_failure_delivers_nothing() {
        let root = std::env::temp_dir().join(format!("propledger-pipeline-{}", Uuid::new_v4()));
        let sink = ArchiveSink::from_provider(&StorageProvider::LocalFs { root: root.clone() })
            .unwrap();
        let pipeline = pipeline(building_api(), PipelineSettings::default()).with_sink(sink);

        let run = pipeline.analyze_buildings(&[], first_quarter()).await;
        let err = pipeline.export(&run).await.unwrap_err();

        assert!(matches!(
            err,
            ExportError::Composition(propledger_core::report::ReportError::EmptySelection)
        ));
        let written = std::fs::read_dir(&root).map_or(0, Iterator::count);
        assert_eq!(written, 0);
    }

    #[tokio::test]
    async fn test_export_is_delivered_to_sink() {
        let root = std::env::temp_dir().join(format!("propledger-pipeline-{}", Uuid::new_v4()));
        let sink = ArchiveSink::from_provider(&StorageProvider::LocalFs { root: root.clone() })
            .unwrap();
        let pipeline = pipeline(project_api(), PipelineSettings::default()).with_sink(sink);

        let run = pipeline
            .analyze_project(&ProjectId::new("P1"), first_quarter())
            .await;
        let outcome = pipeline.export(&run).await.unwrap();

        assert_eq!(
            outcome.location.as_deref(),
            Some("rapport_Duplex_Verdun_2025-01_2025-03.zip")
        );
        let stored = std::fs::read(root.join(&outcome.archive.filename)).unwrap();
        assert_eq!(stored, outcome.archive.bytes.as_ref());

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_concurrent_exports_build_independent_archives() {
        let pipeline = pipeline(building_api(), PipelineSettings::default());
        let run = pipeline.analyze_buildings(&ids(&["A"]), first_quarter()).await;

        let (first, second) = futures::join!(pipeline.export(&run), pipeline.export(&run));
        let first = first.unwrap().archive;
        let second = second.unwrap().archive;

        assert_eq!(first.filename, second.filename);
        assert_eq!(first.attachment_count, 2);
        assert_eq!(second.attachment_count, 2);
        assert_eq!(entry_names(&first.bytes), entry_names(&second.bytes));
    }

    #[tokio::test]
    async fn test_charts_cover_every_kind() {
        let pipeline = pipeline(building_api(), PipelineSettings::default());
        let run = pipeline.analyze_buildings(&ids(&["A"]), first_quarter()).await;

        let kinds: Vec<ChartKind> = run.charts().into_iter().map(|(kind, _)| kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChartKind::StackedBar,
                ChartKind::ExpensePie,
                ChartKind::RevenuePie,
                ChartKind::Monthly
            ]
        );
    }

    #[test]
    fn test_settings_reject_unknown_timezone() {
        let mut config = AppConfig {
            api: ApiConfig {
                base_url: "https://api.example.com".to_string(),
                timeout_secs: 30,
                auth_token: None,
                prefer_server_aggregation: true,
            },
            cache: CacheConfig::default(),
            export: ExportConfig::default(),
            storage: StorageProvider::default(),
        };

        let settings = PipelineSettings::from_config(&config).unwrap();
        assert!(settings.prefer_server_aggregation);
        assert_eq!(settings.timezone, chrono_tz::America::Toronto);

        config.export.timezone = "Mars/Olympus".to_string();
        assert!(matches!(
            PipelineSettings::from_config(&config),
            Err(ExportError::Configuration(_))
        ));
    }
}
