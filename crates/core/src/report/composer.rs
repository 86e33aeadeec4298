//! Report composer.

use chrono::NaiveDateTime;
use propledger_shared::types::MoneyFormatter;
use rust_decimal::Decimal;

use super::document::{Block, KeyValue, ReportDocument, Section, SectionKind, Table};
use super::error::ReportError;
use crate::aggregation::{AggregationResult, CategoryTotal, Scope};
use crate::budget::BudgetComparison;
use crate::mortgage::MortgageAnalysis;
use crate::records::RecordSource;

/// Composes report documents with one formatter and timestamp.
#[derive(Debug, Clone)]
pub struct ReportComposer {
    formatter: MoneyFormatter,
    generated_at: NaiveDateTime,
    mortgage: Option<MortgageAnalysis>,
}

impl ReportComposer {
    /// Creates a composer.
    #[must_use]
    pub const fn new(formatter: MoneyFormatter, generated_at: NaiveDateTime) -> Self {
        Self {
            formatter,
            generated_at,
            mortgage: None,
        }
    }

    /// Adds a debt-service section.
    #[must_use]
    pub fn with_mortgage(mut self, analysis: MortgageAnalysis) -> Self {
        self.mortgage = Some(analysis);
        self
    }

    /// Composes the report of `result` for `scope`.
    ///
    /// # Errors
    ///
    /// `MissingContext` without a scope, `EmptySelection` for a building
    /// scope with no building.
    pub fn compose(
        &self,
        result: &AggregationResult,
        scope: Option<&Scope>,
    ) -> Result<ReportDocument, ReportError> {
        let scope = scope.ok_or(ReportError::MissingContext)?;
        if scope.is_empty() {
            return Err(ReportError::EmptySelection);
        }

        let title = match scope {
            Scope::Buildings(_) => "Rapport de rentabilité",
            Scope::Project(_) => "Rapport de projet",
        };
        let subject = scope.subject();

        let mut sections = vec![
            self.title_section(title, &subject),
            Self::summary_section(result, scope),
            self.totals_section(result),
            self.categories_section(result, scope),
        ];
        if let Some(budget) = &result.budget {
            sections.push(self.budget_section(budget));
        }
        sections.push(self.breakdown_section(result, scope));
        if let Some(mortgage) = &self.mortgage {
            sections.push(self.mortgage_section(mortgage));
        }
        sections.push(self.monthly_section(result));
        if !result.skipped.is_empty() {
            sections.push(Self::diagnostics_section(result));
        }

        Ok(ReportDocument {
            title: title.to_string(),
            subject,
            period: result.period,
            generated_at: self.generated_at,
            sections,
        })
    }

    fn money(&self, amount: Decimal) -> String {
        self.formatter.format(amount)
    }

    fn percent(&self, value: Decimal) -> String {
        self.formatter.format_percent(value)
    }

    fn title_section(&self, title: &str, subject: &str) -> Section {
        Section {
            kind: SectionKind::Title,
            title: title.to_string(),
            blocks: vec![
                Block::Paragraph(subject.to_string()),
                Block::Paragraph(format!(
                    "Généré le {}",
                    self.generated_at.format("%Y-%m-%d %H:%M")
                )),
            ],
        }
    }

    fn summary_section(result: &AggregationResult, scope: &Scope) -> Section {
        let mut pairs = vec![
            KeyValue::new("Période", result.period.label()),
            KeyValue::new("Nombre de mois", result.period.month_count().to_string()),
        ];
        match scope {
            Scope::Buildings(buildings) => {
                pairs.push(KeyValue::new("Immeubles", buildings.len().to_string()));
                for building in buildings {
                    let address = building.address.as_deref().unwrap_or("adresse inconnue");
                    pairs.push(KeyValue::new(building.name.clone(), address));
                }
            }
            Scope::Project(project) => {
                pairs.push(KeyValue::new("Projet", project.name.clone()));
                if let Some(address) = &project.address {
                    pairs.push(KeyValue::new("Adresse", address.clone()));
                }
            }
        }
        pairs.push(KeyValue::new(
            "Enregistrements analysés",
            result.record_count.to_string(),
        ));

        Section {
            kind: SectionKind::Summary,
            title: "Période et portée".to_string(),
            blocks: vec![Block::KeyValues(pairs)],
        }
    }

    fn totals_section(&self, result: &AggregationResult) -> Section {
        let pairs = vec![
            KeyValue::new("Revenus totaux", self.money(result.total_revenue)),
            KeyValue::new("Dépenses totales", self.money(result.total_expenses)),
            KeyValue::new("Flux de trésorerie net", self.money(result.net_cashflow)),
            KeyValue::new("Base d'investissement", self.money(result.investment_basis)),
            KeyValue::new("Rendement (ROI)", self.percent(result.roi)),
        ];
        Section {
            kind: SectionKind::Totals,
            title: "Sommaire financier".to_string(),
            blocks: vec![Block::KeyValues(pairs)],
        }
    }

    fn categories_section(&self, result: &AggregationResult, scope: &Scope) -> Section {
        let mut blocks = Vec::new();
        if !result.revenue_by_category.is_empty() {
            blocks.push(Block::Paragraph("Revenus par catégorie".to_string()));
            blocks.push(Block::Table(self.category_table(
                "Catégorie",
                &result.revenue_by_category,
                result.total_revenue,
            )));
        }
        let (heading, column) = match scope {
            Scope::Buildings(_) => ("Dépenses par catégorie", "Catégorie"),
            Scope::Project(_) => ("Dépenses par section", "Section"),
        };
        blocks.push(Block::Paragraph(heading.to_string()));
        blocks.push(Block::Table(self.category_table(
            column,
            &result.expense_by_category,
            result.total_expenses,
        )));

        Section {
            kind: SectionKind::Categories,
            title: "Détail par catégorie".to_string(),
            blocks,
        }
    }

    fn category_table(&self, column: &str, totals: &[CategoryTotal], total: Decimal) -> Table {
        let mut table = Table::new([column, "Montant", "Part"]);
        table.rows = totals
            .iter()
            .map(|t| {
                vec![
                    t.category.to_string(),
                    self.money(t.amount),
                    self.percent(share(t.amount, total)),
                ]
            })
            .collect();
        table.footer = Some(vec![
            "Total".to_string(),
            self.money(total),
            self.percent(share(total, total)),
        ]);
        table
    }

    fn budget_section(&self, budget: &BudgetComparison) -> Section {
        let mut blocks = vec![Block::KeyValues(vec![
            KeyValue::new("Budget", self.money(budget.budget)),
            KeyValue::new("Dépenses réelles", self.money(budget.actual)),
            KeyValue::new("Solde restant", self.money(budget.remaining)),
            KeyValue::new("Utilisation", self.percent(budget.percentage_used)),
            KeyValue::new("Statut", budget.status.label()),
        ])];
        if budget.is_over_budget {
            blocks.push(Block::Notice(format!(
                "Dépassement de budget de {}",
                self.money(-budget.remaining)
            )));
        }
        Section {
            kind: SectionKind::Budget,
            title: "Budget et dépenses réelles".to_string(),
            blocks,
        }
    }

    fn breakdown_section(&self, result: &AggregationResult, scope: &Scope) -> Section {
        let (title, table) = match scope {
            Scope::Buildings(_) => {
                let mut table = Table::new(["Immeuble", "Revenus", "Dépenses", "Net"]);
                table.rows = result
                    .breakdown
                    .iter()
                    .map(|g| {
                        vec![
                            g.label.clone(),
                            self.money(g.revenue),
                            self.money(g.expenses),
                            self.money(g.net()),
                        ]
                    })
                    .collect();
                ("Répartition par immeuble", table)
            }
            Scope::Project(_) => {
                let mut headers = vec!["Section".to_string()];
                headers.extend(RecordSource::PROJECT_SOURCES.iter().map(|s| s.label().to_string()));
                headers.push("Total".to_string());
                let mut table = Table::new(headers);
                table.rows = result
                    .breakdown
                    .iter()
                    .map(|g| {
                        let mut row = vec![g.label.clone()];
                        row.extend(RecordSource::PROJECT_SOURCES.iter().map(|source| {
                            let amount = g
                                .segments
                                .iter()
                                .find(|s| s.label == source.label())
                                .map_or(Decimal::ZERO, |s| s.amount);
                            self.money(amount)
                        }));
                        row.push(self.money(g.segment_total()));
                        row
                    })
                    .collect();
                ("Répartition par section", table)
            }
        };

        let blocks = if table.rows.is_empty() {
            vec![Block::Paragraph("Aucune dépense pour la période.".to_string())]
        } else {
            vec![Block::Table(table)]
        };
        Section {
            kind: SectionKind::Breakdown,
            title: title.to_string(),
            blocks,
        }
    }

    fn mortgage_section(&self, analysis: &MortgageAnalysis) -> Section {
        let terms = &analysis.terms;
        let pairs = vec![
            KeyValue::new("Capital", self.money(terms.principal)),
            KeyValue::new("Taux annuel", self.percent(terms.annual_rate)),
            KeyValue::new("Amortissement", format!("{} ans", terms.amortization_years)),
            KeyValue::new("Versement périodique", self.money(analysis.payment)),
            KeyValue::new("Intérêts totaux", self.money(analysis.total_interest)),
            KeyValue::new("Service de la dette annuel", self.money(analysis.annual_debt_service)),
            KeyValue::new("Revenus annualisés", self.money(analysis.annual_revenue)),
            KeyValue::new(
                "Dépenses d'exploitation annualisées",
                self.money(analysis.annual_operating_expenses),
            ),
            KeyValue::new("Revenu net d'exploitation", self.money(analysis.net_operating_income)),
            KeyValue::new(
                "Flux après service de la dette",
                self.money(analysis.cashflow_after_debt_service),
            ),
            KeyValue::new(
                "Ratio de couverture de la dette",
                analysis.debt_service_coverage.to_string(),
            ),
        ];
        Section {
            kind: SectionKind::Mortgage,
            title: "Analyse hypothécaire".to_string(),
            blocks: vec![Block::KeyValues(pairs)],
        }
    }

    fn monthly_section(&self, result: &AggregationResult) -> Section {
        let mut table = Table::new(["Mois", "Revenus", "Dépenses", "Net"]);
        table.rows = result
            .by_month
            .iter()
            .map(|m| {
                vec![
                    m.month.label(),
                    self.money(m.revenue),
                    self.money(m.expenses),
                    self.money(m.net),
                ]
            })
            .collect();
        table.footer = Some(vec![
            "Total".to_string(),
            self.money(result.total_revenue),
            self.money(result.total_expenses),
            self.money(result.net_cashflow),
        ]);
        Section {
            kind: SectionKind::Monthly,
            title: "Évolution mensuelle".to_string(),
            blocks: vec![Block::Table(table)],
        }
    }

    fn diagnostics_section(result: &AggregationResult) -> Section {
        let mut table = Table::new(["Enregistrement", "Raison"]);
        table.rows = result
            .skipped
            .iter()
            .map(|s| vec![s.record_id.to_string(), s.issue.to_string()])
            .collect();
        Section {
            kind: SectionKind::Diagnostics,
            title: "Diagnostics".to_string(),
            blocks: vec![
                Block::Notice(format!(
                    "{} enregistrement(s) exclu(s) des totaux pour données invalides.",
                    result.skipped_count()
                )),
                Block::Table(table),
            ],
        }
    }
}

fn share(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        part / whole * Decimal::ONE_HUNDRED
    }
}
