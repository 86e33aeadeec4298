//! Property-based and scenario tests for the aggregation engine.

use chrono::NaiveDate;
use propledger_shared::types::{AnalysisPeriod, BuildingId, DocumentId, ProjectId, YearMonth};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::engine::AggregationEngine;
use super::scope::Scope;
use crate::budget::VarianceStatus;
use crate::records::{
    Building, Category, FinancialRecord, Project, RecordIssue, RecordKind, RecordOwner,
    RecordSource,
};

fn ym(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn building(id: &str, price: Option<Decimal>) -> Building {
    Building {
        id: BuildingId::new(id),
        name: format!("Immeuble {id}"),
        address: None,
        purchase_price: price,
    }
}

fn project(budget: Option<Decimal>) -> Project {
    Project {
        id: ProjectId::new("P1"),
        name: "Duplex Verdun".to_string(),
        budget,
        address: None,
    }
}

fn building_record(
    id: &str,
    building: &str,
    kind: RecordKind,
    amount: Decimal,
    date: NaiveDate,
    category: &str,
) -> FinancialRecord {
    FinancialRecord::new(
        id,
        kind,
        amount,
        date,
        Category::new(category),
        RecordOwner::Building(BuildingId::new(building)),
        RecordSource::Transaction,
    )
}

fn project_record(
    id: &str,
    amount: Decimal,
    date: NaiveDate,
    section: &str,
    source: RecordSource,
) -> FinancialRecord {
    FinancialRecord::new(
        id,
        RecordKind::Expense,
        amount,
        date,
        Category::new(section),
        RecordOwner::Project(ProjectId::new("P1")),
        source,
    )
}

fn arb_record() -> impl Strategy<Value = FinancialRecord> {
    (
        any::<bool>(),
        0i64..5_000_000,
        1u32..=12,
        1u32..=28,
        prop::sample::select(vec!["Loyers", "Assurances", "Chauffage", "Piscine", "Autres"]),
        prop::sample::select(vec!["A", "B"]),
        any::<bool>(),
    )
        .prop_map(|(revenue, cents, month, day, category, owner, agrees)| {
            let magnitude = Decimal::new(cents, 2);
            let (kind, signed) = if revenue {
                (RecordKind::Revenue, magnitude)
            } else {
                (RecordKind::Expense, -magnitude)
            };
            let amount = if agrees { signed } else { -signed };
            building_record(
                &format!("r-{owner}-{month}-{day}-{cents}"),
                owner,
                kind,
                amount,
                date(2025, month, day),
                category,
            )
        })
}

fn buildings_scope() -> Scope {
    Scope::Buildings(vec![building("A", Some(dec!(100000))), building("B", None)])
}

proptest! {
    /// Cashflow identity holds exactly.
    #[test]
    fn prop_cashflow_identity(records in prop::collection::vec(arb_record(), 0..60)) {
        let period = AnalysisPeriod::new(ym(2025, 1), ym(2025, 12)).unwrap();
        let result = AggregationEngine::aggregate(&records, &period, &buildings_scope());

        prop_assert_eq!(result.net_cashflow, result.total_revenue - result.total_expenses);
        prop_assert!(result.total_expenses >= Decimal::ZERO);
        prop_assert!(result.total_revenue >= Decimal::ZERO);
    }

    /// One month entry per month of the period.
    #[test]
    fn prop_month_completeness(
        records in prop::collection::vec(arb_record(), 0..30),
        start in 1u32..=12,
        span in 0u32..30,
    ) {
        let start = ym(2024, start);
        let mut end = start;
        for _ in 0..span {
            end = end.next();
        }
        let period = AnalysisPeriod::new(start, end).unwrap();
        let result = AggregationEngine::aggregate(&records, &period, &buildings_scope());

        prop_assert_eq!(result.by_month.len(), (span + 1) as usize);
        prop_assert_eq!(result.by_month.first().map(|m| m.month), Some(start));
        prop_assert_eq!(result.by_month.last().map(|m| m.month), Some(end));
    }

    /// Category totals sum to the kind totals.
    #[test]
    fn prop_category_completeness(records in prop::collection::vec(arb_record(), 0..60)) {
        let period = AnalysisPeriod::new(ym(2025, 1), ym(2025, 12)).unwrap();
        let result = AggregationEngine::aggregate(&records, &period, &buildings_scope());

        let expenses: Decimal = result.expense_by_category.iter().map(|c| c.amount).sum();
        let revenue: Decimal = result.revenue_by_category.iter().map(|c| c.amount).sum();
        prop_assert_eq!(expenses, result.total_expenses);
        prop_assert_eq!(revenue, result.total_revenue);

        let monthly: Decimal = result.by_month.iter().map(|m| m.net).sum();
        prop_assert_eq!(monthly, result.net_cashflow);
    }

    /// Aggregation is deterministic.
    #[test]
    fn prop_idempotence(records in prop::collection::vec(arb_record(), 0..60)) {
        let period = AnalysisPeriod::new(ym(2025, 1), ym(2025, 12)).unwrap();
        let first = AggregationEngine::aggregate(&records, &period, &buildings_scope());
        let second = AggregationEngine::aggregate(&records, &period, &buildings_scope());
        prop_assert_eq!(first, second);
    }

    /// Sign mismatches never reach the totals; each is skipped and counted.
    #[test]
    fn prop_sign_violations_are_skipped(records in prop::collection::vec(arb_record(), 0..60)) {
        let period = AnalysisPeriod::new(ym(2025, 1), ym(2025, 12)).unwrap();
        let result = AggregationEngine::aggregate(&records, &period, &buildings_scope());

        let violations = records.iter().filter(|r| r.check().is_err()).count();
        prop_assert_eq!(result.skipped_count(), violations);
        prop_assert_eq!(result.record_count + violations, records.len());
    }
}

mod unit_tests {
    use super::*;

    #[test]
    fn test_single_month_building_totals() {
        let records = vec![
            building_record("e1", "A", RecordKind::Expense, dec!(-100), date(2025, 3, 4), "Assurances"),
            building_record("e2", "A", RecordKind::Expense, dec!(-50), date(2025, 3, 20), "Chauffage"),
            building_record("r1", "A", RecordKind::Revenue, dec!(500), date(2025, 3, 1), "Loyers"),
        ];
        let period = AnalysisPeriod::single(ym(2025, 3));
        let scope = Scope::Buildings(vec![building("A", None)]);

        let result = AggregationEngine::aggregate(&records, &period, &scope);

        assert_eq!(result.total_revenue, dec!(500));
        assert_eq!(result.total_expenses, dec!(150));
        assert_eq!(result.net_cashflow, dec!(350));
        assert_eq!(result.record_count, 3);
        assert!(result.budget.is_none());
    }

    #[test]
    fn test_months_without_records_are_zero() {
        let records = vec![
            building_record("r1", "A", RecordKind::Revenue, dec!(900), date(2025, 2, 1), "Loyers"),
            building_record("e1", "A", RecordKind::Expense, dec!(-300), date(2025, 2, 14), "Gestion"),
        ];
        let period = AnalysisPeriod::new(ym(2025, 1), ym(2025, 3)).unwrap();
        let scope = Scope::Buildings(vec![building("A", None)]);

        let result = AggregationEngine::aggregate(&records, &period, &scope);

        let months: Vec<_> = result
            .by_month
            .iter()
            .map(|m| (m.month.to_string(), m.revenue, m.expenses))
            .collect();
        assert_eq!(
            months,
            vec![
                ("2025-01".to_string(), dec!(0), dec!(0)),
                ("2025-02".to_string(), dec!(900), dec!(300)),
                ("2025-03".to_string(), dec!(0), dec!(0)),
            ]
        );
    }

    #[test]
    fn test_project_over_budget() {
        let records = vec![
            project_record("i1", dec!(-7000), date(2025, 5, 2), "Fondation", RecordSource::SubcontractorInvoice),
            project_record("o1", dec!(-3000), date(2025, 5, 9), "Charpente", RecordSource::PurchaseOrder),
            project_record("p1", dec!(-2000), date(2025, 6, 1), "Charpente", RecordSource::Punch),
        ];
        let period = AnalysisPeriod::new(ym(2025, 5), ym(2025, 6)).unwrap();
        let scope = Scope::Project(project(Some(dec!(10000))));

        let result = AggregationEngine::aggregate(&records, &period, &scope);
        let budget = result.budget.expect("project mode has a budget comparison");

        assert_eq!(result.total_expenses, dec!(12000));
        assert!(budget.is_over_budget);
        assert_eq!(budget.remaining, dec!(-2000));
        assert_eq!(budget.percentage_used, dec!(120));
        assert_eq!(budget.status, VarianceStatus::Unfavorable);
    }

    #[test]
    fn test_catalog_categories_present_and_ordered() {
        let records = vec![
            building_record("e1", "A", RecordKind::Expense, dec!(-80), date(2025, 1, 5), "Piscine"),
            building_record("e2", "A", RecordKind::Expense, dec!(-20), date(2025, 1, 6), "Assurances"),
            building_record("e3", "A", RecordKind::Expense, dec!(-10), date(2025, 1, 7), "Aqueduc"),
        ];
        let period = AnalysisPeriod::single(ym(2025, 1));
        let scope = Scope::Buildings(vec![building("A", None)]);

        let result = AggregationEngine::aggregate(&records, &period, &scope);
        let labels: Vec<&str> = result
            .expense_by_category
            .iter()
            .map(|c| c.category.as_str())
            .collect();

        assert_eq!(labels.first(), Some(&"Taxes municipales"));
        assert!(labels.contains(&"Autres"));
        assert_eq!(&labels[labels.len() - 2..], &["Aqueduc", "Piscine"]);
        assert_eq!(result.expense_for("Taxes municipales"), Decimal::ZERO);
        assert_eq!(result.expense_for("Assurances"), dec!(20));
    }

    #[test]
    fn test_malformed_records_are_skipped_with_reason() {
        let mut missing_amount =
            building_record("m1", "A", RecordKind::Expense, dec!(-1), date(2025, 1, 1), "Gestion");
        missing_amount.amount = None;
        let mut missing_date =
            building_record("m2", "A", RecordKind::Expense, dec!(-1), date(2025, 1, 1), "Gestion");
        missing_date.date = None;
        let positive_expense =
            building_record("m3", "A", RecordKind::Expense, dec!(40), date(2025, 1, 1), "Gestion");
        let good = building_record("ok", "A", RecordKind::Revenue, dec!(10), date(2025, 1, 1), "Loyers");

        let period = AnalysisPeriod::single(ym(2025, 1));
        let scope = Scope::Buildings(vec![building("A", None)]);
        let result = AggregationEngine::aggregate(
            &[missing_amount, missing_date, positive_expense, good],
            &period,
            &scope,
        );

        assert_eq!(result.record_count, 1);
        assert_eq!(result.total_expenses, Decimal::ZERO);
        let issues: Vec<RecordIssue> = result.skipped.iter().map(|s| s.issue).collect();
        assert_eq!(
            issues,
            vec![
                RecordIssue::MissingAmount,
                RecordIssue::MissingDate,
                RecordIssue::SignMismatch {
                    kind: RecordKind::Expense,
                    amount: dec!(40)
                },
            ]
        );
    }

    #[test]
    fn test_records_outside_scope_or_period_are_ignored() {
        let records = vec![
            building_record("a", "A", RecordKind::Revenue, dec!(100), date(2025, 1, 3), "Loyers"),
            building_record("c", "C", RecordKind::Revenue, dec!(999), date(2025, 1, 3), "Loyers"),
            building_record("late", "A", RecordKind::Revenue, dec!(50), date(2025, 2, 1), "Loyers"),
            project_record("p", dec!(-10), date(2025, 1, 3), "Toiture", RecordSource::Punch),
        ];
        let period = AnalysisPeriod::single(ym(2025, 1));
        let scope = Scope::Buildings(vec![building("A", None)]);

        let result = AggregationEngine::aggregate(&records, &period, &scope);

        assert_eq!(result.total_revenue, dec!(100));
        assert_eq!(result.record_count, 1);
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn test_roi_from_purchase_prices_and_override() {
        let records = vec![building_record(
            "r1",
            "A",
            RecordKind::Revenue,
            dec!(12345),
            date(2025, 1, 1),
            "Loyers",
        )];
        let period = AnalysisPeriod::single(ym(2025, 1));
        let scope = Scope::Buildings(vec![
            building("A", Some(dec!(200000))),
            building("B", Some(dec!(100000))),
        ]);

        let result = AggregationEngine::aggregate(&records, &period, &scope);
        assert_eq!(result.investment_basis, dec!(300000));
        assert_eq!(result.roi, dec!(4.12));

        let overridden =
            AggregationEngine::aggregate_with_basis(&records, &period, &scope, Some(dec!(0)));
        assert_eq!(overridden.roi, Decimal::ZERO);
    }

    #[test]
    fn test_building_breakdown_keeps_every_building() {
        let records = vec![
            building_record("e1", "A", RecordKind::Expense, dec!(-60), date(2025, 1, 5), "Chauffage"),
            building_record("e2", "A", RecordKind::Expense, dec!(-40), date(2025, 1, 6), "Assurances"),
            building_record("r1", "A", RecordKind::Revenue, dec!(500), date(2025, 1, 1), "Loyers"),
        ];
        let period = AnalysisPeriod::single(ym(2025, 1));

        let result = AggregationEngine::aggregate(&records, &period, &buildings_scope());

        assert_eq!(result.breakdown.len(), 2);
        let a = &result.breakdown[0];
        assert_eq!(a.key, "A");
        assert_eq!(a.revenue, dec!(500));
        assert_eq!(a.expenses, dec!(100));
        assert_eq!(a.net(), dec!(400));
        let segments: Vec<&str> = a.segments.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(segments, vec!["Assurances", "Chauffage"]);
        assert!(result.breakdown[1].segments.is_empty());
    }

    #[test]
    fn test_project_breakdown_by_section_and_source() {
        let records = vec![
            project_record("i1", dec!(-700), date(2025, 5, 2), "Charpente", RecordSource::SubcontractorInvoice),
            project_record("o1", dec!(-300), date(2025, 5, 9), "Charpente", RecordSource::PurchaseOrder),
            project_record("p1", dec!(-200), date(2025, 5, 1), "Excavation", RecordSource::Punch),
        ];
        let period = AnalysisPeriod::single(ym(2025, 5));

        let result = AggregationEngine::aggregate(&records, &period, &Scope::Project(project(None)));

        let keys: Vec<&str> = result.breakdown.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Excavation", "Charpente"]);
        let framing = &result.breakdown[1];
        assert_eq!(framing.segment_total(), dec!(1000));
        assert_eq!(framing.segments[0].label, "Factures sous-traitants");
        assert_eq!(framing.segments[1].label, "Commandes");
    }

    #[test]
    fn test_attachments_in_record_order_without_duplicates() {
        let records = vec![
            building_record("e1", "A", RecordKind::Expense, dec!(-10), date(2025, 1, 5), "Gestion")
                .with_attachment("doc-2"),
            building_record("e2", "A", RecordKind::Expense, dec!(-10), date(2025, 1, 6), "Gestion")
                .with_attachment("doc-1"),
            building_record("e3", "A", RecordKind::Expense, dec!(-10), date(2025, 1, 7), "Gestion")
                .with_attachment("doc-2"),
        ];
        let period = AnalysisPeriod::single(ym(2025, 1));
        let scope = Scope::Buildings(vec![building("A", None)]);

        let result = AggregationEngine::aggregate(&records, &period, &scope);
        let docs: Vec<&DocumentId> = result.attachments.iter().map(|a| &a.document_id).collect();

        assert_eq!(docs, vec![&DocumentId::new("doc-2"), &DocumentId::new("doc-1")]);
        assert_eq!(result.attachments[0].record_id.as_str(), "e1");
        assert_eq!(result.attachments[0].month, ym(2025, 1));
    }

    #[test]
    fn test_huge_amount_with_tiny_purchase_price() {
        let huge = Decimal::from_i128_with_scale(10_000_000_000_000_000_000_000_000_000, 0);
        let records = vec![building_record(
            "r1",
            "A",
            RecordKind::Revenue,
            huge,
            date(2025, 1, 1),
            "Loyers",
        )];
        let period = AnalysisPeriod::single(ym(2025, 1));
        let scope = Scope::Buildings(vec![building("A", Some(dec!(0.01)))]);

        let result = AggregationEngine::aggregate(&records, &period, &scope);

        assert_eq!(result.total_revenue, huge);
        assert_eq!(result.roi, Decimal::ZERO);
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn test_amounts_overflowing_totals_are_skipped() {
        let huge = Decimal::from_i128_with_scale(70_000_000_000_000_000_000_000_000_000, 0);
        let records = vec![
            building_record("r1", "A", RecordKind::Revenue, huge, date(2025, 1, 1), "Loyers"),
            building_record("r2", "A", RecordKind::Revenue, huge, date(2025, 1, 2), "Loyers"),
            building_record("e1", "A", RecordKind::Expense, -huge, date(2025, 1, 3), "Taxes"),
            building_record("e2", "A", RecordKind::Expense, dec!(-10), date(2025, 1, 4), "Taxes"),
        ];
        let period = AnalysisPeriod::single(ym(2025, 1));
        let scope = Scope::Buildings(vec![building("A", Some(dec!(0.01)))]);

        let result = AggregationEngine::aggregate(&records, &period, &scope);

        assert_eq!(result.total_revenue, huge);
        assert_eq!(result.total_expenses, dec!(10));
        assert_eq!(result.record_count, 2);
        let skipped: Vec<(&str, RecordIssue)> = result
            .skipped
            .iter()
            .map(|s| (s.record_id.as_str(), s.issue))
            .collect();
        assert_eq!(
            skipped,
            vec![
                ("r2", RecordIssue::AmountOutOfRange),
                ("e1", RecordIssue::AmountOutOfRange),
            ]
        );
    }

    #[test]
    fn test_tiny_project_budget_does_not_overflow() {
        let huge = Decimal::from_i128_with_scale(70_000_000_000_000_000_000_000_000_000, 0);
        let records = vec![project_record(
            "inv-1",
            -huge,
            date(2025, 2, 10),
            "Charpente",
            RecordSource::SubcontractorInvoice,
        )];
        let period = AnalysisPeriod::single(ym(2025, 2));

        let scope = Scope::Project(project(Some(dec!(0.01))));

        let result = AggregationEngine::aggregate(&records, &period, &scope);

        let budget = result.budget.unwrap();
        assert!(budget.is_over_budget);
        assert_eq!(budget.percentage_used, Decimal::ZERO);
        assert_eq!(result.roi, Decimal::ZERO);
    }
}
