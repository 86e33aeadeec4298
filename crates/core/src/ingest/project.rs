//! Expense records of a construction project.

use propledger_shared::types::RecordId;
use rust_decimal::Decimal;

use crate::records::{
    CategoryCatalog, FinancialRecord, Project, Punch, PurchaseOrder, RecordKind, RecordOwner,
    RecordSource, SubcontractorInvoice,
};

/// Builds the expense records of `project` from its invoices, orders and punches.
///
/// Entities belonging to another project are ignored. Costs are stored as
/// positive numbers by their sources and are negated here. Each order line
/// becomes its own record so that lines land in their own section.
#[must_use]
pub fn project_records(
    project: &Project,
    invoices: &[SubcontractorInvoice],
    orders: &[PurchaseOrder],
    punches: &[Punch],
) -> Vec<FinancialRecord> {
    let sections = CategoryCatalog::PROJECT_SECTIONS;
    let owner = RecordOwner::Project(project.id.clone());
    let mut records = Vec::new();

    for invoice in invoices.iter().filter(|i| i.project_id == project.id) {
        records.push(FinancialRecord {
            id: invoice.id.clone(),
            kind: RecordKind::Expense,
            amount: invoice.amount.map(negate),
            category: sections.resolve(invoice.section.as_deref()),
            date: invoice.date,
            owner: owner.clone(),
            source: RecordSource::SubcontractorInvoice,
            payment_method: None,
            reference: invoice.number.clone(),
            description: invoice.subcontractor.clone(),
            attachment: invoice.document.clone(),
        });
    }

    for order in orders.iter().filter(|o| o.project_id == project.id) {
        for (index, line) in order.lines.iter().enumerate() {
            records.push(FinancialRecord {
                id: RecordId::new(format!("{}-{}", order.id, index + 1)),
                kind: RecordKind::Expense,
                amount: line.amount.map(negate),
                category: sections.resolve(line.section.as_deref()),
                date: order.date,
                owner: owner.clone(),
                source: RecordSource::PurchaseOrder,
                payment_method: None,
                reference: Some(order.id.to_string()),
                description: line.description.clone().or_else(|| order.supplier.clone()),
                attachment: order.document.clone(),
            });
        }
    }

    for punch in punches.iter().filter(|p| p.project_id == project.id) {
        records.push(FinancialRecord {
            id: punch.id.clone(),
            kind: RecordKind::Expense,
            amount: punch.cost().map(negate),
            category: sections.resolve(punch.section.as_deref()),
            date: punch.date,
            owner: owner.clone(),
            source: RecordSource::Punch,
            payment_method: None,
            reference: None,
            description: punch.employee.clone(),
            attachment: None,
        });
    }

    records
}

fn negate(amount: Decimal) -> Decimal {
    -amount
}
