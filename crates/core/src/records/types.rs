//! Financial record types.

use chrono::NaiveDate;
use propledger_shared::types::{BuildingId, DocumentId, ProjectId, RecordId, YearMonth};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::Category;

/// Revenue or expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Money coming in; amount is positive.
    #[serde(alias = "revenu", alias = "income")]
    Revenue,
    /// Money going out; amount is negative.
    #[serde(alias = "depense", alias = "dépense")]
    Expense,
}

impl RecordKind {
    /// French label used for folders and report headings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Revenue => "Revenus",
            Self::Expense => "Dépenses",
        }
    }
}

/// Where a record comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    /// Building transaction.
    Transaction,
    /// Monthly rent implied by a lease.
    LeaseRent,
    /// Subcontractor invoice.
    SubcontractorInvoice,
    /// Purchase order line.
    PurchaseOrder,
    /// Employee time punch.
    Punch,
}

impl RecordSource {
    /// French label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Transaction => "Transactions",
            Self::LeaseRent => "Baux",
            Self::SubcontractorInvoice => "Factures sous-traitants",
            Self::PurchaseOrder => "Commandes",
            Self::Punch => "Main-d'œuvre",
        }
    }

    /// Project expense sources, in report and folder order.
    pub const PROJECT_SOURCES: [Self; 3] = [
        Self::SubcontractorInvoice,
        Self::PurchaseOrder,
        Self::Punch,
    ];
}

/// Owner of a record: exactly one building or one project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum RecordOwner {
    /// Building-level record.
    Building(BuildingId),
    /// Project-level record.
    Project(ProjectId),
}

/// One revenue or expense event.
///
/// `amount` and `date` are optional so that malformed input reaches the
/// aggregation engine, which excludes and counts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialRecord {
    /// Record ID.
    pub id: RecordId,
    /// Declared kind.
    pub kind: RecordKind,
    /// Signed amount: revenue positive, expense negative.
    pub amount: Option<Decimal>,
    /// Category, or section for project expenses.
    pub category: Category,
    /// Date of the event.
    pub date: Option<NaiveDate>,
    /// Owning building or project.
    pub owner: RecordOwner,
    /// Origin of the record.
    pub source: RecordSource,
    /// Payment method.
    pub payment_method: Option<String>,
    /// External reference (cheque number, invoice number).
    pub reference: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Attached document.
    pub attachment: Option<DocumentId>,
}

impl FinancialRecord {
    /// Creates a well-formed record.
    #[must_use]
    pub fn new(
        id: impl Into<RecordId>,
        kind: RecordKind,
        amount: Decimal,
        date: NaiveDate,
        category: Category,
        owner: RecordOwner,
        source: RecordSource,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            amount: Some(amount),
            category,
            date: Some(date),
            owner,
            source,
            payment_method: None,
            reference: None,
            description: None,
            attachment: None,
        }
    }

    /// Sets the attached document.
    #[must_use]
    pub fn with_attachment(mut self, document: impl Into<DocumentId>) -> Self {
        self.attachment = Some(document.into());
        self
    }

    /// Sets the external reference.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A document referenced by an aggregated record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    /// Stored document ID.
    pub document_id: DocumentId,
    /// Record that references the document.
    pub record_id: RecordId,
    /// Kind of the referencing record.
    pub kind: RecordKind,
    /// Category (or section) of the referencing record.
    pub category: Category,
    /// Source of the referencing record.
    pub source: RecordSource,
    /// Month of the referencing record.
    pub month: YearMonth,
}
