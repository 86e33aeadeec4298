//! Wire representations of API entities and their conversion to domain types.

use chrono::NaiveDate;
use propledger_core::records::{
    Building, CategoryCatalog, FinancialRecord, Lease, OrderLine, Project, Punch, PurchaseOrder,
    RecordKind, RecordOwner, RecordSource, SubcontractorInvoice,
};
use propledger_shared::types::{BuildingId, DocumentId, LeaseId, ProjectId, RecordId};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::lenient;

/// Conversion of a decoded item into a domain value.
pub trait IntoDomain {
    /// Domain type.
    type Output;

    /// Converts, or explains why the item is unusable.
    fn into_domain(self) -> Result<Self::Output, String>;
}

/// `/buildings` item.
#[derive(Debug, Deserialize)]
pub struct BuildingDto {
    id: BuildingId,
    #[serde(default, alias = "nom", deserialize_with = "lenient::opt_text")]
    name: Option<String>,
    #[serde(default, alias = "adresse", deserialize_with = "lenient::opt_text")]
    address: Option<String>,
    #[serde(
        default,
        alias = "purchasePrice",
        alias = "prix_achat",
        deserialize_with = "lenient::opt_decimal"
    )]
    purchase_price: Option<Decimal>,
}

impl IntoDomain for BuildingDto {
    type Output = Building;

    fn into_domain(self) -> Result<Building, String> {
        Ok(Building {
            name: self.name.unwrap_or_else(|| format!("Immeuble {}", self.id)),
            id: self.id,
            address: self.address,
            purchase_price: self.purchase_price,
        })
    }
}

/// `/leases` item.
#[derive(Debug, Deserialize)]
pub struct LeaseDto {
    id: LeaseId,
    #[serde(alias = "buildingId")]
    building_id: BuildingId,
    #[serde(default, alias = "tenant_name", deserialize_with = "lenient::opt_text")]
    tenant: Option<String>,
    #[serde(default, alias = "unit_number", deserialize_with = "lenient::opt_text")]
    unit: Option<String>,
    #[serde(default, alias = "startDate", deserialize_with = "lenient::opt_date")]
    start_date: Option<NaiveDate>,
    #[serde(default, alias = "endDate", deserialize_with = "lenient::opt_date")]
    end_date: Option<NaiveDate>,
    #[serde(
        default,
        alias = "monthlyRent",
        alias = "rent",
        deserialize_with = "lenient::opt_decimal"
    )]
    monthly_rent: Option<Decimal>,
    #[serde(default, alias = "documentId", deserialize_with = "lenient::opt_id")]
    document_id: Option<DocumentId>,
}

impl IntoDomain for LeaseDto {
    type Output = Lease;

    fn into_domain(self) -> Result<Lease, String> {
        let start_date = self
            .start_date
            .ok_or_else(|| format!("bail {}: date de début manquante", self.id))?;
        let monthly_rent = self
            .monthly_rent
            .ok_or_else(|| format!("bail {}: loyer manquant", self.id))?;
        Ok(Lease {
            id: self.id,
            building_id: self.building_id,
            tenant: self.tenant,
            unit: self.unit,
            start_date,
            end_date: self.end_date,
            monthly_rent,
            document: self.document_id,
        })
    }
}

/// `/transactions` item.
#[derive(Debug, Deserialize)]
pub struct TransactionDto {
    id: RecordId,
    #[serde(alias = "buildingId")]
    building_id: BuildingId,
    #[serde(default, rename = "type", alias = "kind", deserialize_with = "lenient::opt_text")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_decimal")]
    amount: Option<Decimal>,
    #[serde(default, alias = "categorie", deserialize_with = "lenient::opt_text")]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    date: Option<NaiveDate>,
    #[serde(default, alias = "paymentMethod", deserialize_with = "lenient::opt_text")]
    payment_method: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    reference: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    description: Option<String>,
    #[serde(default, alias = "documentId", deserialize_with = "lenient::opt_id")]
    document_id: Option<DocumentId>,
}

impl TransactionDto {
    /// Declared kind; without one, the sign decides.
    fn record_kind(&self) -> RecordKind {
        let declared = self.kind.as_deref().map(str::to_lowercase);
        match declared.as_deref() {
            Some("revenue" | "revenu" | "income") => RecordKind::Revenue,
            Some("expense" | "depense" | "dépense") => RecordKind::Expense,
            _ if self.amount.is_some_and(|a| a < Decimal::ZERO) => RecordKind::Expense,
            _ => RecordKind::Revenue,
        }
    }
}

impl IntoDomain for TransactionDto {
    type Output = FinancialRecord;

    fn into_domain(self) -> Result<FinancialRecord, String> {
        let kind = self.record_kind();
        let catalog = match kind {
            RecordKind::Revenue => CategoryCatalog::BUILDING_REVENUE,
            RecordKind::Expense => CategoryCatalog::BUILDING_EXPENSE,
        };
        Ok(FinancialRecord {
            id: self.id,
            kind,
            amount: self.amount,
            category: catalog.resolve(self.category.as_deref()),
            date: self.date,
            owner: RecordOwner::Building(self.building_id),
            source: RecordSource::Transaction,
            payment_method: self.payment_method,
            reference: self.reference,
            description: self.description,
            attachment: self.document_id,
        })
    }
}

/// `/projects` item.
#[derive(Debug, Deserialize)]
pub struct ProjectDto {
    id: ProjectId,
    #[serde(default, alias = "nom", deserialize_with = "lenient::opt_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_decimal")]
    budget: Option<Decimal>,
    #[serde(default, alias = "adresse", deserialize_with = "lenient::opt_text")]
    address: Option<String>,
}

impl IntoDomain for ProjectDto {
    type Output = Project;

    fn into_domain(self) -> Result<Project, String> {
        Ok(Project {
            name: self.name.unwrap_or_else(|| format!("Projet {}", self.id)),
            id: self.id,
            budget: self.budget,
            address: self.address,
        })
    }
}

/// `/invoices-subcontractor` item.
#[derive(Debug, Deserialize)]
pub struct InvoiceDto {
    id: RecordId,
    #[serde(alias = "projectId")]
    project_id: ProjectId,
    #[serde(default, alias = "subcontractor_name", deserialize_with = "lenient::opt_text")]
    subcontractor: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    section: Option<String>,
    #[serde(default, alias = "invoice_number", deserialize_with = "lenient::opt_text")]
    number: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_decimal")]
    amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    date: Option<NaiveDate>,
    #[serde(default, alias = "documentId", deserialize_with = "lenient::opt_id")]
    document_id: Option<DocumentId>,
}

impl IntoDomain for InvoiceDto {
    type Output = SubcontractorInvoice;

    fn into_domain(self) -> Result<SubcontractorInvoice, String> {
        Ok(SubcontractorInvoice {
            id: self.id,
            project_id: self.project_id,
            subcontractor: self.subcontractor,
            section: self.section,
            number: self.number,
            amount: self.amount,
            date: self.date,
            document: self.document_id,
        })
    }
}

/// Line of an `/orders` item.
#[derive(Debug, Deserialize)]
pub struct OrderLineDto {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    section: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    description: Option<String>,
    #[serde(default, alias = "total", deserialize_with = "lenient::opt_decimal")]
    amount: Option<Decimal>,
}

/// `/orders` item.
///
/// Orders without lines but with a total are read as a single line.
#[derive(Debug, Deserialize)]
pub struct OrderDto {
    id: RecordId,
    #[serde(alias = "projectId")]
    project_id: ProjectId,
    #[serde(default, alias = "supplier_name", deserialize_with = "lenient::opt_text")]
    supplier: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    date: Option<NaiveDate>,
    #[serde(default, alias = "items")]
    lines: Vec<OrderLineDto>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    section: Option<String>,
    #[serde(default, alias = "total", deserialize_with = "lenient::opt_decimal")]
    amount: Option<Decimal>,
    #[serde(default, alias = "documentId", deserialize_with = "lenient::opt_id")]
    document_id: Option<DocumentId>,
}

impl IntoDomain for OrderDto {
    type Output = PurchaseOrder;

    fn into_domain(self) -> Result<PurchaseOrder, String> {
        let mut lines: Vec<OrderLine> = self
            .lines
            .into_iter()
            .map(|line| OrderLine {
                section: line.section.or_else(|| self.section.clone()),
                description: line.description,
                amount: line.amount,
            })
            .collect();
        if lines.is_empty() {
            if self.amount.is_none() {
                return Err(format!("commande {}: aucune ligne", self.id));
            }
            lines.push(OrderLine {
                section: self.section,
                description: None,
                amount: self.amount,
            });
        }
        Ok(PurchaseOrder {
            id: self.id,
            project_id: self.project_id,
            supplier: self.supplier,
            date: self.date,
            lines,
            document: self.document_id,
        })
    }
}

/// `/punches` item.
#[derive(Debug, Deserialize)]
pub struct PunchDto {
    id: RecordId,
    #[serde(alias = "projectId")]
    project_id: ProjectId,
    #[serde(default, alias = "employee_name", deserialize_with = "lenient::opt_text")]
    employee: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::opt_decimal")]
    hours: Option<Decimal>,
    #[serde(
        default,
        alias = "hourlyRate",
        alias = "rate",
        deserialize_with = "lenient::opt_decimal"
    )]
    hourly_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    section: Option<String>,
}

impl IntoDomain for PunchDto {
    type Output = Punch;

    fn into_domain(self) -> Result<Punch, String> {
        Ok(Punch {
            id: self.id,
            project_id: self.project_id,
            employee: self.employee,
            date: self.date,
            hours: self.hours,
            hourly_rate: self.hourly_rate,
            section: self.section,
        })
    }
}
