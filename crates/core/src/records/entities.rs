//! Entities owning financial records.

use chrono::NaiveDate;
use propledger_shared::types::{BuildingId, DocumentId, LeaseId, ProjectId, RecordId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A rental building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    /// Building ID.
    pub id: BuildingId,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// Purchase price, the investment basis for ROI.
    pub purchase_price: Option<Decimal>,
}

/// A lease on a unit of a building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lease {
    /// Lease ID.
    pub id: LeaseId,
    /// Building the unit belongs to.
    pub building_id: BuildingId,
    /// Tenant reference.
    pub tenant: Option<String>,
    /// Unit reference.
    pub unit: Option<String>,
    /// First day of the lease.
    pub start_date: NaiveDate,
    /// Last day of the lease, `None` when open-ended.
    pub end_date: Option<NaiveDate>,
    /// Monthly rent.
    pub monthly_rent: Decimal,
    /// Signed lease document.
    pub document: Option<DocumentId>,
}

/// A construction project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project ID.
    pub id: ProjectId,
    /// Display name.
    pub name: String,
    /// Total budget.
    pub budget: Option<Decimal>,
    /// Site address.
    pub address: Option<String>,
}

/// An invoice received from a subcontractor.
///
/// Amounts are stored as positive costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcontractorInvoice {
    /// Invoice ID.
    pub id: RecordId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Subcontractor name.
    pub subcontractor: Option<String>,
    /// Cost section.
    pub section: Option<String>,
    /// Invoice number.
    pub number: Option<String>,
    /// Amount charged.
    pub amount: Option<Decimal>,
    /// Invoice date.
    pub date: Option<NaiveDate>,
    /// Scanned invoice.
    pub document: Option<DocumentId>,
}

/// One line of a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Cost section.
    pub section: Option<String>,
    /// Line description.
    pub description: Option<String>,
    /// Line amount.
    pub amount: Option<Decimal>,
}

/// A purchase order for materials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Order ID.
    pub id: RecordId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Supplier name.
    pub supplier: Option<String>,
    /// Order date.
    pub date: Option<NaiveDate>,
    /// Order lines.
    pub lines: Vec<OrderLine>,
    /// Order document.
    pub document: Option<DocumentId>,
}

/// An employee time punch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Punch {
    /// Punch ID.
    pub id: RecordId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Employee name.
    pub employee: Option<String>,
    /// Work date.
    pub date: Option<NaiveDate>,
    /// Hours worked.
    pub hours: Option<Decimal>,
    /// Hourly rate.
    pub hourly_rate: Option<Decimal>,
    /// Cost section.
    pub section: Option<String>,
}

impl Punch {
    /// Labour cost (hours × hourly rate), `None` when either is missing.
    #[must_use]
    pub fn cost(&self) -> Option<Decimal> {
        Some(self.hours? * self.hourly_rate?)
    }
}
