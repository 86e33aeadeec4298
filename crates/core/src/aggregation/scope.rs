//! Selection an aggregation applies to.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::records::{Building, CategoryCatalog, Project, RecordOwner};

/// A set of buildings or a single project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "selection", rename_all = "snake_case")]
pub enum Scope {
    /// Building mode.
    Buildings(Vec<Building>),
    /// Project mode.
    Project(Project),
}

impl Scope {
    /// Returns true when the record owner belongs to the selection.
    #[must_use]
    pub fn owns(&self, owner: &RecordOwner) -> bool {
        match (self, owner) {
            (Self::Buildings(buildings), RecordOwner::Building(id)) => {
                buildings.iter().any(|b| &b.id == id)
            }
            (Self::Project(project), RecordOwner::Project(id)) => &project.id == id,
            _ => false,
        }
    }

    /// Default investment basis: sum of purchase prices, or the project budget.
    #[must_use]
    pub fn investment_basis(&self) -> Decimal {
        match self {
            Self::Buildings(buildings) => buildings.iter().filter_map(|b| b.purchase_price).sum(),
            Self::Project(project) => project.budget.unwrap_or(Decimal::ZERO),
        }
    }

    /// Catalog seeding revenue category totals. Projects have none.
    #[must_use]
    pub const fn revenue_catalog(&self) -> Option<CategoryCatalog> {
        match self {
            Self::Buildings(_) => Some(CategoryCatalog::BUILDING_REVENUE),
            Self::Project(_) => None,
        }
    }

    /// Catalog seeding expense category totals.
    #[must_use]
    pub const fn expense_catalog(&self) -> CategoryCatalog {
        match self {
            Self::Buildings(_) => CategoryCatalog::BUILDING_EXPENSE,
            Self::Project(_) => CategoryCatalog::PROJECT_SECTIONS,
        }
    }

    /// Human-readable subject: building names or the project name.
    #[must_use]
    pub fn subject(&self) -> String {
        match self {
            Self::Buildings(buildings) => buildings
                .iter()
                .map(|b| b.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            Self::Project(project) => project.name.clone(),
        }
    }

    /// Returns true for an empty building selection.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Buildings(buildings) if buildings.is_empty())
    }
}
