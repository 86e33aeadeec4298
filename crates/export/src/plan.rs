//! Archive folder plan.
//!
//! The folder tree depends only on the selection mode and period, never on
//! the fetched data, so every category folder exists even when empty.

use propledger_core::aggregation::Scope;
use propledger_core::records::{AttachmentRef, CategoryCatalog, RecordKind, RecordSource};
use propledger_shared::types::AnalysisPeriod;

/// Folder holding lease documents in building mode.
pub const LEASE_FOLDER: &str = "Baux";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Layout {
    Buildings,
    Project,
}

/// The fixed folder hierarchy of one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderPlan {
    layout: Layout,
    folders: Vec<String>,
}

impl FolderPlan {
    /// `{YYYY-MM}/{Revenus|Dépenses}/{category}` for every month and catalog
    /// category, plus [`LEASE_FOLDER`].
    #[must_use]
    pub fn for_buildings(period: &AnalysisPeriod) -> Self {
        let mut folders = Vec::new();
        for month in period.months() {
            for (kind, catalog) in [
                (RecordKind::Revenue, CategoryCatalog::BUILDING_REVENUE),
                (RecordKind::Expense, CategoryCatalog::BUILDING_EXPENSE),
            ] {
                for label in catalog.labels() {
                    folders.push(format!("{month}/{}/{label}", kind.label()));
                }
            }
        }
        folders.push(LEASE_FOLDER.to_string());

        Self {
            layout: Layout::Buildings,
            folders,
        }
    }

    /// `{source}/{section}` for every project expense source and section.
    #[must_use]
    pub fn for_project() -> Self {
        let folders = RecordSource::PROJECT_SOURCES
            .iter()
            .flat_map(|source| {
                CategoryCatalog::PROJECT_SECTIONS
                    .labels()
                    .iter()
                    .map(move |section| format!("{}/{section}", source.label()))
            })
            .collect();

        Self {
            layout: Layout::Project,
            folders,
        }
    }

    /// Plan matching a selection.
    #[must_use]
    pub fn for_scope(scope: &Scope, period: &AnalysisPeriod) -> Self {
        match scope {
            Scope::Buildings(_) => Self::for_buildings(period),
            Scope::Project(_) => Self::for_project(),
        }
    }

    /// Folders in creation order.
    #[must_use]
    pub fn folders(&self) -> &[String] {
        &self.folders
    }

    /// Returns true if the folder is part of the plan.
    #[must_use]
    pub fn contains(&self, folder: &str) -> bool {
        self.folders.iter().any(|f| f == folder)
    }

    /// Folder an attachment is placed in.
    ///
    /// Categories outside the catalogs land in `Autres`. Returns `None` when
    /// the attachment has no place in this plan, e.g. a month outside the
    /// period.
    #[must_use]
    pub fn folder_for(&self, attachment: &AttachmentRef) -> Option<String> {
        let folder = match (&self.layout, attachment.source) {
            (Layout::Buildings, RecordSource::LeaseRent) => LEASE_FOLDER.to_string(),
            (Layout::Buildings, _) => {
                let catalog = match attachment.kind {
                    RecordKind::Revenue => CategoryCatalog::BUILDING_REVENUE,
                    RecordKind::Expense => CategoryCatalog::BUILDING_EXPENSE,
                };
                let category = catalog.resolve(Some(attachment.category.as_str()));
                format!("{}/{}/{category}", attachment.month, attachment.kind.label())
            }
            (Layout::Project, source) => {
                let section = CategoryCatalog::PROJECT_SECTIONS
                    .resolve(Some(attachment.category.as_str()));
                format!("{}/{section}", source.label())
            }
        };
        self.contains(&folder).then_some(folder)
    }
}
