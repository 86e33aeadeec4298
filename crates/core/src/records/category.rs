//! Category labels and the fixed catalogs they resolve against.

use serde::{Deserialize, Serialize};

/// Bucket for missing or unknown categories.
pub const OTHER_LABEL: &str = "Autres";

/// Category of rent revenue generated from leases.
pub const RENT_LABEL: &str = "Loyers";

/// Expense category holding mortgage payments.
pub const MORTGAGE_LABEL: &str = "Hypothèque";

/// Category label of a record (or section label for project expenses).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Creates a category with the given label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The `Autres` bucket.
    #[must_use]
    pub fn other() -> Self {
        Self(OTHER_LABEL.to_string())
    }

    /// Label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the `Autres` bucket.
    #[must_use]
    pub fn is_other(&self) -> bool {
        self.0 == OTHER_LABEL
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fixed, ordered enumeration of category labels.
///
/// Catalogs are known before any data is fetched: they seed zero-valued
/// category totals and the archive folder plan. Every catalog ends with
/// [`OTHER_LABEL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryCatalog {
    labels: &'static [&'static str],
}

impl CategoryCatalog {
    /// Revenue categories of a building.
    pub const BUILDING_REVENUE: Self = Self {
        labels: &[RENT_LABEL, "Stationnement", "Buanderie", OTHER_LABEL],
    };

    /// Expense categories of a building.
    pub const BUILDING_EXPENSE: Self = Self {
        labels: &[
            "Taxes municipales",
            "Taxes scolaires",
            "Assurances",
            MORTGAGE_LABEL,
            "Entretien et réparations",
            "Électricité",
            "Chauffage",
            "Déneigement",
            "Gestion",
            "Frais bancaires",
            OTHER_LABEL,
        ],
    };

    /// Cost sections of a construction project.
    pub const PROJECT_SECTIONS: Self = Self {
        labels: &[
            "Excavation",
            "Fondation",
            "Charpente",
            "Toiture",
            "Plomberie",
            "Électricité",
            "Ventilation",
            "Isolation",
            "Gypse",
            "Finition",
            OTHER_LABEL,
        ],
    };

    /// Labels in catalog order.
    #[must_use]
    pub const fn labels(&self) -> &'static [&'static str] {
        self.labels
    }

    /// Categories in catalog order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + use<> {
        let labels = self.labels;
        labels.iter().map(|label| Category::new(*label))
    }

    /// Returns true if the label belongs to the catalog.
    #[must_use]
    pub fn contains(&self, category: &Category) -> bool {
        self.labels.contains(&category.as_str())
    }

    /// Maps a raw label onto the catalog.
    ///
    /// Matching ignores case and surrounding whitespace. Missing, blank or
    /// unknown labels resolve to `Autres`.
    #[must_use]
    pub fn resolve(&self, raw: Option<&str>) -> Category {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Category::other();
        };
        let wanted = raw.to_lowercase();
        self.labels
            .iter()
            .find(|label| label.to_lowercase() == wanted)
            .map_or_else(Category::other, |label| Category::new(*label))
    }
}
