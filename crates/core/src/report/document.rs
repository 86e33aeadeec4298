//! Report document model.

use chrono::NaiveDateTime;
use propledger_shared::types::AnalysisPeriod;
use serde::{Deserialize, Serialize};

/// Role of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Title and subject.
    Title,
    /// Period and selection.
    Summary,
    /// Headline totals.
    Totals,
    /// Per-category tables.
    Categories,
    /// Budget versus actual.
    Budget,
    /// Per-building or per-section table.
    Breakdown,
    /// Debt-service analysis.
    Mortgage,
    /// Month-by-month evolution.
    Monthly,
    /// Excluded records.
    Diagnostics,
}

/// A label and its formatted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Label.
    pub key: String,
    /// Formatted value.
    pub value: String,
}

impl KeyValue {
    /// Creates a pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A table of formatted cells.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Column headers.
    pub headers: Vec<String>,
    /// Body rows.
    pub rows: Vec<Vec<String>>,
    /// Totals row.
    pub footer: Option<Vec<String>>,
}

impl Table {
    /// Table with the given headers and no rows.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            footer: None,
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.headers.len()
    }
}

/// A content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Block {
    /// Plain text.
    Paragraph(String),
    /// Label/value pairs.
    KeyValues(Vec<KeyValue>),
    /// Table.
    Table(Table),
    /// Highlighted message.
    Notice(String),
}

/// A titled section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Role.
    pub kind: SectionKind,
    /// Heading.
    pub title: String,
    /// Content.
    pub blocks: Vec<Block>,
}

/// A composed report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Document title.
    pub title: String,
    /// Building names or project name.
    pub subject: String,
    /// Analysis period.
    pub period: AnalysisPeriod,
    /// Local time the report was generated.
    pub generated_at: NaiveDateTime,
    /// Sections in reading order.
    pub sections: Vec<Section>,
}

impl ReportDocument {
    /// First section of the given kind.
    #[must_use]
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Section kinds in order.
    #[must_use]
    pub fn outline(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|s| s.kind).collect()
    }
}
