//! Record validation.
//!
//! A record contributes to totals only when it carries an amount and a date
//! and its sign agrees with its declared kind. Anything else is a data error:
//! reported, never fatal.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{FinancialRecord, RecordKind};

/// Why a record was excluded from totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum RecordIssue {
    /// No amount.
    MissingAmount,
    /// No date, or an unparseable one.
    MissingDate,
    /// Amount sign contradicts the declared kind.
    SignMismatch {
        /// Declared kind.
        kind: RecordKind,
        /// Offending amount.
        amount: Decimal,
    },
    /// Amount too large to add to the running totals.
    AmountOutOfRange,
}

impl std::fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingAmount => write!(f, "montant manquant"),
            Self::MissingDate => write!(f, "date manquante"),
            Self::SignMismatch { kind, amount } => {
                write!(f, "signe incohérent ({} de {amount})", kind.label())
            }
            Self::AmountOutOfRange => write!(f, "montant hors limites"),
        }
    }
}

/// Returns true when the amount's sign agrees with the kind.
///
/// Zero agrees with both kinds.
#[must_use]
pub fn sign_agrees(kind: RecordKind, amount: Decimal) -> bool {
    match kind {
        RecordKind::Revenue => amount >= Decimal::ZERO,
        RecordKind::Expense => amount <= Decimal::ZERO,
    }
}

impl FinancialRecord {
    /// Validates the record, returning its amount and date.
    ///
    /// # Errors
    ///
    /// Returns the first issue found: missing amount, missing date, then
    /// sign mismatch.
    pub fn check(&self) -> Result<(Decimal, NaiveDate), RecordIssue> {
        let amount = self.amount.ok_or(RecordIssue::MissingAmount)?;
        let date = self.date.ok_or(RecordIssue::MissingDate)?;
        if !sign_agrees(self.kind, amount) {
            return Err(RecordIssue::SignMismatch {
                kind: self.kind,
                amount,
            });
        }
        Ok((amount, date))
    }
}
