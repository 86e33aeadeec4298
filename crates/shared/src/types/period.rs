//! Year/month analysis periods.
//!
//! Analysis runs at month granularity: a record belongs to a period when its
//! `(year, month)` lies between the period's start and end, both inclusive.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

/// French month names used in report labels.
const MONTH_NAMES_FR: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Errors raised when building periods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// Month outside 1-12.
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    /// Text is not in `YYYY-MM` form.
    #[error("Invalid year-month format: {0}")]
    InvalidFormat(String),

    /// Start lies after end.
    #[error("Invalid period: start {start} is after end {end}")]
    Reversed {
        /// Start month.
        start: YearMonth,
        /// End month.
        end: YearMonth,
    },
}

/// A calendar month.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a year-month, validating the month number.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidMonth` when `month` is not in 1-12.
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// Month containing the given date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month number, 1-12.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// The following month.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    /// Human-readable French label, e.g. `mars 2025`.
    #[must_use]
    pub fn label(self) -> String {
        let index = usize::try_from(self.month - 1).unwrap_or(0);
        format!("{} {}", MONTH_NAMES_FR[index], self.year)
    }

    /// Number of months from `self` to `other`, negative when `other` is earlier.
    #[must_use]
    pub fn months_until(self, other: Self) -> i64 {
        let from = i64::from(self.year) * 12 + i64::from(self.month);
        let to = i64::from(other.year) * 12 + i64::from(other.month);
        to - from
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PeriodError::InvalidFormat(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

/// Closed interval of months `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct AnalysisPeriod {
    start: YearMonth,
    end: YearMonth,
}

#[derive(Deserialize)]
struct RawPeriod {
    start: YearMonth,
    end: YearMonth,
}

impl TryFrom<RawPeriod> for AnalysisPeriod {
    type Error = PeriodError;

    fn try_from(raw: RawPeriod) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl AnalysisPeriod {
    /// Creates a period.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::Reversed` when `start` is after `end`.
    pub fn new(start: YearMonth, end: YearMonth) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::Reversed { start, end });
        }
        Ok(Self { start, end })
    }

    /// Period covering a single month.
    #[must_use]
    pub const fn single(month: YearMonth) -> Self {
        Self {
            start: month,
            end: month,
        }
    }

    /// First month.
    #[must_use]
    pub const fn start(&self) -> YearMonth {
        self.start
    }

    /// Last month.
    #[must_use]
    pub const fn end(&self) -> YearMonth {
        self.end
    }

    /// Returns true if the month lies within the period.
    #[must_use]
    pub fn contains_month(&self, month: YearMonth) -> bool {
        month >= self.start && month <= self.end
    }

    /// Returns true if the date's month lies within the period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.contains_month(YearMonth::from_date(date))
    }

    /// Every month of the period, in order.
    #[must_use]
    pub fn months(&self) -> Vec<YearMonth> {
        let mut months = Vec::new();
        let mut current = self.start;
        while current <= self.end {
            months.push(current);
            current = current.next();
        }
        months
    }

    /// Number of months in the period (at least one).
    #[must_use]
    pub fn month_count(&self) -> u32 {
        u32::try_from(self.start.months_until(self.end) + 1).unwrap_or(u32::MAX)
    }

    /// First calendar day of the period.
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start.first_day()
    }

    /// Last calendar day of the period.
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        self.end.last_day()
    }

    /// Human-readable label, e.g. `janvier 2025 à mars 2025`.
    #[must_use]
    pub fn label(&self) -> String {
        if self.start == self.end {
            self.start.label()
        } else {
            format!("{} à {}", self.start.label(), self.end.label())
        }
    }
}
