//! Currency and money formatting.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` end to end; this module only turns
//! them into display strings, always through the same rule.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Non-breaking space used by French number formatting.
const NBSP: char = '\u{a0}';

/// ISO 4217 currency codes supported by reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Canadian Dollar
    #[default]
    Cad,
    /// US Dollar
    Usd,
    /// Euro
    Eur,
}

impl Currency {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Cad | Self::Usd => "$",
            Self::Eur => "€",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cad => write!(f, "CAD"),
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CAD" => Ok(Self::Cad),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

/// Number formatting conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    /// `1 234,56 $`
    #[default]
    #[serde(rename = "fr-CA")]
    FrCa,
    /// `$1,234.56`
    #[serde(rename = "en-CA")]
    EnCa,
}

/// Formats every amount of a report with one currency and locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoneyFormatter {
    currency: Currency,
    locale: Locale,
}

impl MoneyFormatter {
    /// Creates a formatter.
    #[must_use]
    pub const fn new(currency: Currency, locale: Locale) -> Self {
        Self { currency, locale }
    }

    /// Currency used by this formatter.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Formats an amount with two decimals, grouping and currency symbol.
    #[must_use]
    pub fn format(&self, amount: Decimal) -> String {
        let (negative, digits) = self.digits(amount);
        let sign = if negative { "-" } else { "" };
        let symbol = self.currency.symbol();
        match self.locale {
            Locale::FrCa => format!("{sign}{digits}{NBSP}{symbol}"),
            Locale::EnCa => format!("{sign}{symbol}{digits}"),
        }
    }

    /// Formats a percentage with two decimals, e.g. `12,50 %`.
    #[must_use]
    pub fn format_percent(&self, value: Decimal) -> String {
        let (negative, digits) = self.digits(value);
        let sign = if negative { "-" } else { "" };
        match self.locale {
            Locale::FrCa => format!("{sign}{digits}{NBSP}%"),
            Locale::EnCa => format!("{sign}{digits}%"),
        }
    }

    /// Rounds to two decimals and returns `(is_negative, grouped digits)`.
    fn digits(&self, value: Decimal) -> (bool, String) {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let text = format!("{:.2}", rounded.abs());
        let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let (group_sep, decimal_sep) = match self.locale {
            Locale::FrCa => (NBSP, ','),
            Locale::EnCa => (',', '.'),
        };

        let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
        for (i, c) in integer.chars().enumerate() {
            if i > 0 && (integer.len() - i) % 3 == 0 {
                grouped.push(group_sep);
            }
            grouped.push(c);
        }

        (negative, format!("{grouped}{decimal_sep}{fraction}"))
    }
}
