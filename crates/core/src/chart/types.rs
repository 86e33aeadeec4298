//! Chart data types.

use propledger_shared::types::YearMonth;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::shaper::AxisScale;

/// Chart to shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// One stacked bar per breakdown group.
    StackedBar,
    /// Expense categories as a pie.
    ExpensePie,
    /// Revenue categories as a pie.
    RevenuePie,
    /// Revenue, expenses and net per month.
    Monthly,
}

/// One segment of a stacked bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarSegment {
    /// Segment label.
    pub label: String,
    /// Amount.
    pub amount: Decimal,
    /// Share of the bar total, between 0 and 1.
    pub ratio: Decimal,
}

/// One stacked bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar label.
    pub label: String,
    /// Sum of the segments.
    pub total: Decimal,
    /// Segments, bottom to top.
    pub segments: Vec<BarSegment>,
}

/// One pie slice. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieSlice {
    /// Category label.
    pub label: String,
    /// Amount.
    pub amount: Decimal,
    /// Angle where the slice starts.
    pub start_angle: Decimal,
    /// Angle covered by the slice.
    pub sweep_angle: Decimal,
}

/// Revenue, expenses and net of one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBar {
    /// Month.
    pub month: YearMonth,
    /// Revenue.
    pub revenue: Decimal,
    /// Expenses, as a positive magnitude.
    pub expenses: Decimal,
    /// Net.
    pub net: Decimal,
}

/// Shaped chart data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    /// Stacked bars with their value axis.
    StackedBar {
        /// Bars.
        bars: Vec<Bar>,
        /// Value axis.
        axis: AxisScale,
    },
    /// Pie slices.
    Pie {
        /// Slices.
        slices: Vec<PieSlice>,
        /// Sum of slice amounts.
        total: Decimal,
    },
    /// Monthly bars with their value axis.
    Monthly {
        /// One bar per month.
        bars: Vec<MonthlyBar>,
        /// Value axis.
        axis: AxisScale,
    },
}
