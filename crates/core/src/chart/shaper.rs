//! Chart data shaper.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{Bar, BarSegment, ChartData, ChartKind, MonthlyBar, PieSlice};
use crate::aggregation::{AggregationResult, CategoryTotal};

/// Axis values are rounded up to a multiple of this unit.
pub const ROUNDING_UNIT: Decimal = Decimal::ONE_THOUSAND;

/// Number of axis steps used by the shaper.
pub const DEFAULT_STEPS: u32 = 5;

const FULL_TURN: Decimal = Decimal::from_parts(360, 0, 0, false, 0);

/// Value axis of a bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisScale {
    /// Distance between two ticks.
    pub step: Decimal,
    /// Top of the axis, `step × steps`.
    pub max: Decimal,
    /// Number of steps.
    pub steps: u32,
}

impl AxisScale {
    /// Axis covering `max_value` in `steps` steps.
    ///
    /// `step = ceil(max / steps / 1000) × 1000`, never below one unit.
    #[must_use]
    pub fn for_max(max_value: Decimal, steps: u32) -> Self {
        let steps = steps.max(1);
        let units = (max_value.max(Decimal::ZERO) / Decimal::from(steps) / ROUNDING_UNIT).ceil();
        let step = units.max(Decimal::ONE) * ROUNDING_UNIT;
        Self {
            step,
            max: step.saturating_mul(Decimal::from(steps)),
            steps,
        }
    }

    /// Tick values from 0 to `max`.
    #[must_use]
    pub fn ticks(&self) -> Vec<Decimal> {
        (0..=self.steps)
            .map(|i| self.step * Decimal::from(i))
            .collect()
    }
}

/// Pure shaper turning aggregation results into chart data.
pub struct ChartShaper;

impl ChartShaper {
    /// Shapes `result` for the given chart kind.
    #[must_use]
    pub fn shape(result: &AggregationResult, kind: ChartKind) -> ChartData {
        match kind {
            ChartKind::StackedBar => Self::stacked_bars(result),
            ChartKind::ExpensePie => Self::pie(&result.expense_by_category),
            ChartKind::RevenuePie => Self::pie(&result.revenue_by_category),
            ChartKind::Monthly => Self::monthly(result),
        }
    }

    fn stacked_bars(result: &AggregationResult) -> ChartData {
        let bars: Vec<Bar> = result
            .breakdown
            .iter()
            .map(|group| {
                let total = group.segment_total();
                let segments = group
                    .segments
                    .iter()
                    .map(|segment| BarSegment {
                        label: segment.label.clone(),
                        amount: segment.amount,
                        ratio: ratio(segment.amount, total),
                    })
                    .collect();
                Bar {
                    label: group.label.clone(),
                    total,
                    segments,
                }
            })
            .collect();

        let max = bars.iter().map(|b| b.total).max().unwrap_or_default();
        ChartData::StackedBar {
            bars,
            axis: AxisScale::for_max(max, DEFAULT_STEPS),
        }
    }

    fn pie(categories: &[CategoryTotal]) -> ChartData {
        let total: Decimal = categories.iter().map(|c| c.amount).sum();
        let mut start_angle = Decimal::ZERO;
        let slices = categories
            .iter()
            .map(|c| {
                let sweep_angle = (ratio(c.amount, total) * FULL_TURN).round_dp(4);
                let slice = PieSlice {
                    label: c.category.as_str().to_string(),
                    amount: c.amount,
                    start_angle,
                    sweep_angle,
                };
                start_angle += sweep_angle;
                slice
            })
            .collect();

        ChartData::Pie { slices, total }
    }

    fn monthly(result: &AggregationResult) -> ChartData {
        let bars: Vec<MonthlyBar> = result
            .by_month
            .iter()
            .map(|m| MonthlyBar {
                month: m.month,
                revenue: m.revenue,
                expenses: m.expenses,
                net: m.net,
            })
            .collect();
        let max = bars
            .iter()
            .map(|b| b.revenue.max(b.expenses))
            .max()
            .unwrap_or_default();

        ChartData::Monthly {
            bars,
            axis: AxisScale::for_max(max, DEFAULT_STEPS),
        }
    }
}

fn ratio(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        part / whole
    }
}
