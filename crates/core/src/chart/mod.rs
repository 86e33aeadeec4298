//! Chart-ready data derived from aggregation results.
//!
//! The shaper only computes geometry-free numbers (ratios, sweep angles,
//! axis bounds); drawing is left to whatever consumes the data.

pub mod shaper;
pub mod types;

pub use shaper::{AxisScale, ChartShaper};
pub use types::{Bar, BarSegment, ChartData, ChartKind, MonthlyBar, PieSlice};
