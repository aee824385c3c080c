//! Time bucketing primitives: granularities, SQL intervals, date series.

pub mod granularity;
pub mod interval;
pub mod series;

pub use granularity::Granularity;
pub use interval::{IntervalScale, SqlInterval};
pub use series::TimeSeries;
