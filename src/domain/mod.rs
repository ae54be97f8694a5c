pub mod availability;
pub mod calendar;
pub mod error;
pub mod metrics;
pub mod navigation;

pub use availability::{AvailabilityIndex, ForecastId, ForecastRef};
pub use calendar::{
    CalendarDay, DateInterval, Timestamp, day_key_in, day_key_of, default_range, label_of,
};
pub use error::DataError;
pub use metrics::{Metric, MetricRecord, RawMetric, normalize, normalize_in};
pub use navigation::{NavEffect, NavigationState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub code: String,
    pub name: String,
}
