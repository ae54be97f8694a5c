//! Accuracy metrics normalized onto a dense, day-per-record series.

use std::collections::{HashMap, hash_map::Entry};

use chrono::{Local, TimeZone};

use crate::domain::calendar::{CalendarDay, DateInterval, Timestamp, label_of};

/// One metrics row as reported by the API, before normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMetric {
    pub date: Timestamp,
    pub rmse: Option<f64>,
    pub mae: Option<f64>,
    pub mape: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub day: CalendarDay,
    pub label: String,
    pub rmse: Option<f64>,
    pub mae: Option<f64>,
    pub mape: Option<f64>,
}

impl MetricRecord {
    fn empty(day: CalendarDay) -> Self {
        Self {
            day,
            label: label_of(day),
            rmse: None,
            mae: None,
            mape: None,
        }
    }

    fn from_raw(day: CalendarDay, raw: &RawMetric) -> Self {
        Self {
            day,
            label: label_of(day),
            rmse: raw.rmse,
            mae: raw.mae,
            mape: raw.mape,
        }
    }

    #[must_use]
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Rmse => self.rmse,
            Metric::Mae => self.mae,
            Metric::Mape => self.mape,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rmse.is_none() && self.mae.is_none() && self.mape.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Rmse,
    Mae,
    Mape,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Rmse, Metric::Mae, Metric::Mape];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Metric::Rmse => "RMSE",
            Metric::Mae => "MAE",
            Metric::Mape => "MAPE",
        }
    }
}

/// Dense series over `interval` keyed by the viewer's local calendar day.
#[must_use]
pub fn normalize(records: &[RawMetric], interval: DateInterval) -> Vec<MetricRecord> {
    normalize_in(records, interval, &Local)
}

/// Same as [`normalize`] with an explicit zone for keying zoned timestamps.
///
/// Exactly one record per day of `interval`, ascending. When several raw
/// rows land on the same day the first one in input order is kept; rows
/// outside the interval are ignored.
#[must_use]
pub fn normalize_in<Tz: TimeZone>(
    records: &[RawMetric],
    interval: DateInterval,
    tz: &Tz,
) -> Vec<MetricRecord> {
    let mut by_day: HashMap<CalendarDay, &RawMetric> = HashMap::with_capacity(records.len());
    for raw in records {
        let day = raw.date.day_in(tz);
        if !interval.contains(day) {
            continue;
        }
        if let Entry::Vacant(slot) = by_day.entry(day) {
            slot.insert(raw);
        }
    }

    interval
        .days()
        .map(|day| match by_day.get(&day) {
            Some(raw) => MetricRecord::from_raw(day, raw),
            None => MetricRecord::empty(day),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeriesSummary {
    pub days: usize,
    pub days_with_data: usize,
    pub mean_rmse: Option<f64>,
    pub mean_mae: Option<f64>,
    pub mean_mape: Option<f64>,
}

impl SeriesSummary {
    #[must_use]
    pub fn of(series: &[MetricRecord]) -> Self {
        Self {
            days: series.len(),
            days_with_data: series.iter().filter(|record| !record.is_empty()).count(),
            mean_rmse: mean(series, Metric::Rmse),
            mean_mae: mean(series, Metric::Mae),
            mean_mape: mean(series, Metric::Mape),
        }
    }

    #[must_use]
    pub fn mean(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Rmse => self.mean_rmse,
            Metric::Mae => self.mean_mae,
            Metric::Mape => self.mean_mape,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(series: &[MetricRecord], metric: Metric) -> Option<f64> {
    let (sum, count) = series
        .iter()
        .filter_map(|record| record.value(metric))
        .filter(|value| value.is_finite())
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Splits one metric of a series into runs of consecutive non-null points.
///
/// X is the record's index in the series, so a chart drawing each run as
/// its own line shows missing days as breaks instead of bridging them.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn contiguous_runs(series: &[MetricRecord], metric: Metric) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (idx, record) in series.iter().enumerate() {
        match record.value(metric).filter(|value| value.is_finite()) {
            Some(value) => current.push((idx as f64, value)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}
