use std::{
    collections::{HashMap, hash_map::Entry},
    fmt,
};

use chrono::{Local, TimeZone};

use crate::domain::calendar::{CalendarDay, Timestamp};

/// Opaque forecast identifier; the join key for sizes and images.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ForecastId(String);

impl ForecastId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ForecastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRef {
    pub id: ForecastId,
    pub start_date: Timestamp,
    pub model_code: String,
}

/// Day-keyed lookup over the forecasts of one model.
///
/// Calendar cells ask [`AvailabilityIndex::is_available`] to decide whether
/// they are selectable and [`AvailabilityIndex::resolve`] to turn a picked
/// day back into its forecast. When two forecasts start on the same day the
/// first one in payload order is the one the day resolves to.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    items: Vec<ForecastRef>,
    by_day: HashMap<CalendarDay, usize>,
}

impl AvailabilityIndex {
    #[must_use]
    pub fn build(items: Vec<ForecastRef>) -> Self {
        Self::build_in(items, &Local)
    }

    #[must_use]
    pub fn build_in<Tz: TimeZone>(items: Vec<ForecastRef>, tz: &Tz) -> Self {
        let mut by_day = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if let Entry::Vacant(slot) = by_day.entry(item.start_date.day_in(tz)) {
                slot.insert(idx);
            }
        }
        Self { items, by_day }
    }

    #[must_use]
    pub fn is_available(&self, day: CalendarDay) -> bool {
        self.by_day.contains_key(&day)
    }

    #[must_use]
    pub fn resolve(&self, day: CalendarDay) -> Option<&ForecastRef> {
        self.by_day.get(&day).and_then(|idx| self.items.get(*idx))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First forecast in payload order, the one selected after a model loads.
    #[must_use]
    pub fn first(&self) -> Option<&ForecastRef> {
        self.items.first()
    }

    #[must_use]
    pub fn available_days(&self) -> Vec<CalendarDay> {
        let mut days = self.by_day.keys().copied().collect::<Vec<_>>();
        days.sort_unstable();
        days
    }

    #[must_use]
    pub fn next_available(&self, after: CalendarDay) -> Option<CalendarDay> {
        self.by_day.keys().copied().filter(|day| *day > after).min()
    }

    #[must_use]
    pub fn previous_available(&self, before: CalendarDay) -> Option<CalendarDay> {
        self.by_day.keys().copied().filter(|day| *day < before).max()
    }

    #[must_use]
    pub fn days_in_month(&self, year: i32, month: u32) -> Vec<CalendarDay> {
        let mut days = self
            .by_day
            .keys()
            .copied()
            .filter(|day| day.year() == year && day.month() == month)
            .collect::<Vec<_>>();
        days.sort_unstable();
        days
    }

    #[must_use]
    pub fn latest(&self) -> Option<CalendarDay> {
        self.by_day.keys().copied().max()
    }
}
