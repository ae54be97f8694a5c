//! Calendar-day keys shared by the metrics chart and the forecast calendar.
//!
//! Every lookup in the dashboard is keyed by a local calendar day, never by
//! an instant: two timestamps on the same local day collapse to one key even
//! when their time-of-day differs.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, FixedOffset, Local, Months, NaiveDate, NaiveDateTime, TimeZone};

use crate::domain::error::DataError;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

const ZONED_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];
const FLOATING_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    #[must_use]
    pub fn date(self) -> NaiveDate {
        self.0
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    #[must_use]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// `YYYY-MM-DD`, the form the metrics endpoint expects in its query.
    #[must_use]
    pub fn iso(self) -> String {
        self.0.format(DATE_FORMAT).to_string()
    }

    #[must_use]
    pub fn offset_days(self, days: i64) -> Option<Self> {
        self.0
            .checked_add_signed(chrono::Duration::days(days))
            .map(Self)
    }

    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for CalendarDay {
    type Err = DataError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
            .map(Self)
            .map_err(|_| DataError::MalformedTimestamp {
                value: value.to_string(),
            })
    }
}

/// A timestamp as delivered by the forecast API.
///
/// Strings carrying an offset (or `Z`) are pinned to an instant and get
/// converted into the viewer's zone before keying. Strings without one are
/// already wall-clock fields and key by their own date in every zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Zoned(DateTime<FixedOffset>),
    Floating(NaiveDateTime),
}

impl Timestamp {
    pub fn parse(value: &str) -> Result<Self, DataError> {
        let trimmed = value.trim();
        let malformed = || DataError::MalformedTimestamp {
            value: value.to_string(),
        };
        if trimmed.is_empty() {
            return Err(malformed());
        }

        if let Some(utc) = trimmed
            .strip_suffix('Z')
            .or_else(|| trimmed.strip_suffix('z'))
        {
            return parse_floating(utc)
                .map(|naive| Self::Zoned(naive.and_utc().fixed_offset()))
                .ok_or_else(malformed);
        }

        if let Ok(zoned) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self::Zoned(zoned));
        }
        if let Some(zoned) = ZONED_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(trimmed, fmt).ok())
        {
            return Ok(Self::Zoned(zoned));
        }

        parse_floating(trimmed)
            .map(Self::Floating)
            .ok_or_else(malformed)
    }

    #[must_use]
    pub fn day_in<Tz: TimeZone>(&self, tz: &Tz) -> CalendarDay {
        match self {
            Self::Zoned(instant) => CalendarDay(instant.with_timezone(tz).date_naive()),
            Self::Floating(naive) => CalendarDay(naive.date()),
        }
    }
}

impl FromStr for Timestamp {
    type Err = DataError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(value: DateTime<Tz>) -> Self {
        Self::Zoned(value.fixed_offset())
    }
}

fn parse_floating(value: &str) -> Option<NaiveDateTime> {
    FLOATING_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Calendar day of `timestamp` in the viewer's local zone.
#[must_use]
pub fn day_key_of(timestamp: &Timestamp) -> CalendarDay {
    timestamp.day_in(&Local)
}

#[must_use]
pub fn day_key_in<Tz: TimeZone>(timestamp: &Timestamp, tz: &Tz) -> CalendarDay {
    timestamp.day_in(tz)
}

/// Chart axis label: two-digit day and uppercase month, e.g. `03 JAN`.
#[must_use]
pub fn label_of(day: CalendarDay) -> String {
    let month = MONTH_ABBREVIATIONS[day.0.month0() as usize];
    format!("{:02} {month}", day.0.day())
}

#[must_use]
pub fn days_between(from: CalendarDay, to: CalendarDay) -> i64 {
    to.0.signed_duration_since(from.0).num_days()
}

/// Closed interval of calendar days, `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateInterval {
    from: CalendarDay,
    to: CalendarDay,
}

impl DateInterval {
    pub fn new(from: CalendarDay, to: CalendarDay) -> Result<Self, DataError> {
        if from > to {
            return Err(DataError::InvertedInterval { from, to });
        }
        Ok(Self { from, to })
    }

    #[must_use]
    pub fn single(day: CalendarDay) -> Self {
        Self { from: day, to: day }
    }

    #[must_use]
    pub fn from(&self) -> CalendarDay {
        self.from
    }

    #[must_use]
    pub fn to(&self) -> CalendarDay {
        self.to
    }

    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(days_between(self.from, self.to)).unwrap_or(0) + 1
    }

    #[must_use]
    pub fn contains(&self, day: CalendarDay) -> bool {
        self.from <= day && day <= self.to
    }

    pub fn days(self) -> impl Iterator<Item = CalendarDay> {
        let to = self.to.0;
        self.from
            .0
            .iter_days()
            .take_while(move |date| *date <= to)
            .map(CalendarDay)
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.from, self.to)
    }
}

/// Trailing one-month window ending on the local day of `now`.
///
/// The start keeps the day-of-month and steps back one month; when that
/// day does not exist in the previous month it clamps to the month's last
/// day (Mar 31 -> Feb 29 in a leap year).
#[must_use]
pub fn default_range<Tz: TimeZone>(now: &DateTime<Tz>) -> DateInterval {
    let to = CalendarDay(now.date_naive());
    let from = to
        .0
        .checked_sub_months(Months::new(1))
        .map_or(to, CalendarDay);
    DateInterval { from, to }
}

#[must_use]
pub fn default_range_now() -> DateInterval {
    default_range(&Local::now())
}

/// Month grid rows (Monday first) for a calendar view of `year`/`month`.
#[must_use]
pub fn month_grid(year: i32, month: u32) -> Vec<[Option<CalendarDay>; 7]> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let lead = first.weekday().num_days_from_monday() as usize;

    let mut rows = Vec::new();
    let mut row = [None; 7];
    let mut col = lead;
    for date in first.iter_days().take_while(|date| date.month() == month) {
        row[col] = Some(CalendarDay(date));
        col += 1;
        if col == 7 {
            rows.push(row);
            row = [None; 7];
            col = 0;
        }
    }
    if col > 0 {
        rows.push(row);
    }
    rows
}
