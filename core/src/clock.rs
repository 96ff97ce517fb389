//! Studio calendar: pure date arithmetic and boundary detection.
//!
//! A week advance adds exactly 7 calendar days. A month advance adds one
//! calendar month with ROLLOVER semantics: when the source day does not
//! exist in the target month, the excess days spill into the following
//! month (Jan 31 + 1 month = Mar 3 in a 28-day February, Mar 2 in a leap
//! year). Nothing is clamped to the end of the month.
//!
//! Month boundaries are detected with a dual check (calendar month changed
//! OR week counter lands on the first week of a nominal month). Fixed 7-day
//! steps drift against calendar months, and saved games depend on this
//! exact rule, so both conditions are kept.

use crate::{error::StudioError, types::Week};
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    Week,
    Month,
}

impl TimePeriod {
    /// Weeks added to the game week counter for one step of this period.
    pub fn weeks(&self, weeks_per_month: u32) -> Week {
        match self {
            Self::Week  => 1,
            Self::Month => weeks_per_month as Week,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week  => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimePeriod {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week"  => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other   => Err(StudioError::InvalidPeriod(other.to_string())),
        }
    }
}

/// Add exactly seven days. Saturates at the calendar maximum.
pub fn advance_by_week(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(7)).unwrap_or(NaiveDate::MAX)
}

/// Add one calendar month, rolling overflow days into the next month.
pub fn advance_by_month(date: NaiveDate) -> NaiveDate {
    let overflow_days = u64::from(date.day() - 1);
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|first_of_next| first_of_next.checked_add_days(Days::new(overflow_days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Did this step cross a month boundary?
///
/// `week_after` is the game week counter after the step.
pub fn month_boundary_crossed(
    before: NaiveDate,
    after: NaiveDate,
    week_after: Week,
    weeks_per_month: u32,
) -> bool {
    let month_changed = before.month() != after.month() || before.year() != after.year();
    let nominal_month_start =
        weeks_per_month > 0 && week_after % Week::from(weeks_per_month) == 1;
    month_changed || nominal_month_start
}

pub fn year_boundary_crossed(before: NaiveDate, after: NaiveDate) -> bool {
    before.year() != after.year()
}

/// Fixed epoch for elapsed-time stats: Jan 1 of the start year.
pub fn epoch(start_year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(start_year, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Years elapsed since Jan 1 of `start_year`, in 365.25-day years.
pub fn years_since_epoch(date: NaiveDate, start_year: i32) -> f64 {
    (date - epoch(start_year)).num_days() as f64 / 365.25
}

/// The outcome of moving the calendar one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockStep {
    pub period:       TimePeriod,
    pub date_before:  NaiveDate,
    pub date_after:   NaiveDate,
    pub week_after:   Week,
    pub month_crossed: bool,
    pub year_crossed:  bool,
}

/// Compute where the calendar lands after one step of `period`.
pub fn step(
    date: NaiveDate,
    week: Week,
    period: TimePeriod,
    weeks_per_month: u32,
) -> ClockStep {
    let date_after = match period {
        TimePeriod::Week  => advance_by_week(date),
        TimePeriod::Month => advance_by_month(date),
    };
    let week_after = week + period.weeks(weeks_per_month);
    let month_crossed = match period {
        TimePeriod::Week  => month_boundary_crossed(date, date_after, week_after, weeks_per_month),
        TimePeriod::Month => true,
    };

    ClockStep {
        period,
        date_before: date,
        date_after,
        week_after,
        month_crossed,
        year_crossed: year_boundary_crossed(date, date_after),
    }
}
