//! Weekday names and the holiday adjustment of a weekly pick-up day.

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::holiday::WeeklyHoliday;

/// Weekday names in index order, Sunday first.
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Weekdays in index order, Sunday first.
pub const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Errors raised while computing holidays or adjusting a pick-up day.
pub enum ScheduleError {
    /// The provider delivered a weekday name outside of [`DAY_NAMES`].
    #[error("Unresolved base day: {0:?}")]
    UnresolvedBaseDay(String),
    /// A weekday index outside `0..=6`.
    #[error("Invalid day index: {0}")]
    InvalidDayIndex(u32),
    /// Holidays could not be computed for the year.
    #[error("No holiday data for year {0}")]
    NoHolidayDataForRange(i32),
    /// Holiday sets always span two consecutive years.
    #[error("Years {current} and {next} are not consecutive")]
    NonConsecutiveYears {
        /// First requested year.
        current: i32,
        /// Second requested year.
        next: i32,
    },
    /// A Saturday pick-up would move past the end of the week.
    #[error("Saturday pick-up cannot move past the end of the week because of {holiday}")]
    BoundaryOverflow {
        /// Holiday that caused the shift.
        holiday: String,
    },
}

/// Name of a weekday as listed in [`DAY_NAMES`].
#[must_use]
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Days from Sunday, `0..=6`.
#[must_use]
pub fn day_index(day: Weekday) -> u32 {
    day.num_days_from_sunday()
}

/// Weekday for a days-from-Sunday index.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidDayIndex`] for indices outside `0..=6`.
pub fn weekday_from_index(index: u32) -> Result<Weekday, ScheduleError> {
    WEEK.into_iter()
        .find(|day| day_index(*day) == index)
        .ok_or(ScheduleError::InvalidDayIndex(index))
}

/// Resolve a weekday name, ignoring surrounding whitespace and ASCII case.
///
/// # Errors
///
/// Returns [`ScheduleError::UnresolvedBaseDay`] when the name is not in [`DAY_NAMES`].
pub fn parse_day_name(name: &str) -> Result<Weekday, ScheduleError> {
    let trimmed = name.trim();
    WEEK.into_iter()
        .find(|day| day_name(*day).eq_ignore_ascii_case(trimmed))
        .ok_or_else(|| ScheduleError::UnresolvedBaseDay(name.to_owned()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
/// What happens to a Saturday pick-up when a holiday pushes it back a day.
pub enum OverflowPolicy {
    /// Pick up on Sunday of the following week.
    #[default]
    WrapToNextWeek,
    /// Fail with [`ScheduleError::BoundaryOverflow`].
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Pick-up day after taking this week's holiday into account.
pub struct AdjustedSchedule {
    /// Nominal pick-up day.
    pub base_day: Weekday,
    /// Day the trash is actually picked up.
    pub effective_day: Weekday,
    /// Whether the holiday moved the pick-up.
    pub is_shifted: bool,
    /// Whether the effective day lies in the following week.
    pub next_week: bool,
    /// This week's holiday, reported whether or not it moved the pick-up.
    pub holiday_name: Option<String>,
}

impl AdjustedSchedule {
    fn unchanged(base_day: Weekday, holiday_name: Option<String>) -> Self {
        Self {
            base_day,
            effective_day: base_day,
            is_shifted: false,
            next_week: false,
            holiday_name,
        }
    }

    /// Days-from-Sunday index of the effective day.
    #[must_use]
    pub fn effective_day_index(&self) -> u32 {
        day_index(self.effective_day)
    }
}

impl fmt::Display for AdjustedSchedule {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.holiday_name, self.is_shifted) {
            (None, _) => write!(
                formatter,
                "your normal trash pick-up day is {}.",
                day_name(self.base_day)
            ),
            (Some(holiday), true) if self.next_week => write!(
                formatter,
                "your holiday trash pick-up day is {} of next week due to {holiday}.",
                day_name(self.effective_day)
            ),
            (Some(holiday), true) => write!(
                formatter,
                "your holiday trash pick-up day is {} due to {holiday}.",
                day_name(self.effective_day)
            ),
            (Some(holiday), false) => write!(
                formatter,
                "your holiday trash pick-up day is {} because {holiday} is later in the week.",
                day_name(self.base_day)
            ),
        }
    }
}

/// Adjust `base_day` for this week's holiday, wrapping Saturday pick-ups into the next week.
///
/// # Errors
///
/// Never fails with the default [`OverflowPolicy`]; see [`adjust_schedule_with`].
pub fn adjust_schedule(
    base_day: Weekday,
    weekly_holiday: Option<&WeeklyHoliday>,
) -> Result<AdjustedSchedule, ScheduleError> {
    adjust_schedule_with(base_day, weekly_holiday, OverflowPolicy::default())
}

/// Adjust `base_day` for this week's holiday.
///
/// A holiday on or before the pick-up day moves the pick-up one day later. A holiday later in
/// the week leaves the day alone but is still reported.
///
/// # Errors
///
/// Returns [`ScheduleError::BoundaryOverflow`] when a Saturday pick-up would shift and the
/// policy is [`OverflowPolicy::Reject`].
pub fn adjust_schedule_with(
    base_day: Weekday,
    weekly_holiday: Option<&WeeklyHoliday>,
    policy: OverflowPolicy,
) -> Result<AdjustedSchedule, ScheduleError> {
    let Some(weekly_holiday) = weekly_holiday else {
        return Ok(AdjustedSchedule::unchanged(base_day, None));
    };

    let holiday = weekly_holiday.holiday_name().to_owned();
    if weekly_holiday.day_index() > day_index(base_day) {
        return Ok(AdjustedSchedule::unchanged(base_day, Some(holiday)));
    }

    let next_week = base_day == Weekday::Sat;
    if next_week && policy == OverflowPolicy::Reject {
        return Err(ScheduleError::BoundaryOverflow { holiday });
    }

    Ok(AdjustedSchedule {
        base_day,
        effective_day: base_day.succ(),
        is_shifted: true,
        next_week,
        holiday_name: Some(holiday),
    })
}

/// Index based variant of [`adjust_schedule`].
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidDayIndex`] when `base_day_index` is outside `0..=6`.
pub fn adjust_schedule_by_index(
    base_day_index: u32,
    weekly_holiday: Option<&WeeklyHoliday>,
) -> Result<AdjustedSchedule, ScheduleError> {
    adjust_schedule(weekday_from_index(base_day_index)?, weekly_holiday)
}
