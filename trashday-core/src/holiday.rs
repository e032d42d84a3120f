//! Observed US holidays and the lookup of the holiday falling in a given week.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::schedule::{ScheduleError, day_index};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Holidays that shift the weekly pick-up.
pub enum HolidayKind {
    /// January 1st.
    NewYearsDay,
    /// Third Monday of January.
    MartinLutherKingJrDay,
    /// Third Monday of February.
    PresidentsDay,
    /// Last Monday of May.
    MemorialDay,
    /// July 4th.
    IndependenceDay,
    /// First Monday of September.
    LaborDay,
    /// November 11th.
    VeteransDay,
    /// Fourth Thursday of November.
    ThanksgivingDay,
    /// December 25th.
    Christmas,
}

impl HolidayKind {
    /// Every holiday in calendar order.
    pub const ALL: [HolidayKind; 9] = [
        HolidayKind::NewYearsDay,
        HolidayKind::MartinLutherKingJrDay,
        HolidayKind::PresidentsDay,
        HolidayKind::MemorialDay,
        HolidayKind::IndependenceDay,
        HolidayKind::LaborDay,
        HolidayKind::VeteransDay,
        HolidayKind::ThanksgivingDay,
        HolidayKind::Christmas,
    ];

    /// Display name shown to users.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            HolidayKind::NewYearsDay => "New Year's Day",
            HolidayKind::MartinLutherKingJrDay => "Martin Luther King, Jr. Day",
            HolidayKind::PresidentsDay => "Presidents Day",
            HolidayKind::MemorialDay => "Memorial Day",
            HolidayKind::IndependenceDay => "Independence Day",
            HolidayKind::LaborDay => "Labor Day",
            HolidayKind::VeteransDay => "Veterans Day",
            HolidayKind::ThanksgivingDay => "Thanksgiving Day",
            HolidayKind::Christmas => "Christmas",
        }
    }

    /// Date the holiday is observed on in `year`.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::NoHolidayDataForRange`] when the date is not representable.
    pub fn date_in(self, year: i32) -> Result<NaiveDate, ScheduleError> {
        match self {
            HolidayKind::NewYearsDay => fixed_date(year, 1, 1),
            HolidayKind::MartinLutherKingJrDay => nth_weekday_of_month(3, Weekday::Mon, 1, year),
            HolidayKind::PresidentsDay => nth_weekday_of_month(3, Weekday::Mon, 2, year),
            HolidayKind::MemorialDay => memorial_day(year),
            HolidayKind::IndependenceDay => fixed_date(year, 7, 4),
            HolidayKind::LaborDay => nth_weekday_of_month(1, Weekday::Mon, 9, year),
            HolidayKind::VeteransDay => fixed_date(year, 11, 11),
            HolidayKind::ThanksgivingDay => nth_weekday_of_month(4, Weekday::Thu, 11, year),
            HolidayKind::Christmas => fixed_date(year, 12, 25),
        }
    }
}

impl fmt::Display for HolidayKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A holiday observed on a specific date.
pub struct Holiday {
    /// Observed date.
    pub date: NaiveDate,
    /// Which holiday it is.
    pub kind: HolidayKind,
}

impl Holiday {
    /// Display name of the holiday.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

fn fixed_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(ScheduleError::NoHolidayDataForRange(year))
}

/// Date of the `occurrence`-th `weekday` of `month` (1-based occurrence).
///
/// A day number past the end of the month rolls over into the following month.
/// An occurrence of `0` is treated like `1`.
///
/// # Errors
///
/// Returns [`ScheduleError::NoHolidayDataForRange`] when the date is not representable.
pub fn nth_weekday_of_month(
    occurrence: u32,
    weekday: Weekday,
    month: u32,
    year: i32,
) -> Result<NaiveDate, ScheduleError> {
    let first_of_month = fixed_date(year, month, 1)?;

    let mut offset = i64::from(first_of_month.weekday().num_days_from_sunday())
        - i64::from(weekday.num_days_from_sunday());
    if offset > 0 {
        offset = 7 - offset;
    } else {
        offset = -offset;
    }

    // Day numbers are 1-based, the first of the month is day one.
    let first_occurrence = 1 + offset.unsigned_abs();
    let final_day = first_occurrence + 7 * u64::from(occurrence.saturating_sub(1));

    first_of_month
        .checked_add_days(Days::new(final_day - 1))
        .ok_or(ScheduleError::NoHolidayDataForRange(year))
}

/// Date of the last Monday of May, scanning backwards from May 31st.
///
/// # Errors
///
/// Returns [`ScheduleError::NoHolidayDataForRange`] when the date is not representable.
#[expect(
    clippy::comparison_chain,
    reason = "Monday, later weekdays and Sunday step back by different amounts"
)]
pub fn memorial_day(year: i32) -> Result<NaiveDate, ScheduleError> {
    let last_of_may = fixed_date(year, 5, 31)?;
    let weekday = last_of_may.weekday().num_days_from_sunday();

    let step_back = if weekday == 1 {
        0
    } else if weekday > 1 {
        weekday - 1
    } else {
        7 + weekday - 1
    };

    last_of_may
        .checked_sub_days(Days::new(u64::from(step_back)))
        .ok_or(ScheduleError::NoHolidayDataForRange(year))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Holidays keyed by the date they are observed on.
pub struct HolidaySet {
    holidays: BTreeMap<NaiveDate, Holiday>,
}

impl HolidaySet {
    /// Build the holidays of two consecutive years.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::NonConsecutiveYears`] when `next_year` does not follow
    /// `current_year`, or [`ScheduleError::NoHolidayDataForRange`] when a date is not
    /// representable.
    pub fn generate(current_year: i32, next_year: i32) -> Result<Self, ScheduleError> {
        if current_year.checked_add(1) != Some(next_year) {
            return Err(ScheduleError::NonConsecutiveYears {
                current: current_year,
                next: next_year,
            });
        }

        let mut holidays = BTreeMap::new();
        for year in [current_year, next_year] {
            for kind in HolidayKind::ALL {
                let date = kind.date_in(year)?;
                holidays.insert(date, Holiday { date, kind });
            }
        }

        Ok(Self { holidays })
    }

    /// Holidays of `year` and the year after.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::NoHolidayDataForRange`] when the range is not representable.
    pub fn for_year(year: i32) -> Result<Self, ScheduleError> {
        let next_year = year
            .checked_add(1)
            .ok_or(ScheduleError::NoHolidayDataForRange(year))?;
        Self::generate(year, next_year)
    }

    /// Holiday observed on `date`, if any.
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<&Holiday> {
        self.holidays.get(&date)
    }

    /// Number of holidays in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    /// Whether the set holds no holidays.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }

    /// Holidays in date order.
    pub fn iter(&self) -> impl Iterator<Item = &Holiday> {
        self.holidays.values()
    }
}

/// Build the holidays of `current_year` and `next_year`.
///
/// # Errors
///
/// See [`HolidaySet::generate`].
pub fn generate_holiday_set(
    current_year: i32,
    next_year: i32,
) -> Result<HolidaySet, ScheduleError> {
    HolidaySet::generate(current_year, next_year)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Holiday falling into the current Sunday-to-Saturday week.
pub struct WeeklyHoliday {
    /// Date of the holiday.
    pub date: NaiveDate,
    /// Weekday the holiday falls on.
    pub day: Weekday,
    /// The holiday itself.
    pub holiday: Holiday,
}

impl WeeklyHoliday {
    /// Offset of the holiday from the week's Sunday, `0..=6`.
    #[must_use]
    pub fn day_index(&self) -> u32 {
        day_index(self.day)
    }

    /// Display name of the holiday.
    #[must_use]
    pub fn holiday_name(&self) -> &'static str {
        self.holiday.name()
    }
}

/// Sunday starting the week that contains `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    let days_since_sunday = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(days_since_sunday))
}

/// First holiday, by weekday, in the Sunday-to-Saturday week containing `today`.
#[must_use]
pub fn find_weekly_holiday(today: NaiveDate, holidays: &HolidaySet) -> Option<WeeklyHoliday> {
    week_start(today)?
        .iter_days()
        .take(7)
        .find_map(|date| {
            holidays.get(date).map(|holiday| WeeklyHoliday {
                date,
                day: date.weekday(),
                holiday: holiday.clone(),
            })
        })
}
