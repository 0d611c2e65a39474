//! Calendar arithmetic shared by task generation and backfill.
//!
//! The month-length table is deliberately fixed: February always has 28 days.
//! Walks over the calendar never produce February 29th, and the only place the
//! 29th can appear is an explicit boundary in a leap year.

use std::fmt;

/// Earliest year any provider is queried for.
pub const MIN_YEAR: i32 = 1800;

const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Number of days in `month` (1-based) without leap-year awareness.
///
/// Returns 0 for months outside `1..=12`.
pub fn days_in_month(month: u32) -> u32 {
    match month {
        1..=12 => DAYS_IN_MONTH[(month - 1) as usize],
        _ => 0,
    }
}

/// Zero-pads single digit numbers: `7` becomes `"07"`.
pub fn two_digits(n: u32) -> String {
    format!("{:02}", n)
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// A whole month, or a single day within a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarPoint {
    year: i32,
    month: u32,
    day: Option<u32>,
}

impl CalendarPoint {
    /// Creates a day-less point representing the whole month.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        if year < MIN_YEAR || !(1..=12).contains(&month) {
            return None;
        }
        Some(Self {
            year,
            month,
            day: None,
        })
    }

    /// Creates a single-day point. February 29th is accepted in leap years only.
    pub fn day(year: i32, month: u32, day: u32) -> Option<Self> {
        let point = Self::month(year, month)?;
        let leap_day = month == 2 && day == 29 && is_leap_year(year);
        if day == 0 || (day > days_in_month(month) && !leap_day) {
            return None;
        }
        Some(Self {
            day: Some(day),
            ..point
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month_number(&self) -> u32 {
        self.month
    }

    pub fn day_number(&self) -> Option<u32> {
        self.day
    }

    /// Drops the day component.
    pub fn as_month(&self) -> Self {
        Self { day: None, ..*self }
    }

    /// Next month, wrapping December into January of the following year.
    /// The day component is dropped.
    pub fn succ_month(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
                day: None,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
                day: None,
            }
        }
    }

    /// Next day, rolling over into the next month (and year) once the day
    /// exceeds the fixed month length. Month points become the 1st of the
    /// following month.
    pub fn succ_day(&self) -> Self {
        let next = self.day.map_or(1, |d| d + 1);
        if self.day.is_some() && next <= days_in_month(self.month) {
            Self {
                day: Some(next),
                ..*self
            }
        } else {
            Self {
                day: Some(1),
                ..self.succ_month()
            }
        }
    }

    /// `"MM/YYYY"` or `"DD/MM/YYYY"`, used to detect the end of a walk.
    pub fn label(&self) -> String {
        match self.day {
            Some(day) => format!("{}/{}/{}", two_digits(day), two_digits(self.month), self.year),
            None => format!("{}/{}", two_digits(self.month), self.year),
        }
    }
}

impl fmt::Display for CalendarPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
