//! Expansion of a validated request into a lazy stream of tasks.
//!
//! Streams are finite and consume-once. Nothing is materialized up front, so
//! long ranges cost one calendar point at a time.

use super::params::TaskParameters;
use crate::error::BuildError;
use crate::model::{days_in_month, CalendarPoint, DateSpan, Locator, Source, UserConfigUnit};
use std::ops::RangeInclusive;

/// Ordered, lazy sequence of tasks for one request.
pub type TaskStream = Box<dyn Iterator<Item = Result<TaskParameters, BuildError>> + Send>;

/// Expands `unit` into its task stream, applying the rollover rules of its
/// source.
pub fn generate_tasks(unit: &UserConfigUnit) -> TaskStream {
    let template = unit.clone();
    match (unit.source(), unit.span().clone()) {
        (Source::OgimetHourly, DateSpan::Range { start, end }) => Box::new(
            OgimetWindows::new(start, end).map(move |w| {
                build_task(&template, w.year, w.month, Some(w.day), Some(w.ndays))
            }),
        ),
        (Source::OgimetHourly, DateSpan::Grid { years, months, days }) => Box::new(
            day_grid(years, months, days)
                .map(move |(y, m, d)| build_task(&template, y, m, Some(d), Some(1))),
        ),
        (_, DateSpan::Range { start, end }) if start.day_number().is_some() => Box::new(
            CalendarWalk::days(start, end).map(move |p| {
                build_task(&template, p.year(), p.month_number(), p.day_number(), None)
            }),
        ),
        (_, DateSpan::Range { start, end }) => Box::new(
            CalendarWalk::months(start, end)
                .map(move |p| build_task(&template, p.year(), p.month_number(), None, None)),
        ),
        (_, DateSpan::Grid { years, months, days }) => Box::new(
            day_grid(years, months, days)
                .map(move |(y, m, d)| build_task(&template, y, m, Some(d), None)),
        ),
    }
}

fn build_task(
    unit: &UserConfigUnit,
    year: i32,
    month: u32,
    day: Option<u32>,
    ndays: Option<u32>,
) -> Result<TaskParameters, BuildError> {
    let mut builder = TaskParameters::builder(unit.source())
        .city(unit.city())
        .year(year)
        .month(month);
    if let Some(d) = day {
        builder = builder.day(d);
    }
    if let Some(n) = ndays {
        builder = builder.ndays(n);
    }
    builder = match unit.locator() {
        Locator::Meteociel { code_num, code } => builder.code_num(code_num).code(code),
        Locator::Ogimet { ind } => builder.ind(ind),
        Locator::Wunderground {
            country_code,
            region,
        } => builder.country_code(country_code).region(region),
    };
    builder.build()
}

/// Do-while walk over the calendar, one month or one day at a time.
///
/// Emits the current point, then stops once its label equals the end's
/// label. A start past the end yields only the start.
pub struct CalendarWalk {
    current: Option<CalendarPoint>,
    end: CalendarPoint,
    step: fn(&CalendarPoint) -> CalendarPoint,
}

impl CalendarWalk {
    pub fn months(start: CalendarPoint, end: CalendarPoint) -> Self {
        Self {
            current: Some(start.as_month()),
            end: end.as_month(),
            step: CalendarPoint::succ_month,
        }
    }

    pub fn days(start: CalendarPoint, end: CalendarPoint) -> Self {
        Self {
            current: Some(start),
            end,
            step: CalendarPoint::succ_day,
        }
    }
}

impl Iterator for CalendarWalk {
    type Item = CalendarPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        let next = (self.step)(&current);
        // `next > end` catches an end that the fixed month table never
        // reaches, such as February 29th
        self.current = if current.label() == self.end.label() || next > self.end {
            None
        } else {
            Some(next)
        };
        Some(current)
    }
}

/// Year × month × day product; days past the month's length are skipped.
pub fn day_grid(
    years: RangeInclusive<i32>,
    months: RangeInclusive<u32>,
    days: RangeInclusive<u32>,
) -> impl Iterator<Item = (i32, u32, u32)> + Send {
    years.flat_map(move |year| {
        let days = days.clone();
        months.clone().flat_map(move |month| {
            days.clone()
                .filter(move |&day| day <= days_in_month(month))
                .map(move |day| (year, month, day))
        })
    })
}

/// An Ogimet hourly request: `ndays` days of reports ending on `day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub ndays: u32,
}

/// One window per month of the range, narrowed to the range's first and last
/// day.
///
/// Ogimet returns nothing for a window that contains January 1st, so such
/// windows start on January 2nd instead and a single-day window for each
/// skipped January 1st is emitted once the months are exhausted.
pub struct OgimetWindows {
    months: CalendarWalk,
    start: CalendarPoint,
    end: CalendarPoint,
    single_day: bool,
    skipped_new_years: Vec<i32>,
    trailing: Option<std::vec::IntoIter<i32>>,
}

impl OgimetWindows {
    pub fn new(start: CalendarPoint, end: CalendarPoint) -> Self {
        Self {
            months: CalendarWalk::months(start, end),
            start,
            end,
            single_day: start == end,
            skipped_new_years: Vec::new(),
            trailing: None,
        }
    }

    fn window_for(&mut self, month: CalendarPoint) -> Option<Window> {
        let first = if month == self.start.as_month() {
            self.start.day_number().unwrap_or(1)
        } else {
            1
        };
        let last = if month == self.end.as_month() {
            self.end
                .day_number()
                .unwrap_or_else(|| days_in_month(month.month_number()))
        } else {
            days_in_month(month.month_number())
        };

        let first = if !self.single_day && month.month_number() == 1 && first == 1 {
            self.skipped_new_years.push(month.year());
            2
        } else {
            first
        };

        if first > last {
            return None;
        }
        Some(Window {
            year: month.year(),
            month: month.month_number(),
            day: last,
            ndays: last - first + 1,
        })
    }
}

impl Iterator for OgimetWindows {
    type Item = Window;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(month) = self.months.next() {
            if let Some(window) = self.window_for(month) {
                return Some(window);
            }
        }

        let trailing = self
            .trailing
            .get_or_insert_with(|| std::mem::take(&mut self.skipped_new_years).into_iter());
        trailing.next().map(|year| Window {
            year,
            month: 1,
            day: 1,
            ndays: 1,
        })
    }
}
