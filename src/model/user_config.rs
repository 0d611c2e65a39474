//! Validated user request templates.
//!
//! A [`UserConfigUnit`] is produced by the configuration layer after
//! validation and is trusted as-is by task generation.

use super::calendar::CalendarPoint;
use super::types::{Granularity, Provider, Source};
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// Provider-specific location identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Meteociel { code_num: String, code: String },
    Ogimet { ind: String },
    Wunderground { country_code: String, region: String },
}

impl Locator {
    pub fn provider(&self) -> Provider {
        match self {
            Locator::Meteociel { .. } => Provider::Meteociel,
            Locator::Ogimet { .. } => Provider::Ogimet,
            Locator::Wunderground { .. } => Provider::Wunderground,
        }
    }
}

/// The calendar span a request covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateSpan {
    /// Closed interval walked linearly from `start` to `end`.
    Range {
        start: CalendarPoint,
        end: CalendarPoint,
    },
    /// Year × month × day cross-product. Days beyond a month's length are
    /// skipped during generation.
    Grid {
        years: RangeInclusive<i32>,
        months: RangeInclusive<u32>,
        days: RangeInclusive<u32>,
    },
}

impl DateSpan {
    pub fn granularity(&self) -> Granularity {
        match self {
            DateSpan::Range { start, .. } if start.day_number().is_none() => Granularity::Daily,
            _ => Granularity::Hourly,
        }
    }
}

/// One provider-family job template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserConfigUnit {
    city: String,
    locator: Locator,
    span: DateSpan,
    source: Source,
}

impl UserConfigUnit {
    /// The source is resolved from the locator's provider and the span's
    /// granularity.
    pub fn new(city: impl Into<String>, locator: Locator, span: DateSpan) -> Self {
        let source = Source::new(locator.provider(), span.granularity());
        Self {
            city: city.into(),
            locator,
            span,
            source,
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn span(&self) -> &DateSpan {
        &self.span
    }

    pub fn source(&self) -> Source {
        self.source
    }
}

/// Collapses duplicate units, keeping the first occurrence.
pub fn dedup_units(units: Vec<UserConfigUnit>) -> Vec<UserConfigUnit> {
    let mut seen = HashSet::new();
    units
        .into_iter()
        .filter(|unit| seen.insert(unit.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ogimet_range(start: CalendarPoint, end: CalendarPoint) -> UserConfigUnit {
        UserConfigUnit::new(
            "Paris",
            Locator::Ogimet {
                ind: "07149".to_string(),
            },
            DateSpan::Range { start, end },
        )
    }

    #[test]
    fn test_source_inferred_from_day_component() {
        let monthly = ogimet_range(
            CalendarPoint::month(2021, 1).unwrap(),
            CalendarPoint::month(2021, 3).unwrap(),
        );
        assert_eq!(monthly.source(), Source::OgimetDaily);

        let daily = ogimet_range(
            CalendarPoint::day(2021, 1, 1).unwrap(),
            CalendarPoint::day(2021, 1, 3).unwrap(),
        );
        assert_eq!(daily.source(), Source::OgimetHourly);
    }

    #[test]
    fn test_grid_is_hourly() {
        let unit = UserConfigUnit::new(
            "Lyon",
            Locator::Meteociel {
                code_num: "2".to_string(),
                code: "7481".to_string(),
            },
            DateSpan::Grid {
                years: 2021..=2021,
                months: 4..=5,
                days: 30..=31,
            },
        );
        assert_eq!(unit.source(), Source::MeteocielHourly);
    }

    #[test]
    fn test_dedup_units_keeps_first_occurrence() {
        let a = ogimet_range(
            CalendarPoint::month(2021, 1).unwrap(),
            CalendarPoint::month(2021, 2).unwrap(),
        );
        let b = ogimet_range(
            CalendarPoint::month(2022, 1).unwrap(),
            CalendarPoint::month(2022, 2).unwrap(),
        );
        let units = dedup_units(vec![a.clone(), b.clone(), a.clone()]);
        assert_eq!(units, vec![a, b]);
    }
}
