//! Configuration utilities for testing.

use crate::config::JobConfig;
use crate::model::{CalendarPoint, DateSpan, Locator, UserConfigUnit};

/// Builder for creating test job configurations.
#[derive(Debug)]
pub struct JobConfigBuilder {
    config: JobConfig,
}

impl JobConfigBuilder {
    fn with_provider(provider: &str, city: &str) -> Self {
        Self {
            config: JobConfig {
                provider: provider.to_string(),
                city: city.to_string(),
                from: "01/2021".to_string(),
                to: "03/2021".to_string(),
                mode: "range".to_string(),
                ..Default::default()
            },
        }
    }

    pub fn meteociel() -> Self {
        Self::with_provider("meteociel", "Bordeaux")
            .code_num("2")
            .code("7510")
    }

    pub fn ogimet() -> Self {
        Self::with_provider("ogimet", "Paris").ind("07149")
    }

    pub fn wunderground() -> Self {
        Self::with_provider("wunderground", "New York City")
            .country_code("us")
            .region("KLGA")
    }

    pub fn provider(mut self, provider: &str) -> Self {
        self.config.provider = provider.to_string();
        self
    }

    pub fn city(mut self, city: &str) -> Self {
        self.config.city = city.to_string();
        self
    }

    pub fn code_num(mut self, code_num: &str) -> Self {
        self.config.code_num = Some(code_num.to_string());
        self
    }

    pub fn code(mut self, code: &str) -> Self {
        self.config.code = Some(code.to_string());
        self
    }

    pub fn ind(mut self, ind: &str) -> Self {
        self.config.ind = Some(ind.to_string());
        self
    }

    pub fn country_code(mut self, country_code: &str) -> Self {
        self.config.country_code = Some(country_code.to_string());
        self
    }

    pub fn region(mut self, region: &str) -> Self {
        self.config.region = Some(region.to_string());
        self
    }

    pub fn from(mut self, from: &str) -> Self {
        self.config.from = from.to_string();
        self
    }

    pub fn to(mut self, to: &str) -> Self {
        self.config.to = to.to_string();
        self
    }

    pub fn mode(mut self, mode: &str) -> Self {
        self.config.mode = mode.to_string();
        self
    }

    pub fn build(self) -> JobConfig {
        self.config
    }
}

/// Ogimet unit over a month range, given as `(year, month)` pairs.
pub fn ogimet_monthly_unit(start: (i32, u32), end: (i32, u32)) -> UserConfigUnit {
    UserConfigUnit::new(
        "Paris",
        Locator::Ogimet {
            ind: "07149".to_string(),
        },
        DateSpan::Range {
            start: CalendarPoint::month(start.0, start.1).unwrap(),
            end: CalendarPoint::month(end.0, end.1).unwrap(),
        },
    )
}

/// Meteociel hourly unit over a day range, given as `(year, month, day)`.
pub fn meteociel_hourly_unit(start: (i32, u32, u32), end: (i32, u32, u32)) -> UserConfigUnit {
    UserConfigUnit::new(
        "Bordeaux",
        Locator::Meteociel {
            code_num: "2".to_string(),
            code: "7510".to_string(),
        },
        DateSpan::Range {
            start: CalendarPoint::day(start.0, start.1, start.2).unwrap(),
            end: CalendarPoint::day(end.0, end.1, end.2).unwrap(),
        },
    )
}
