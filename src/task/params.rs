//! Atomic scrape jobs and their validating builder.

use super::url::{PageQuery, UrlBuilder};
use crate::error::BuildError;
use crate::model::calendar::MIN_YEAR;
use crate::model::{days_in_month, two_digits, Granularity, Provider, Source};
use std::time::Duration;

/// Selects the data table among all tables of a page: the first whose
/// `attribute` equals `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCriterion {
    pub attribute: &'static str,
    pub value: &'static str,
}

impl Source {
    /// Fixed table-selection criterion of each source's page layout.
    pub fn table_criterion(&self) -> TableCriterion {
        let (attribute, value) = match self {
            Source::MeteocielDaily => ("cellpadding", "2"),
            Source::MeteocielHourly => ("bgcolor", "#EBFAF7"),
            Source::OgimetDaily | Source::OgimetHourly => ("bgcolor", "#d0d0d0"),
            Source::WundergroundDaily => ("class", "days ng-star-inserted"),
            Source::WundergroundHourly => {
                ("class", "mat-table cdk-table mat-sort ng-star-inserted")
            }
        };
        TableCriterion { attribute, value }
    }

    /// Seconds to let client-side scripts settle before reading the page.
    pub fn default_wait(&self) -> u64 {
        match self.provider() {
            Provider::Meteociel | Provider::Ogimet => 1,
            Provider::Wunderground => 5,
        }
    }
}

/// One atomic fetch job covering a single period.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskParameters {
    source: Source,
    url: String,
    criterion: TableCriterion,
    year: i32,
    month: u32,
    day: Option<u32>,
    ndays: Option<u32>,
    wait: u64,
    key: String,
}

impl TaskParameters {
    pub fn builder(source: Source) -> TaskParametersBuilder {
        TaskParametersBuilder::new(source)
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn criterion(&self) -> &TableCriterion {
        &self.criterion
    }

    /// Stable `city_year_month[_day]` key correlating results and errors.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    /// Window length of an Ogimet hourly task, in days.
    pub fn ndays(&self) -> Option<u32> {
        self.ndays
    }

    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait)
    }

    /// Doubles the wait hint; used between fetch attempts.
    pub fn double_wait(&mut self) {
        self.wait = self.wait.saturating_mul(2);
    }
}

/// Fluent validating builder for [`TaskParameters`].
///
/// Provider identifiers that the target source does not use are rejected, so
/// a successful `build()` never carries stray fields.
#[derive(Debug, Clone)]
pub struct TaskParametersBuilder {
    source: Source,
    city: Option<String>,
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    ndays: Option<u32>,
    code_num: Option<String>,
    code: Option<String>,
    ind: Option<String>,
    country_code: Option<String>,
    region: Option<String>,
    wait: Option<u64>,
    base_url: Option<String>,
}

impl TaskParametersBuilder {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            city: None,
            year: None,
            month: None,
            day: None,
            ndays: None,
            code_num: None,
            code: None,
            ind: None,
            country_code: None,
            region: None,
            wait: None,
            base_url: None,
        }
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }

    pub fn ndays(mut self, ndays: u32) -> Self {
        self.ndays = Some(ndays);
        self
    }

    pub fn code_num(mut self, code_num: impl Into<String>) -> Self {
        self.code_num = Some(code_num.into());
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn ind(mut self, ind: impl Into<String>) -> Self {
        self.ind = Some(ind.into());
        self
    }

    pub fn country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Overrides the source's default wait hint, in seconds.
    #[cfg(test)]
    pub fn wait(mut self, seconds: u64) -> Self {
        self.wait = Some(seconds);
        self
    }

    /// Replaces the provider's scheme and host in the resolved URL.
    #[cfg(test)]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn build(self) -> Result<TaskParameters, BuildError> {
        let source = self.source;
        let year = self.year.ok_or_else(|| BuildError::missing("year"))?;
        let month = self.month.ok_or_else(|| BuildError::missing("month"))?;
        if year < MIN_YEAR {
            return Err(BuildError::invalid(
                "year",
                format!("{} is before {}", year, MIN_YEAR),
            ));
        }
        if !(1..=12).contains(&month) {
            return Err(BuildError::invalid("month", format!("{} is not in 1..=12", month)));
        }

        let day = match (source.granularity(), self.day) {
            (Granularity::Hourly, None) => return Err(BuildError::missing("day")),
            (Granularity::Daily, Some(_)) => return Err(BuildError::unexpected("day", source)),
            (_, day) => day,
        };
        if let Some(d) = day {
            if !(1..=31).contains(&d) {
                return Err(BuildError::invalid("day", format!("{} is not in 1..=31", d)));
            }
        }

        let ndays = match (source, self.ndays) {
            (Source::OgimetHourly, Some(0)) => {
                return Err(BuildError::invalid("ndays", "must be at least 1"))
            }
            (Source::OgimetHourly, n) => Some(n.unwrap_or(1)),
            (_, Some(_)) => return Err(BuildError::unexpected("ndays", source)),
            (_, None) => None,
        };

        let city = required("city", self.city)?;
        let identifiers = Identifiers {
            code_num: self.code_num,
            code: self.code,
            ind: self.ind,
            country_code: self.country_code,
            region: self.region,
        };
        let identifiers = identifiers.check(source.provider(), source)?;

        let base = self.base_url.as_deref();
        let url = match source {
            Source::MeteocielDaily => UrlBuilder::build(
                PageQuery::MeteocielDaily {
                    code_num: identifiers.first(),
                    code: identifiers.second(),
                    year,
                    month,
                },
                base,
            ),
            Source::MeteocielHourly => UrlBuilder::build(
                PageQuery::MeteocielHourly {
                    code_num: identifiers.first(),
                    code: identifiers.second(),
                    year,
                    month,
                    day: day.unwrap_or(1),
                },
                base,
            ),
            Source::OgimetDaily => UrlBuilder::build(
                PageQuery::OgimetDaily {
                    ind: identifiers.first(),
                    year,
                    month,
                    ndays: days_in_month(month),
                },
                base,
            ),
            Source::OgimetHourly => UrlBuilder::build(
                PageQuery::OgimetHourly {
                    ind: identifiers.first(),
                    year,
                    month,
                    day: day.unwrap_or(1),
                    ndays: ndays.unwrap_or(1),
                },
                base,
            ),
            Source::WundergroundDaily => UrlBuilder::build(
                PageQuery::WundergroundDaily {
                    country_code: identifiers.first(),
                    city: &city,
                    region: identifiers.second(),
                    year,
                    month,
                },
                base,
            ),
            Source::WundergroundHourly => UrlBuilder::build(
                PageQuery::WundergroundHourly {
                    country_code: identifiers.first(),
                    city: &city,
                    region: identifiers.second(),
                    year,
                    month,
                    day: day.unwrap_or(1),
                },
                base,
            ),
        };

        let key = match day {
            Some(d) => format!("{}_{}_{}_{}", city, year, two_digits(month), two_digits(d)),
            None => format!("{}_{}_{}", city, year, two_digits(month)),
        };

        Ok(TaskParameters {
            source,
            url,
            criterion: source.table_criterion(),
            year,
            month,
            day,
            ndays,
            wait: self.wait.unwrap_or_else(|| source.default_wait()),
            key,
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, BuildError> {
    match value {
        None => Err(BuildError::missing(field)),
        Some(v) if v.trim().is_empty() => Err(BuildError::invalid(field, "must not be empty")),
        Some(v) => Ok(v),
    }
}

struct Identifiers {
    code_num: Option<String>,
    code: Option<String>,
    ind: Option<String>,
    country_code: Option<String>,
    region: Option<String>,
}

/// The one or two identifiers a provider needs, in URL order.
struct CheckedIdentifiers(String, Option<String>);

impl CheckedIdentifiers {
    fn first(&self) -> &str {
        &self.0
    }

    fn second(&self) -> &str {
        self.1.as_deref().unwrap_or_default()
    }
}

impl Identifiers {
    fn check(self, provider: Provider, source: Source) -> Result<CheckedIdentifiers, BuildError> {
        let unexpected = |field: &str, present: bool| -> Result<(), BuildError> {
            if present {
                Err(BuildError::unexpected(field, source))
            } else {
                Ok(())
            }
        };

        match provider {
            Provider::Meteociel => {
                unexpected("ind", self.ind.is_some())?;
                unexpected("country_code", self.country_code.is_some())?;
                unexpected("region", self.region.is_some())?;
                Ok(CheckedIdentifiers(
                    required("code_num", self.code_num)?,
                    Some(required("code", self.code)?),
                ))
            }
            Provider::Ogimet => {
                unexpected("code_num", self.code_num.is_some())?;
                unexpected("code", self.code.is_some())?;
                unexpected("country_code", self.country_code.is_some())?;
                unexpected("region", self.region.is_some())?;
                Ok(CheckedIdentifiers(required("ind", self.ind)?, None))
            }
            Provider::Wunderground => {
                unexpected("code_num", self.code_num.is_some())?;
                unexpected("code", self.code.is_some())?;
                unexpected("ind", self.ind.is_some())?;
                Ok(CheckedIdentifiers(
                    required("country_code", self.country_code)?,
                    Some(required("region", self.region)?),
                ))
            }
        }
    }
}
