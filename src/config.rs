use crate::error::ConfigError;
use crate::model::{CalendarPoint, DateSpan, Locator, Provider, UserConfigUnit};
use anyhow::{anyhow, Result};
use serde_derive::Deserialize;
use std::str::FromStr;
use std::time::Duration;

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl AppConfig {
    pub fn log_level(&self) -> tracing::Level {
        tracing::Level::from_str(self.log_level.as_str()).unwrap_or(tracing::Level::INFO)
    }
}

pub(crate) fn load_app_config() -> Result<AppConfig> {
    match envy::from_env::<AppConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load AppConfig: {}", err)),
    }
}

fn default_cpus() -> usize {
    1
}

fn default_request_timeout_sec() -> u64 {
    30
}

/// Execution knobs passed explicitly to the orchestrator.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GeneralParameters {
    #[serde(default)]
    pub parallel: bool,
    #[serde(default = "default_cpus")]
    pub cpus: usize,
    #[serde(default = "default_request_timeout_sec")]
    pub request_timeout_sec: u64,
    // render pages in headless Chromium; needs the `browser` feature
    #[serde(default)]
    pub browser: bool,
}

impl GeneralParameters {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_sec)
    }

    /// Number of in-flight scrapes in parallel mode: the configured count
    /// clamped to `1..=available_parallelism`.
    pub fn workers(&self) -> usize {
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        self.cpus.clamp(1, available.max(1))
    }
}

impl Default for GeneralParameters {
    fn default() -> Self {
        Self {
            parallel: false,
            cpus: default_cpus(),
            request_timeout_sec: default_request_timeout_sec(),
            browser: false,
        }
    }
}

pub fn load_general_parameters() -> Result<GeneralParameters> {
    match envy::prefixed("RUN_").from_env::<GeneralParameters>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load GeneralParameters: {}", err)),
    }
}

fn default_mode() -> String {
    "range".to_string()
}

/// Raw job description. Validated into a [`UserConfigUnit`].
#[derive(Deserialize, Debug, Clone, Default)]
pub struct JobConfig {
    pub provider: String,
    pub city: String,
    pub code_num: Option<String>,
    pub code: Option<String>,
    pub ind: Option<String>,
    pub country_code: Option<String>,
    pub region: Option<String>,
    pub from: String,
    pub to: String,
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl JobConfig {
    pub fn validate(&self) -> Result<UserConfigUnit, ConfigError> {
        let city = self.city.trim();
        if city.is_empty() {
            return Err(ConfigError::missing("JOB_CITY"));
        }
        let locator = self.locator()?;
        let start = parse_point("JOB_FROM", &self.from)?;
        let end = parse_point("JOB_TO", &self.to)?;
        if start.day_number().is_some() != end.day_number().is_some() {
            return Err(ConfigError::invalid(
                "JOB_TO",
                format!("'{}' and '{}' differ in granularity", self.from, self.to),
            ));
        }
        if start > end {
            return Err(ConfigError::invalid(
                "JOB_FROM",
                format!("'{}' is after '{}'", self.from, self.to),
            ));
        }

        let span = match self.mode.trim().to_lowercase().as_str() {
            "range" => DateSpan::Range { start, end },
            "grid" => grid_span(start, end)?,
            other => {
                return Err(ConfigError::invalid(
                    "JOB_MODE",
                    format!("'{}' is neither 'range' nor 'grid'", other),
                ))
            }
        };
        Ok(UserConfigUnit::new(city, locator, span))
    }

    fn locator(&self) -> Result<Locator, ConfigError> {
        let provider = match self.provider.trim().to_lowercase().as_str() {
            "meteociel" => Provider::Meteociel,
            "ogimet" => Provider::Ogimet,
            "wunderground" => Provider::Wunderground,
            other => {
                return Err(ConfigError::invalid(
                    "JOB_PROVIDER",
                    format!("unknown provider '{}'", other),
                ))
            }
        };
        Ok(match provider {
            Provider::Meteociel => Locator::Meteociel {
                code_num: required("JOB_CODE_NUM", &self.code_num)?,
                code: required("JOB_CODE", &self.code)?,
            },
            Provider::Ogimet => Locator::Ogimet {
                ind: required("JOB_IND", &self.ind)?,
            },
            Provider::Wunderground => Locator::Wunderground {
                country_code: required("JOB_COUNTRY_CODE", &self.country_code)?,
                region: required("JOB_REGION", &self.region)?,
            },
        })
    }
}

fn required(field: &str, value: &Option<String>) -> Result<String, ConfigError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ConfigError::missing(field)),
    }
}

/// Parses `MM/YYYY` or `DD/MM/YYYY`.
fn parse_point(field: &str, text: &str) -> Result<CalendarPoint, ConfigError> {
    let invalid = || {
        ConfigError::invalid(
            field,
            format!("'{}' is not a valid MM/YYYY or DD/MM/YYYY date", text),
        )
    };
    let parts = text
        .trim()
        .split('/')
        .map(|p| p.trim().parse::<u32>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;
    let point = match parts.as_slice() {
        [month, year] => CalendarPoint::month(*year as i32, *month),
        [day, month, year] => CalendarPoint::day(*year as i32, *month, *day),
        _ => None,
    };
    point.ok_or_else(invalid)
}

/// Each component range runs from the `from` component to the `to` one.
fn grid_span(start: CalendarPoint, end: CalendarPoint) -> Result<DateSpan, ConfigError> {
    let (Some(first_day), Some(last_day)) = (start.day_number(), end.day_number()) else {
        return Err(ConfigError::invalid(
            "JOB_MODE",
            "grid mode needs DD/MM/YYYY boundaries",
        ));
    };
    if start.month_number() > end.month_number() || first_day > last_day {
        return Err(ConfigError::invalid(
            "JOB_MODE",
            "grid month and day ranges must be ascending",
        ));
    }
    Ok(DateSpan::Grid {
        years: start.year()..=end.year(),
        months: start.month_number()..=end.month_number(),
        days: first_day..=last_day,
    })
}

pub fn load_job_config() -> Result<JobConfig> {
    match envy::prefixed("JOB_").from_env::<JobConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load JobConfig: {}", err)),
    }
}

/// Loads the job description and validates it into a request template.
pub fn load_user_config_unit() -> Result<UserConfigUnit> {
    let job = load_job_config()?;
    match job.validate() {
        Ok(unit) => Ok(unit),
        Err(err) => Err(anyhow!("Invalid JobConfig: {}", err)),
    }
}

fn default_output_dir() -> String {
    "./output".to_string()
}

#[derive(Deserialize, Debug)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

pub fn load_output_config() -> Result<OutputConfig> {
    match envy::prefixed("OUTPUT_").from_env::<OutputConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load OutputConfig: {}", err)),
    }
}
