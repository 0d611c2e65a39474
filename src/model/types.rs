use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Weather data providers supported by the scraper.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// meteociel.fr, identified by a pair of site codes
    Meteociel,
    /// ogimet.com, identified by a WMO station index
    Ogimet,
    /// wunderground.com, identified by a country/region pair
    Wunderground,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Provider::Meteociel => write!(f, "meteociel"),
            Provider::Ogimet => write!(f, "ogimet"),
            Provider::Wunderground => write!(f, "wunderground"),
        }
    }
}

/// Row granularity of a scraped table.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Granularity {
    /// One row per day, one page per month
    Daily,
    /// One row per hour, one page per day (or per window of days)
    Hourly,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Granularity::Daily => write!(f, "daily"),
            Granularity::Hourly => write!(f, "hourly"),
        }
    }
}

/// The closed set of provider × granularity variants.
///
/// Everything provider-specific (task generation, table criteria, rework,
/// expected calendar points) dispatches on this tag.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Source {
    MeteocielDaily,
    MeteocielHourly,
    OgimetDaily,
    OgimetHourly,
    WundergroundDaily,
    WundergroundHourly,
}

impl Source {
    pub fn new(provider: Provider, granularity: Granularity) -> Self {
        match (provider, granularity) {
            (Provider::Meteociel, Granularity::Daily) => Source::MeteocielDaily,
            (Provider::Meteociel, Granularity::Hourly) => Source::MeteocielHourly,
            (Provider::Ogimet, Granularity::Daily) => Source::OgimetDaily,
            (Provider::Ogimet, Granularity::Hourly) => Source::OgimetHourly,
            (Provider::Wunderground, Granularity::Daily) => Source::WundergroundDaily,
            (Provider::Wunderground, Granularity::Hourly) => Source::WundergroundHourly,
        }
    }

    pub fn provider(&self) -> Provider {
        match self {
            Source::MeteocielDaily | Source::MeteocielHourly => Provider::Meteociel,
            Source::OgimetDaily | Source::OgimetHourly => Provider::Ogimet,
            Source::WundergroundDaily | Source::WundergroundHourly => Provider::Wunderground,
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            Source::MeteocielDaily | Source::OgimetDaily | Source::WundergroundDaily => {
                Granularity::Daily
            }
            Source::MeteocielHourly | Source::OgimetHourly | Source::WundergroundHourly => {
                Granularity::Hourly
            }
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}_{}", self.provider(), self.granularity())
    }
}

/// Units of measurement appended to column names.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Unit {
    Celsius,
    Fahrenheit,
    KilometerPerHour,
    MilePerHour,
    Hectopascal,
    InchOfMercury,
    Millimeter,
    Inch,
    Centimeter,
    Kilometer,
    Percent,
    Hour,
    Octa,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Unit::Celsius => write!(f, "°C"),
            Unit::Fahrenheit => write!(f, "°F"),
            Unit::KilometerPerHour => write!(f, "km/h"),
            Unit::MilePerHour => write!(f, "mph"),
            Unit::Hectopascal => write!(f, "hPa"),
            Unit::InchOfMercury => write!(f, "inHg"),
            Unit::Millimeter => write!(f, "mm"),
            Unit::Inch => write!(f, "in"),
            Unit::Centimeter => write!(f, "cm"),
            Unit::Kilometer => write!(f, "km"),
            Unit::Percent => write!(f, "%"),
            Unit::Hour => write!(f, "h"),
            Unit::Octa => write!(f, "octa"),
        }
    }
}
