//! Page URL builders for every provider.
//!
//! The templates mirror the public URL schemes of each site. They are external
//! contracts and are kept in this one place so a layout change touches a
//! single file.

use crate::model::two_digits;

pub const METEOCIEL_BASE: &str = "https://www.meteociel.fr";
pub const OGIMET_BASE: &str = "https://www.ogimet.com";
pub const WUNDERGROUND_BASE: &str = "https://www.wunderground.com";

/// Types of pages that can be requested.
#[derive(Debug, Clone)]
pub enum PageQuery<'a> {
    /// Monthly climatology table, one row per day
    MeteocielDaily {
        code_num: &'a str,
        code: &'a str,
        year: i32,
        month: u32,
    },
    /// Observations of a single day, one row per hour
    MeteocielHourly {
        code_num: &'a str,
        code: &'a str,
        year: i32,
        month: u32,
        day: u32,
    },
    /// Daily summaries of a whole month
    OgimetDaily {
        ind: &'a str,
        year: i32,
        month: u32,
        ndays: u32,
    },
    /// Synoptic reports for the `ndays` days ending on `day`
    OgimetHourly {
        ind: &'a str,
        year: i32,
        month: u32,
        day: u32,
        ndays: u32,
    },
    /// Monthly history, one row per day
    WundergroundDaily {
        country_code: &'a str,
        city: &'a str,
        region: &'a str,
        year: i32,
        month: u32,
    },
    /// Daily history, one row per observation
    WundergroundHourly {
        country_code: &'a str,
        city: &'a str,
        region: &'a str,
        year: i32,
        month: u32,
        day: u32,
    },
}

/// Builder for provider page URLs.
pub struct UrlBuilder;

impl UrlBuilder {
    /// Creates the page URL for the given query. `base` replaces the
    /// provider's default scheme and host when set.
    pub fn build(query: PageQuery, base: Option<&str>) -> String {
        match query {
            PageQuery::MeteocielDaily {
                code_num,
                code,
                year,
                month,
            } => format!(
                "{}/climatologie/obs_villes.php?code{}={}&mois={}&annee={}",
                base.unwrap_or(METEOCIEL_BASE),
                code_num,
                code,
                month,
                year
            ),
            // the site numbers months from zero on its real-time pages
            PageQuery::MeteocielHourly {
                code_num,
                code,
                year,
                month,
                day,
            } => format!(
                "{}/temps-reel/obs_villes.php?code{}={}&jour2={}&mois2={}&annee2={}",
                base.unwrap_or(METEOCIEL_BASE),
                code_num,
                code,
                day,
                month - 1,
                year
            ),
            PageQuery::OgimetDaily {
                ind,
                year,
                month,
                ndays,
            } => format!(
                "{}/cgi-bin/gsodres?lang=en&mode=0&ind={}&ord=DIR&ano={}&mes={}&day={}&ndays={}",
                base.unwrap_or(OGIMET_BASE),
                ind,
                year,
                two_digits(month),
                two_digits(ndays),
                ndays
            ),
            PageQuery::OgimetHourly {
                ind,
                year,
                month,
                day,
                ndays,
            } => format!(
                "{}/cgi-bin/gsynres?lang=en&ind={}&ord=DIR&ndays={}&ano={}&mes={}&day={}&hora=23&min=00&Send=send",
                base.unwrap_or(OGIMET_BASE),
                ind,
                ndays,
                year,
                two_digits(month),
                two_digits(day)
            ),
            PageQuery::WundergroundDaily {
                country_code,
                city,
                region,
                year,
                month,
            } => format!(
                "{}/history/monthly/{}/{}/{}/date/{}-{}",
                base.unwrap_or(WUNDERGROUND_BASE),
                country_code,
                city_slug(city),
                region,
                year,
                month
            ),
            PageQuery::WundergroundHourly {
                country_code,
                city,
                region,
                year,
                month,
                day,
            } => format!(
                "{}/history/daily/{}/{}/{}/date/{}-{}-{}",
                base.unwrap_or(WUNDERGROUND_BASE),
                country_code,
                city_slug(city),
                region,
                year,
                month,
                day
            ),
        }
    }
}

/// Lowercases and joins whitespace-separated words with `-`.
fn city_slug(city: &str) -> String {
    city.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
