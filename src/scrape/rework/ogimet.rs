use super::{ColumnRule, HeaderGroup, Layout, RowContext};
use crate::error::ParseError;
use crate::model::Unit;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const DATE_FORMAT: &str = "%d/%m/%Y";

const NO_OBSERVATION: &[&str] = &["-", "--", "----", "-----", "//", "n/a"];
const ZERO: &[&str] = &["tr", "trace"];
const NO_DATA: &[&str] = &["no valid data", "no data"];

/// Daily summaries of a month. Temperature and wind use two-level headers.
pub static DAILY: Layout = Layout {
    groups: &[
        HeaderGroup {
            key: "temperature",
            sub_labels: &["max", "min", "avg"],
        },
        HeaderGroup {
            key: "wind",
            sub_labels: &["dir", "int", "gust"],
        },
    ],
    columns: &[
        ColumnRule {
            key: "temperature_max",
            name: "temperature_max",
            source_unit: Unit::Celsius,
            unit: Unit::Celsius,
        },
        ColumnRule {
            key: "temperature_min",
            name: "temperature_min",
            source_unit: Unit::Celsius,
            unit: Unit::Celsius,
        },
        ColumnRule {
            key: "temperature_avg",
            name: "temperature_avg",
            source_unit: Unit::Celsius,
            unit: Unit::Celsius,
        },
        ColumnRule {
            key: "td_avg",
            name: "dew_point_avg",
            source_unit: Unit::Celsius,
            unit: Unit::Celsius,
        },
        ColumnRule {
            key: "hr_avg",
            name: "humidity_avg",
            source_unit: Unit::Percent,
            unit: Unit::Percent,
        },
        ColumnRule {
            key: "wind_int",
            name: "wind_speed",
            source_unit: Unit::KilometerPerHour,
            unit: Unit::KilometerPerHour,
        },
        ColumnRule {
            key: "wind_gust",
            name: "wind_gust",
            source_unit: Unit::KilometerPerHour,
            unit: Unit::KilometerPerHour,
        },
        ColumnRule {
            key: "pres_s_lev",
            name: "pressure_sea",
            source_unit: Unit::Hectopascal,
            unit: Unit::Hectopascal,
        },
        ColumnRule {
            key: "prec",
            name: "precipitation",
            source_unit: Unit::Millimeter,
            unit: Unit::Millimeter,
        },
        ColumnRule {
            key: "totcloct",
            name: "cloud_cover",
            source_unit: Unit::Octa,
            unit: Unit::Octa,
        },
        ColumnRule {
            key: "sund1h",
            name: "sunshine",
            source_unit: Unit::Hour,
            unit: Unit::Hour,
        },
        ColumnRule {
            key: "viskm",
            name: "visibility",
            source_unit: Unit::Kilometer,
            unit: Unit::Kilometer,
        },
        ColumnRule {
            key: "snowdep",
            name: "snow_depth",
            source_unit: Unit::Centimeter,
            unit: Unit::Centimeter,
        },
    ],
    date_keys: &["date"],
    dropped: &["wind_dir"],
    no_observation: NO_OBSERVATION,
    zero: ZERO,
    no_data: NO_DATA,
    row_marker: None,
    date: daily_date,
};

/// Synoptic reports of a window of days, newest first.
pub static HOURLY: Layout = Layout {
    groups: &[],
    columns: &[
        ColumnRule {
            key: "t",
            name: "temperature",
            source_unit: Unit::Celsius,
            unit: Unit::Celsius,
        },
        ColumnRule {
            key: "td",
            name: "dew_point",
            source_unit: Unit::Celsius,
            unit: Unit::Celsius,
        },
        ColumnRule {
            key: "hr",
            name: "humidity",
            source_unit: Unit::Percent,
            unit: Unit::Percent,
        },
        ColumnRule {
            key: "tmax",
            name: "temperature_max",
            source_unit: Unit::Celsius,
            unit: Unit::Celsius,
        },
        ColumnRule {
            key: "tmin",
            name: "temperature_min",
            source_unit: Unit::Celsius,
            unit: Unit::Celsius,
        },
        ColumnRule {
            key: "ffkmh",
            name: "wind_speed",
            source_unit: Unit::KilometerPerHour,
            unit: Unit::KilometerPerHour,
        },
        ColumnRule {
            key: "gust",
            name: "wind_gust",
            source_unit: Unit::KilometerPerHour,
            unit: Unit::KilometerPerHour,
        },
        ColumnRule {
            key: "p0hpa",
            name: "pressure_station",
            source_unit: Unit::Hectopascal,
            unit: Unit::Hectopascal,
        },
        ColumnRule {
            key: "p_sea",
            name: "pressure_sea",
            source_unit: Unit::Hectopascal,
            unit: Unit::Hectopascal,
        },
        ColumnRule {
            key: "prec",
            name: "precipitation",
            source_unit: Unit::Millimeter,
            unit: Unit::Millimeter,
        },
        ColumnRule {
            key: "n",
            name: "cloud_cover",
            source_unit: Unit::Octa,
            unit: Unit::Octa,
        },
        ColumnRule {
            key: "vis",
            name: "visibility",
            source_unit: Unit::Kilometer,
            unit: Unit::Kilometer,
        },
    ],
    date_keys: &["date", "time"],
    dropped: &["ddd", "ww", "w1", "w2"],
    no_observation: NO_OBSERVATION,
    zero: ZERO,
    no_data: NO_DATA,
    row_marker: Some(is_date_marker),
    date: hourly_date,
};

/// Each report row starts with its `DD/MM/YYYY` date.
fn is_date_marker(cell: &str) -> bool {
    NaiveDate::parse_from_str(cell.trim(), DATE_FORMAT).is_ok()
}

fn parse_date(cell: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(cell.trim(), DATE_FORMAT)
        .map_err(|e| ParseError::datetime_parse(cell, e))
}

fn daily_date(ctx: &RowContext) -> Result<Option<NaiveDateTime>, ParseError> {
    let date = parse_date(ctx.cell("date")?)?;
    Ok(date.and_hms_opt(0, 0, 0))
}

/// Report times are whole UTC hours, `HH:MM`.
fn hourly_date(ctx: &RowContext) -> Result<Option<NaiveDateTime>, ParseError> {
    let date = parse_date(ctx.cell("date")?)?;
    let cell = ctx.cell("time")?;
    let time = NaiveTime::parse_from_str(cell.trim(), "%H:%M")
        .map_err(|e| ParseError::datetime_parse(cell, e))?;
    Ok(date.and_hms_opt(time.hour(), 0, 0))
}
