use super::{ColumnRule, HeaderGroup, Layout, RowContext};
use crate::error::ParseError;
use crate::model::Unit;
use crate::scrape::helper::parse_ordinal;
use chrono::{NaiveDateTime, NaiveTime, Timelike};

const MAX_AVG_MIN: &[&str] = &["max", "avg", "min"];

const NO_OBSERVATION: &[&str] = &["-", "--", "n/a"];
const ZERO: &[&str] = &["trace"];
const NO_DATA: &[&str] = &["no data recorded"];

/// Monthly history rendered client-side, imperial units.
pub static DAILY: Layout = Layout {
    groups: &[
        HeaderGroup {
            key: "temperature",
            sub_labels: MAX_AVG_MIN,
        },
        HeaderGroup {
            key: "dew_point",
            sub_labels: MAX_AVG_MIN,
        },
        HeaderGroup {
            key: "humidity",
            sub_labels: MAX_AVG_MIN,
        },
        HeaderGroup {
            key: "wind_speed",
            sub_labels: MAX_AVG_MIN,
        },
        HeaderGroup {
            key: "pressure",
            sub_labels: MAX_AVG_MIN,
        },
        HeaderGroup {
            key: "precipitation",
            sub_labels: &["total"],
        },
    ],
    columns: &[
        ColumnRule {
            key: "temperature_max",
            name: "temperature_max",
            source_unit: Unit::Fahrenheit,
            unit: Unit::Celsius,
        },
        ColumnRule {
            key: "temperature_avg",
            name: "temperature_avg",
            source_unit: Unit::Fahrenheit,
            unit: Unit::Celsius,
        },
        ColumnRule {
            key: "temperature_min",
            name: "temperature_min",
            source_unit: Unit::Fahrenheit,
            unit: Unit::Celsius,
        },
        ColumnRule {
            key: "dew_point_max",
            name: "dew_point_max",
            source_unit: Unit::Fahrenheit,
            unit: Unit::Celsius,
        },
        ColumnRule {
            key: "dew_point_avg",
            name: "dew_point_avg",
            source_unit: Unit::Fahrenheit,
            unit: Unit::Celsius,
        },
        ColumnRule {
            key: "dew_point_min",
            name: "dew_point_min",
            source_unit: Unit::Fahrenheit,
            unit: Unit::Celsius,
        },
        ColumnRule {
            key: "humidity_max",
            name: "humidity_max",
            source_unit: Unit::Percent,
            unit: Unit::Percent,
        },
        ColumnRule {
            key: "humidity_avg",
            name: "humidity_avg",
            source_unit: Unit::Percent,
            unit: Unit::Percent,
        },
        ColumnRule {
            key: "humidity_min",
            name: "humidity_min",
            source_unit: Unit::Percent,
            unit: Unit::Percent,
        },
        ColumnRule {
            key: "wind_speed_max",
            name: "wind_speed_max",
            source_unit: Unit::MilePerHour,
            unit: Unit::KilometerPerHour,
        },
        ColumnRule {
            key: "wind_speed_avg",
            name: "wind_speed_avg",
            source_unit: Unit::MilePerHour,
            unit: Unit::KilometerPerHour,
        },
        ColumnRule {
            key: "wind_speed_min",
            name: "wind_speed_min",
            source_unit: Unit::MilePerHour,
            unit: Unit::KilometerPerHour,
        },
        ColumnRule {
            key: "pressure_max",
            name: "pressure_max",
            source_unit: Unit::InchOfMercury,
            unit: Unit::Hectopascal,
        },
        ColumnRule {
            key: "pressure_avg",
            name: "pressure_avg",
            source_unit: Unit::InchOfMercury,
            unit: Unit::Hectopascal,
        },
        ColumnRule {
            key: "pressure_min",
            name: "pressure_min",
            source_unit: Unit::InchOfMercury,
            unit: Unit::Hectopascal,
        },
        ColumnRule {
            key: "precipitation_total",
            name: "precipitation",
            source_unit: Unit::Inch,
            unit: Unit::Millimeter,
        },
    ],
    date_keys: &["time"],
    dropped: &[],
    no_observation: NO_OBSERVATION,
    zero: ZERO,
    no_data: NO_DATA,
    row_marker: None,
    date: daily_date,
};

/// Daily history: one row per observation, several per hour at times.
pub static HOURLY: Layout = Layout {
    groups: &[],
    columns: &[
        ColumnRule {
            key: "temperature",
            name: "temperature",
            source_unit: Unit::Fahrenheit,
            unit: Unit::Celsius,
        },
        ColumnRule {
            key: "dew_point",
            name: "dew_point",
            source_unit: Unit::Fahrenheit,
            unit: Unit::Celsius,
        },
        ColumnRule {
            key: "humidity",
            name: "humidity",
            source_unit: Unit::Percent,
            unit: Unit::Percent,
        },
        ColumnRule {
            key: "wind_speed",
            name: "wind_speed",
            source_unit: Unit::MilePerHour,
            unit: Unit::KilometerPerHour,
        },
        ColumnRule {
            key: "wind_gust",
            name: "wind_gust",
            source_unit: Unit::MilePerHour,
            unit: Unit::KilometerPerHour,
        },
        ColumnRule {
            key: "pressure",
            name: "pressure",
            source_unit: Unit::InchOfMercury,
            unit: Unit::Hectopascal,
        },
        ColumnRule {
            key: "precip",
            name: "precipitation",
            source_unit: Unit::Inch,
            unit: Unit::Millimeter,
        },
    ],
    date_keys: &["time"],
    dropped: &["wind", "condition"],
    no_observation: NO_OBSERVATION,
    zero: ZERO,
    no_data: NO_DATA,
    row_marker: None,
    date: hourly_date,
};

fn daily_date(ctx: &RowContext) -> Result<Option<NaiveDateTime>, ParseError> {
    let cell = ctx.cell("time")?;
    let Some(day) = parse_ordinal(cell) else {
        return Ok(None);
    };
    Ok(ctx.task_date(day)?.and_hms_opt(0, 0, 0))
}

/// Observation times read like `"12:51 AM"`; rows are bucketed to the hour.
fn hourly_date(ctx: &RowContext) -> Result<Option<NaiveDateTime>, ParseError> {
    let cell = ctx.cell("time")?;
    let time = NaiveTime::parse_from_str(cell.trim(), "%I:%M %p")
        .map_err(|e| ParseError::datetime_parse(cell, e))?;
    let day = ctx
        .task
        .day()
        .ok_or_else(|| ParseError::unexpected("hourly task without a day"))?;
    Ok(ctx.task_date(day)?.and_hms_opt(time.hour(), 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Source;
    use crate::scrape::html_table::RawTable;
    use crate::scrape::rework::rework;
    use crate::task::TaskParameters;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn hourly_task() -> TaskParameters {
        TaskParameters::builder(Source::WundergroundHourly)
            .city("new york city")
            .country_code("us")
            .region("KLGA")
            .year(2020)
            .month(7)
            .day(4)
            .build()
            .unwrap()
    }

    mod succeeds {
        use super::*;

        #[test]
        fn test_hourly_rework_converts_units() {
            let raw = RawTable {
                headers: strings(&["Time", "Temperature", "Wind", "Wind Speed", "Pressure", "Precip.", "Condition"]),
                sub_headers: vec![],
                cells: strings(&[
                    "12:51 AM", "32 °F", "NNW", "10 °mph", "29.92 °in", "1.00 °in", "Cloudy",
                ]),
            };

            let table = rework(raw, &hourly_task()).unwrap();

            assert_eq!(
                table.columns(),
                &["temperature (°C)", "wind_speed (km/h)", "pressure (hPa)", "precipitation (mm)"]
            );
            let row = &table.rows()[0];
            assert_eq!(row.date.to_string(), "2020-07-04 00:00:00");
            assert!(row.values[0].abs() < 1e-9);
            assert!((row.values[1] - 16.09344).abs() < 1e-9);
            assert!((row.values[2] - 1013.2075).abs() < 1e-3);
            assert!((row.values[3] - 25.4).abs() < 1e-9);
        }

        #[test]
        fn test_hourly_rework_keeps_first_observation_per_hour() {
            let raw = RawTable {
                headers: strings(&["Time", "Temperature"]),
                sub_headers: vec![],
                cells: strings(&["1:51 PM", "86 °F", "1:15 PM", "84 °F", "2:51 PM", "88 °F"]),
            };

            let table = rework(raw, &hourly_task()).unwrap();

            assert_eq!(table.len(), 2);
            assert_eq!(table.rows()[0].date.to_string(), "2020-07-04 13:00:00");
            assert!((table.rows()[0].values[0] - 30.0).abs() < 1e-9);
        }

        #[test]
        fn test_daily_rework_expands_max_avg_min() {
            let task = TaskParameters::builder(Source::WundergroundDaily)
                .city("new york city")
                .country_code("us")
                .region("KLGA")
                .year(2020)
                .month(7)
                .build()
                .unwrap();
            let raw = RawTable {
                headers: strings(&["Time", "Temperature (°F)", "Precipitation (in)"]),
                sub_headers: strings(&["Max", "Avg", "Min", "Total"]),
                cells: strings(&["1", "86", "77.5", "68", "0.00", "2", "212", "100", "32", "0.50"]),
            };

            let table = rework(raw, &task).unwrap();

            assert_eq!(
                table.columns(),
                &[
                    "temperature_max (°C)",
                    "temperature_avg (°C)",
                    "temperature_min (°C)",
                    "precipitation (mm)",
                ]
            );
            assert!((table.column("temperature_max (°C)").unwrap()[1] - 100.0).abs() < 1e-9);
            assert!((table.column("precipitation (mm)").unwrap()[1] - 12.7).abs() < 1e-9);
        }
    }

    mod fails {
        use super::*;

        #[test]
        fn test_hourly_rework_with_bad_time() {
            let raw = RawTable {
                headers: strings(&["Time", "Temperature"]),
                sub_headers: vec![],
                cells: strings(&["25:99", "32 °F"]),
            };
            let result = rework(raw, &hourly_task());
            assert!(matches!(result, Err(ParseError::DateTimeParse { .. })));
        }
    }
}
