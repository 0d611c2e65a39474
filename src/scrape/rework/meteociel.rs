use super::{ColumnRule, Layout, RowContext};
use crate::error::ParseError;
use crate::model::Unit;
use crate::scrape::helper::parse_ordinal;
use chrono::NaiveDateTime;

const NO_OBSERVATION: &[&str] = &["-", "--", "---", "n/a"];
const ZERO: &[&str] = &["aucune", "aucun", "néant"];
const NO_DATA: &[&str] = &["aucune donnée", "pas de données"];

/// Monthly climatology page: one row per day, first column is the day.
pub static DAILY: Layout = Layout {
    groups: &[],
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
            key: "precipitations",
            name: "precipitation",
            source_unit: Unit::Millimeter,
            unit: Unit::Millimeter,
        },
        ColumnRule {
            key: "ensoleillement",
            name: "sunshine",
            source_unit: Unit::Hour,
            unit: Unit::Hour,
        },
    ],
    date_keys: &["jour"],
    dropped: &[],
    no_observation: NO_OBSERVATION,
    zero: ZERO,
    no_data: NO_DATA,
    row_marker: None,
    date: daily_date,
};

/// Real-time observations of one day: one row per hour, newest first.
pub static HOURLY: Layout = Layout {
    groups: &[],
    columns: &[
        ColumnRule {
            key: "visibilite",
            name: "visibility",
            source_unit: Unit::Kilometer,
            unit: Unit::Kilometer,
        },
        ColumnRule {
            key: "temperature",
            name: "temperature",
            source_unit: Unit::Celsius,
            unit: Unit::Celsius,
        },
        ColumnRule {
            key: "humidite",
            name: "humidity",
            source_unit: Unit::Percent,
            unit: Unit::Percent,
        },
        ColumnRule {
            key: "point_de_rosee",
            name: "dew_point",
            source_unit: Unit::Celsius,
            unit: Unit::Celsius,
        },
        ColumnRule {
            key: "vent",
            name: "wind_speed",
            source_unit: Unit::KilometerPerHour,
            unit: Unit::KilometerPerHour,
        },
        ColumnRule {
            key: "pression",
            name: "pressure",
            source_unit: Unit::Hectopascal,
            unit: Unit::Hectopascal,
        },
        ColumnRule {
            key: "precip_mm_h",
            name: "precipitation",
            source_unit: Unit::Millimeter,
            unit: Unit::Millimeter,
        },
    ],
    date_keys: &["heure"],
    dropped: &["temps"],
    no_observation: NO_OBSERVATION,
    zero: ZERO,
    no_data: NO_DATA,
    row_marker: Some(is_hour_marker),
    date: hourly_date,
};

/// Hour cells read like `"7 h"` or `"23h"`.
fn is_hour_marker(cell: &str) -> bool {
    cell.trim()
        .strip_suffix('h')
        .map(str::trim_end)
        .is_some_and(|n| n.parse::<u32>().is_ok_and(|h| h < 24))
}

/// Day cells read like `"5"` or `"Ven. 05"`; summary rows carry no number.
fn daily_date(ctx: &RowContext) -> Result<Option<NaiveDateTime>, ParseError> {
    let cell = ctx.cell("jour")?;
    let Some(day) = parse_ordinal(cell) else {
        return Ok(None);
    };
    Ok(ctx.task_date(day)?.and_hms_opt(0, 0, 0))
}

fn hourly_date(ctx: &RowContext) -> Result<Option<NaiveDateTime>, ParseError> {
    let cell = ctx.cell("heure")?;
    if !is_hour_marker(cell) {
        return Err(ParseError::datetime_parse(cell, "expected an hour like '7 h'"));
    }
    let day = ctx
        .task
        .day()
        .ok_or_else(|| ParseError::unexpected("hourly task without a day"))?;
    let hour = parse_ordinal(cell).unwrap_or(0);
    Ok(ctx.task_date(day)?.and_hms_opt(hour, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Source;
    use crate::scrape::rework::rework;
    use crate::scrape::html_table::RawTable;
    use crate::task::TaskParameters;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn hourly_task() -> TaskParameters {
        TaskParameters::builder(Source::MeteocielHourly)
            .city("bordeaux")
            .code_num("2")
            .code("7510")
            .year(2021)
            .month(3)
            .day(14)
            .build()
            .unwrap()
    }

    mod succeeds {
        use super::*;

        #[test]
        fn test_hour_marker() {
            assert!(is_hour_marker("7 h"));
            assert!(is_hour_marker("23h"));
            assert!(!is_hour_marker("24 h"));
            assert!(!is_hour_marker("12.5"));
        }

        #[test]
        fn test_daily_rework_skips_summary_rows() {
            let task = TaskParameters::builder(Source::MeteocielDaily)
                .city("bordeaux")
                .code_num("2")
                .code("7510")
                .year(2021)
                .month(3)
                .build()
                .unwrap();
            let raw = RawTable {
                headers: strings(&["Jour", "Température max.", "Température min.", "Précipitations"]),
                sub_headers: vec![],
                cells: strings(&[
                    "Lun. 01", "14.2 °C", "3.1 °C", "Aucune", "Mar. 02", "15.0 °C", "---", "2.4 mm",
                    "Moyennes", "14.6 °C", "3.1 °C", "2.4 mm",
                ]),
            };

            let table = rework(raw, &task).unwrap();

            assert_eq!(
                table.columns(),
                &["temperature_max (°C)", "temperature_min (°C)", "precipitation (mm)"]
            );
            assert_eq!(table.len(), 2);
            assert_eq!(table.column("precipitation (mm)").unwrap(), vec![0.0, 2.4]);
            assert!(table.column("temperature_min (°C)").unwrap()[1].is_nan());
        }

        #[test]
        fn test_hourly_rework_drops_image_column_and_sorts() {
            let raw = RawTable {
                headers: strings(&["Heure", "", "Température", "Vent (rafales)", "Pression"]),
                sub_headers: vec![],
                cells: strings(&[
                    "1 h", "", "6.1 °C", "SO 11 km/h (24 km/h)", "1012.4 hPa", "0 h", "", "6.4 °C",
                    "SO 9 km/h (20 km/h)", "1012.9 hPa",
                ]),
            };

            let table = rework(raw, &hourly_task()).unwrap();

            assert_eq!(
                table.columns(),
                &["temperature (°C)", "wind_speed (km/h)", "pressure (hPa)"]
            );
            assert_eq!(table.rows()[0].date.to_string(), "2021-03-14 00:00:00");
            assert_eq!(table.column("wind_speed (km/h)").unwrap(), vec![9.0, 11.0]);
        }

        #[test]
        fn test_hourly_rework_repairs_truncated_row() {
            let raw = RawTable {
                headers: strings(&["Heure", "Température", "Humidité", "Pression"]),
                sub_headers: vec![],
                cells: strings(&["2 h", "5.0 °C", "90%", "1011.0 hPa", "1 h", "5.5 °C", "0 h", "6.0 °C", "88%", "1012.0 hPa"]),
            };

            let table = rework(raw, &hourly_task()).unwrap();

            assert_eq!(table.len(), 3);
            let humidity = table.column("humidity (%)").unwrap();
            assert!(humidity[1].is_nan());
            assert!(table.column("pressure (hPa)").unwrap()[1].is_nan());
        }
    }

    mod fails {
        use super::*;

        #[test]
        fn test_hourly_rework_with_garbled_hour() {
            let raw = RawTable {
                headers: strings(&["Heure", "Température"]),
                sub_headers: vec![],
                cells: strings(&["midi", "6.4 °C"]),
            };
            let result = rework(raw, &hourly_task());
            assert!(matches!(result, Err(ParseError::DateTimeParse { .. })));
        }
    }
}
