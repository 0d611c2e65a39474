//! Turns a flattened provider table into a typed [`Table`].
//!
//! The shared pipeline is driven by a per-source [`Layout`]:
//! 1. header labels become column keys, merged headers are expanded
//! 2. the flat cell list is cut into rows, repairing truncated rows
//! 3. each row gets a reconstructed date, each kept cell a numeric value
//! 4. known columns are converted to metric units and renamed with a unit suffix

mod meteociel;
mod ogimet;
mod wunderground;

use crate::error::ParseError;
use crate::model::{days_in_month, Granularity, Source, Table, Unit};
use crate::scrape::helper::{convert, normalize_label, parse_numeric_token};
use crate::scrape::html_table::RawTable;
use crate::task::TaskParameters;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;

/// A merged header whose label spans a fixed set of sub-columns.
#[derive(Debug)]
pub struct HeaderGroup {
    pub key: &'static str,
    pub sub_labels: &'static [&'static str],
}

/// Rename and unit conversion applied to one column key.
#[derive(Debug)]
pub struct ColumnRule {
    pub key: &'static str,
    pub name: &'static str,
    pub source_unit: Unit,
    pub unit: Unit,
}

/// Builds the date of a row, or `None` for rows that carry no observation
/// (monthly summaries and the like).
pub type DateFn = fn(&RowContext) -> Result<Option<NaiveDateTime>, ParseError>;

/// Page layout of one source.
pub struct Layout {
    pub groups: &'static [HeaderGroup],
    pub columns: &'static [ColumnRule],
    /// Keys used for date reconstruction; never kept as values.
    pub date_keys: &'static [&'static str],
    /// Text columns without a numeric reading.
    pub dropped: &'static [&'static str],
    /// Lowercased cell texts meaning "not observed".
    pub no_observation: &'static [&'static str],
    /// Lowercased cell texts meaning "none", e.g. no precipitation.
    pub zero: &'static [&'static str],
    /// Lowercased phrases in the header text of an empty page.
    pub no_data: &'static [&'static str],
    /// Recognizes the first cell of a row, for repairing truncated rows.
    pub row_marker: Option<fn(&str) -> bool>,
    pub date: DateFn,
}

/// One reshaped row together with its header keys and task.
pub struct RowContext<'a> {
    pub task: &'a TaskParameters,
    pub keys: &'a [String],
    pub row: &'a [String],
}

impl RowContext<'_> {
    /// Cell under the column `key`.
    pub fn cell(&self, key: &str) -> Result<&str, ParseError> {
        self.keys
            .iter()
            .position(|k| k == key)
            .and_then(|i| self.row.get(i))
            .map(String::as_str)
            .ok_or_else(|| ParseError::MissingColumn(key.to_string()))
    }

    /// Calendar date of the task combined with `day`.
    pub fn task_date(&self, day: u32) -> Result<NaiveDate, ParseError> {
        NaiveDate::from_ymd_opt(self.task.year(), self.task.month(), day).ok_or_else(|| {
            ParseError::datetime_parse(
                format!("{}-{}-{}", self.task.year(), self.task.month(), day),
                "not a calendar date",
            )
        })
    }
}

impl Source {
    pub fn layout(&self) -> &'static Layout {
        match self {
            Source::MeteocielDaily => &meteociel::DAILY,
            Source::MeteocielHourly => &meteociel::HOURLY,
            Source::OgimetDaily => &ogimet::DAILY,
            Source::OgimetHourly => &ogimet::HOURLY,
            Source::WundergroundDaily => &wunderground::DAILY,
            Source::WundergroundHourly => &wunderground::HOURLY,
        }
    }

    /// Calendar points a complete result for `task` must cover.
    ///
    /// Daily: every day of the month. Hourly: every hour of each day in the
    /// task's window. February 29 is never produced.
    pub fn expected_points(&self, task: &TaskParameters) -> Vec<NaiveDateTime> {
        let (year, month) = (task.year(), task.month());
        let days: Vec<u32> = match (self.granularity(), task.day()) {
            (Granularity::Daily, _) => (1..=days_in_month(month)).collect(),
            (Granularity::Hourly, Some(day)) => {
                let ndays = task.ndays().unwrap_or(1).min(day);
                (day + 1 - ndays..=day).collect()
            }
            (Granularity::Hourly, None) => Vec::new(),
        };
        let hours: Vec<u32> = match self.granularity() {
            Granularity::Daily => vec![0],
            Granularity::Hourly => (0..24).collect(),
        };

        days.into_iter()
            .filter(|&d| !(month == 2 && d == 29))
            .filter_map(|d| NaiveDate::from_ymd_opt(year, month, d))
            .flat_map(|date| hours.iter().filter_map(move |&h| date.and_hms_opt(h, 0, 0)))
            .collect()
    }
}

/// Reworks a flattened table into a typed, date-sorted table.
pub fn rework(raw: RawTable, task: &TaskParameters) -> Result<Table, ParseError> {
    let layout = task.source().layout();
    let keys = expand_headers(&raw.headers, layout.groups);
    let rows = reshape(raw.cells, keys.len(), layout.row_marker)?;

    let kept: Vec<usize> = keys
        .iter()
        .enumerate()
        .filter(|(_, key)| {
            !key.starts_with("unnamed_")
                && !layout.date_keys.contains(&key.as_str())
                && !layout.dropped.contains(&key.as_str())
        })
        .map(|(i, _)| i)
        .collect();

    let mut table = Table::new(
        task.source().granularity(),
        kept.iter().map(|&i| keys[i].clone()).collect(),
    );
    for row in &rows {
        let ctx = RowContext {
            task,
            keys: &keys,
            row,
        };
        let Some(date) = (layout.date)(&ctx)? else {
            continue;
        };
        let values = kept.iter().map(|&i| parse_value(&row[i], layout)).collect();
        table.push(date, values)?;
    }

    for rule in layout.columns {
        if table.map_column(rule.key, |v| convert(v, rule.source_unit, rule.unit)) {
            table.rename_column(rule.key, format!("{} ({})", rule.name, rule.unit));
        }
    }
    table.sort_by_date();
    table.dedup_dates();
    Ok(table)
}

/// Adds an all-`NaN` row for every expected calendar point absent from `table`.
pub fn backfill(table: &mut Table, task: &TaskParameters) {
    let present: HashSet<NaiveDateTime> = table.rows().iter().map(|r| r.date).collect();
    let missing: Vec<NaiveDateTime> = task
        .source()
        .expected_points(task)
        .into_iter()
        .filter(|p| !present.contains(p))
        .collect();
    if missing.is_empty() {
        return;
    }
    for point in missing {
        table.push_missing(point);
    }
    table.sort_by_date();
}

/// Header labels to column keys. Image-only labels get an `unnamed_{i}`
/// placeholder, grouped labels expand into one key per sub-label.
fn expand_headers(headers: &[String], groups: &[HeaderGroup]) -> Vec<String> {
    let mut keys = Vec::with_capacity(headers.len());
    for (i, header) in headers.iter().enumerate() {
        let key = normalize_label(header);
        if key.is_empty() {
            keys.push(format!("unnamed_{}", i));
        } else if let Some(group) = groups.iter().find(|g| g.key == key) {
            keys.extend(group.sub_labels.iter().map(|sub| format!("{}_{}", key, sub)));
        } else {
            keys.push(key);
        }
    }
    keys
}

/// Cuts the flat cell list into rows of `width` cells.
///
/// When the cell count is not a multiple of `width` some rows were truncated.
/// The list is then re-segmented at cells recognized by `row_marker` and short
/// rows are padded with empty cells.
fn reshape(
    cells: Vec<String>,
    width: usize,
    row_marker: Option<fn(&str) -> bool>,
) -> Result<Vec<Vec<String>>, ParseError> {
    if width == 0 {
        return Err(ParseError::unexpected("table has no columns"));
    }
    if cells.len() % width == 0 {
        return Ok(cells.chunks(width).map(<[String]>::to_vec).collect());
    }
    let is_marker = row_marker.ok_or_else(|| {
        ParseError::unexpected(format!(
            "{} cells do not fill rows of {} columns",
            cells.len(),
            width
        ))
    })?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for cell in cells {
        if is_marker(&cell) {
            rows.push(Vec::with_capacity(width));
        }
        match rows.last_mut() {
            Some(row) => row.push(cell),
            None => {
                return Err(ParseError::unexpected(format!(
                    "cell '{}' precedes the first row marker",
                    cell
                )))
            }
        }
    }
    for row in &mut rows {
        if row.len() > width {
            return Err(ParseError::unexpected(format!(
                "row starting with '{}' has {} cells, expected {}",
                row[0],
                row.len(),
                width
            )));
        }
        row.resize(width, String::new());
    }
    Ok(rows)
}

fn parse_value(cell: &str, layout: &Layout) -> f64 {
    let text = cell.trim().to_lowercase();
    if text.is_empty() || layout.no_observation.contains(&text.as_str()) {
        return f64::NAN;
    }
    if layout.zero.contains(&text.as_str()) {
        return 0.0;
    }
    parse_numeric_token(&text).unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn is_hour(cell: &str) -> bool {
        cell.ends_with(" h")
    }

    mod succeeds {
        use super::*;

        #[test]
        fn test_expand_headers_with_groups_and_placeholders() {
            const GROUPS: &[HeaderGroup] = &[HeaderGroup {
                key: "temperature",
                sub_labels: &["max", "avg", "min"],
            }];
            let keys = expand_headers(&strings(&["Time", "Temperature (°F)", ""]), GROUPS);
            assert_eq!(
                keys,
                vec!["time", "temperature_max", "temperature_avg", "temperature_min", "unnamed_2"]
            );
        }

        #[test]
        fn test_reshape_exact_multiple() {
            let rows = reshape(strings(&["1", "a", "2", "b"]), 2, None).unwrap();
            assert_eq!(rows, vec![strings(&["1", "a"]), strings(&["2", "b"])]);
        }

        #[test]
        fn test_reshape_pads_truncated_row() {
            let cells = strings(&["0 h", "1.0", "2.0", "1 h", "3.0", "2 h", "5.0", "6.0"]);
            let rows = reshape(cells, 3, Some(is_hour)).unwrap();
            assert_eq!(rows.len(), 3);
            assert_eq!(rows[1], strings(&["1 h", "3.0", ""]));
            assert_eq!(rows[2], strings(&["2 h", "5.0", "6.0"]));
        }

        #[test]
        fn test_reshape_pads_row_missing_several_values() {
            let cells = strings(&["0 h", "1", "2", "3", "1 h", "4"]);
            let rows = reshape(cells, 4, Some(is_hour)).unwrap();
            assert_eq!(rows[1], strings(&["1 h", "4", "", ""]));
        }

        #[test]
        fn test_expected_points_daily_february_has_no_leap_day() {
            let task = TaskParameters::builder(Source::OgimetDaily)
                .city("paris")
                .ind("07149")
                .year(2020)
                .month(2)
                .build()
                .unwrap();
            let points = Source::OgimetDaily.expected_points(&task);
            assert_eq!(points.len(), 28);
        }

        #[test]
        fn test_expected_points_hourly_window() {
            let task = TaskParameters::builder(Source::OgimetHourly)
                .city("paris")
                .ind("07149")
                .year(2021)
                .month(3)
                .day(10)
                .ndays(3)
                .build()
                .unwrap();
            let points = Source::OgimetHourly.expected_points(&task);
            assert_eq!(points.len(), 72);
            assert_eq!(points[0].to_string(), "2021-03-08 00:00:00");
            assert_eq!(points[71].to_string(), "2021-03-10 23:00:00");
        }

        #[test]
        fn test_backfill_fills_missing_days() {
            let task = TaskParameters::builder(Source::OgimetDaily)
                .city("paris")
                .ind("07149")
                .year(2021)
                .month(1)
                .build()
                .unwrap();
            let mut table = Table::new(Granularity::Daily, vec!["t".into()]);
            for day in (1..=31).filter(|d| *d != 5 && *d != 17) {
                let date = NaiveDate::from_ymd_opt(2021, 1, day)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap();
                table.push(date, vec![day as f64]).unwrap();
            }
            assert_eq!(table.len(), 29);

            backfill(&mut table, &task);

            assert_eq!(table.len(), 31);
            let values = table.column("t").unwrap();
            assert!(values[4].is_nan());
            assert!(values[16].is_nan());
            assert_eq!(values[5], 6.0);
        }

        #[test]
        fn test_parse_value_sentinels() {
            let layout = Source::MeteocielDaily.layout();
            assert!(parse_value("---", layout).is_nan());
            assert!(parse_value("", layout).is_nan());
            assert_eq!(parse_value("Aucune", layout), 0.0);
            assert_eq!(parse_value("12.5 mm", layout), 12.5);
        }
    }

    mod fails {
        use super::*;

        #[test]
        fn test_reshape_without_marker_on_ragged_cells() {
            let result = reshape(strings(&["1", "a", "2"]), 2, None);
            assert!(matches!(result, Err(ParseError::UnexpectedStructure(_))));
        }

        #[test]
        fn test_reshape_overlong_row() {
            let cells = strings(&["0 h", "1", "2", "3", "1 h"]);
            let result = reshape(cells, 3, Some(is_hour));
            assert!(matches!(result, Err(ParseError::UnexpectedStructure(_))));
        }

        #[test]
        fn test_reshape_cells_before_first_marker() {
            let result = reshape(strings(&["x", "0 h", "1"]), 2, Some(is_hour));
            assert!(matches!(result, Err(ParseError::UnexpectedStructure(_))));
        }
    }
}
