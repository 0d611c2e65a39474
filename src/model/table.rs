//! In-memory weather table: a `date` column followed by numeric columns.

use super::types::Granularity;
use crate::error::ParseError;
use chrono::NaiveDateTime;

/// Name of the leading column in every table.
pub const DATE_COLUMN: &str = "date";

/// One row of a table. `NaN` marks a missing observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDateTime,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    granularity: Granularity,
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Table {
    pub fn new(granularity: Granularity, columns: Vec<String>) -> Self {
        Self {
            granularity,
            columns,
            rows: Vec::new(),
        }
    }

    /// Data column names, without the leading `date` column.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Full header with `date` first.
    pub fn header(&self) -> Vec<String> {
        std::iter::once(DATE_COLUMN.to_string())
            .chain(self.columns.iter().cloned())
            .collect()
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, date: NaiveDateTime, values: Vec<f64>) -> Result<(), ParseError> {
        if values.len() != self.columns.len() {
            return Err(ParseError::unexpected(format!(
                "row for {} has {} values, table has {} columns",
                date,
                values.len(),
                self.columns.len()
            )));
        }
        self.rows.push(Record { date, values });
        Ok(())
    }

    /// Appends an all-`NaN` row for `date`.
    pub fn push_missing(&mut self, date: NaiveDateTime) {
        self.rows.push(Record {
            date,
            values: vec![f64::NAN; self.columns.len()],
        });
    }

    /// Stable ascending sort on the date column.
    pub fn sort_by_date(&mut self) {
        self.rows.sort_by_key(|r| r.date);
    }

    /// Keeps the first row of each run of equal dates. Call after sorting.
    pub fn dedup_dates(&mut self) {
        self.rows.dedup_by_key(|r| r.date);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }

    /// Renames a column in place. Returns false if `from` does not exist.
    pub fn rename_column(&mut self, from: &str, to: impl Into<String>) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.columns[idx] = to.into();
                true
            }
            None => false,
        }
    }

    /// Applies `f` to every value of a column. Returns false if it does not exist.
    pub fn map_column(&mut self, name: &str, f: impl Fn(f64) -> f64) -> bool {
        match self.column_index(name) {
            Some(idx) => {
                for row in &mut self.rows {
                    row.values[idx] = f(row.values[idx]);
                }
                true
            }
            None => false,
        }
    }

    /// Concatenates tables of the same granularity. Columns are the union of
    /// all input columns in first-seen order; absent values become `NaN`.
    pub fn concat(granularity: Granularity, tables: impl IntoIterator<Item = Table>) -> Table {
        let tables: Vec<Table> = tables.into_iter().collect();
        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for column in &table.columns {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let mut merged = Table::new(granularity, columns);
        for table in tables {
            let mapping: Vec<usize> = table
                .columns
                .iter()
                .filter_map(|c| merged.column_index(c))
                .collect();
            for row in table.rows {
                let mut values = vec![f64::NAN; merged.columns.len()];
                for (src, &dst) in mapping.iter().enumerate() {
                    values[dst] = row.values[src];
                }
                merged.rows.push(Record {
                    date: row.date,
                    values,
                });
            }
        }
        merged
    }

    pub fn format_date(&self, date: &NaiveDateTime) -> String {
        match self.granularity {
            Granularity::Daily => date.format("%Y-%m-%d").to_string(),
            Granularity::Hourly => date.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Rows rendered as strings, `date` first and `NaN` as an empty field.
    pub fn string_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                std::iter::once(self.format_date(&row.date))
                    .chain(row.values.iter().map(|v| {
                        if v.is_nan() {
                            String::new()
                        } else {
                            v.to_string()
                        }
                    }))
                    .collect()
            })
            .collect()
    }
}
