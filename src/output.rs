//! Persists a run's table as CSV and its error map as JSON.

use crate::error::OutputError;
use crate::model::{two_digits, AggregatedResult, DateSpan, ErrorMap, Table, UserConfigUnit};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// Paths of the files written for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenFiles {
    pub table: PathBuf,
    pub errors: PathBuf,
}

/// Writes results into a directory, creating it when missing.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn write(
        &self,
        unit: &UserConfigUnit,
        result: &AggregatedResult,
    ) -> Result<WrittenFiles, OutputError> {
        fs::create_dir_all(&self.dir)?;
        let base = file_stem(unit);
        let files = WrittenFiles {
            table: self.dir.join(format!("{}.csv", base)),
            errors: self.dir.join(format!("{}_errors.json", base)),
        };
        write_table(&files.table, &result.table)?;
        write_errors(&files.errors, &result.errors)?;
        info!(
            table = %files.table.display(),
            errors = %files.errors.display(),
            "Wrote results"
        );
        Ok(files)
    }
}

/// `<city>_<source>_<start>_<end>` with the city slugged and dates dashed.
pub fn file_stem(unit: &UserConfigUnit) -> String {
    let city = unit
        .city()
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    let (start, end) = match unit.span() {
        DateSpan::Range { start, end } => (start.label(), end.label()),
        DateSpan::Grid {
            years,
            months,
            days,
        } => (
            format!(
                "{}/{}/{}",
                two_digits(*days.start()),
                two_digits(*months.start()),
                years.start()
            ),
            format!(
                "{}/{}/{}",
                two_digits(*days.end()),
                two_digits(*months.end()),
                years.end()
            ),
        ),
    };
    format!(
        "{}_{}_{}_{}",
        city,
        unit.source(),
        start.replace('/', "-"),
        end.replace('/', "-")
    )
}

/// Writes the table with `date` as the first column. Missing values are empty.
pub fn write_table(path: &Path, table: &Table) -> Result<(), OutputError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.header())?;
    for row in table.string_rows() {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_errors(path: &Path, errors: &ErrorMap) -> Result<(), OutputError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, errors)?;
    Ok(())
}
