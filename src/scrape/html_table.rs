//! Locating the data table in a provider page and flattening it.

use crate::error::{ParseError, ScrapeError};
use crate::scrape::helper::{cell_text, html_selector};
use crate::task::TableCriterion;
use scraper::{ElementRef, Html};

/// Header labels and a flat, row-major list of data cells.
///
/// `sub_headers` holds the labels of any header rows after the first one,
/// used by providers with merged (two-level) headers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub sub_headers: Vec<String>,
    pub cells: Vec<String>,
}

impl RawTable {
    /// All header labels joined, lowercased. Used for sentinel matching.
    pub fn header_text(&self) -> String {
        self.headers
            .iter()
            .chain(self.sub_headers.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

/// Returns the first table of `document` whose attribute matches `criterion`.
pub fn locate_table<'a>(
    document: &'a Html,
    criterion: &TableCriterion,
) -> Result<Option<ElementRef<'a>>, ParseError> {
    let selector = html_selector("table")?;
    Ok(document
        .select(&selector)
        .find(|table| table.value().attr(criterion.attribute) == Some(criterion.value)))
}

/// Flattens a located table.
///
/// Only the table's own rows and cells are read. Rows containing `th` cells
/// are header rows; when a table has none, its first row is the header row.
/// A data cell holding a nested table contributes one value per nested row,
/// and such columns are interleaved back into row-major order.
pub fn extract_table(table: ElementRef) -> Result<RawTable, ParseError> {
    let nested_selector = html_selector("table")?;
    let rows = own_rows(table)?;
    let has_th_rows = rows.iter().any(|row| is_header_row(*row));

    let mut raw = RawTable::default();
    let mut header_rows_seen = 0;
    for (i, row) in rows.iter().enumerate() {
        let cells = own_cells(*row);
        let is_header = if has_th_rows {
            is_header_row(*row)
        } else {
            i == 0
        };

        if is_header {
            let texts: Vec<String> = cells.into_iter().map(cell_text).collect();
            if header_rows_seen == 0 {
                raw.headers = texts;
            } else {
                raw.sub_headers.extend(texts);
            }
            header_rows_seen += 1;
        } else {
            let columns = cells
                .into_iter()
                .map(|cell| match cell.select(&nested_selector).next() {
                    Some(nested) => nested_values(nested),
                    None => Ok(vec![vec![cell_text(cell)]]),
                })
                .collect::<Result<Vec<_>, _>>()?;
            raw.cells.extend(interleave(columns));
        }
    }
    Ok(raw)
}

/// `tr` elements whose closest enclosing table is `table` itself.
fn own_rows(table: ElementRef) -> Result<Vec<ElementRef>, ParseError> {
    let row_selector = html_selector("tr")?;
    Ok(table
        .select(&row_selector)
        .filter(|row| {
            row.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|e| e.value().name() == "table")
                .is_some_and(|enclosing| enclosing.id() == table.id())
        })
        .collect())
}

/// Direct `th`/`td` children of a row.
fn own_cells(row: ElementRef) -> Vec<ElementRef> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "th" | "td"))
        .collect()
}

fn is_header_row(row: ElementRef) -> bool {
    own_cells(row).iter().any(|cell| cell.value().name() == "th")
}

/// Data rows of a table nested in a cell, one list of cell texts per row.
fn nested_values(nested: ElementRef) -> Result<Vec<Vec<String>>, ParseError> {
    Ok(own_rows(nested)?
        .into_iter()
        .filter(|row| !is_header_row(*row))
        .map(|row| own_cells(row).into_iter().map(cell_text).collect::<Vec<_>>())
        .filter(|texts| !texts.is_empty())
        .collect())
}

/// Zips per-column row lists into one row-major cell list. Columns shorter
/// than the longest one are padded with an empty cell.
fn interleave(columns: Vec<Vec<Vec<String>>>) -> Vec<String> {
    let depth = columns.iter().map(Vec::len).max().unwrap_or(0);
    let mut cells = Vec::new();
    for i in 0..depth {
        for column in &columns {
            match column.get(i) {
                Some(values) => cells.extend(values.iter().cloned()),
                None => cells.push(String::new()),
            }
        }
    }
    cells
}

/// Locates and flattens the table, mapping each step to its failure kind.
///
/// A table whose header text contains one of `no_data` is reported as a
/// lookup failure, as is a page without a matching table.
pub fn read_table(
    html: &str,
    criterion: &TableCriterion,
    no_data: &[&str],
) -> Result<RawTable, ScrapeError> {
    let document = Html::parse_document(html);
    let table = locate_table(&document, criterion)
        .map_err(|e| ScrapeError::lookup(e.to_string()))?
        .ok_or_else(|| {
            ScrapeError::lookup(format!(
                "no table with {}=\"{}\"",
                criterion.attribute, criterion.value
            ))
        })?;

    let raw = extract_table(table).map_err(|e| ScrapeError::extraction(e.to_string()))?;
    let header_text = raw.header_text();
    if let Some(sentinel) = no_data.iter().find(|s| header_text.contains(*s)) {
        return Err(ScrapeError::lookup(format!("page reports no data ({})", sentinel)));
    }
    if raw.headers.is_empty() {
        return Err(ScrapeError::extraction("table has no header cells"));
    }
    Ok(raw)
}
