//! HTML generation utilities for testing.
//!
//! Builds provider-like pages: a decoy table followed by the data table
//! matching the source's criterion.

/// Builder for creating data tables with a fluent API.
#[derive(Debug, Default)]
pub struct TablePageBuilder {
    attributes: String,
    header_rows: Vec<String>,
    rows: Vec<String>,
}

impl TablePageBuilder {
    /// Creates a builder for a table carrying `attribute="value"`.
    pub fn new(attribute: &str, value: &str) -> Self {
        Self {
            attributes: format!(r#"{}="{}""#, attribute, value),
            ..Default::default()
        }
    }

    /// Adds a header row of `th` cells.
    pub fn header_row(mut self, labels: &[&str]) -> Self {
        let cells: String = labels.iter().map(|l| format!("<th>{}</th>", l)).collect();
        self.header_rows.push(format!("<tr>{}</tr>", cells));
        self
    }

    /// Adds a row of `td` cells.
    pub fn row<S: AsRef<str>>(mut self, cells: &[S]) -> Self {
        let cells: String = cells
            .iter()
            .map(|c| format!("<td>{}</td>", c.as_ref()))
            .collect();
        self.rows.push(format!("<tr>{}</tr>", cells));
        self
    }

    /// Builds the full page.
    pub fn build(self) -> String {
        format!(
            r#"<html><body>
<table class="menu"><tr><td>Accueil</td><td>Climatologie</td></tr></table>
<table {}>
{}
{}
</table>
</body></html>"#,
            self.attributes,
            self.header_rows.join("\n"),
            self.rows.join("\n")
        )
    }
}

/// Ogimet monthly summary with two-level temperature headers, one row per
/// listed day, newest first.
pub fn ogimet_daily_page(year: i32, month: u32, days: &[u32]) -> String {
    let mut builder = TablePageBuilder::new("bgcolor", "#d0d0d0")
        .header_row(&["Date", "Temperature(C)", "Prec.(mm)"])
        .header_row(&["Max", "Min", "Avg"]);
    for day in days.iter().rev() {
        builder = builder.row(&[
            format!("{:02}/{:02}/{}", day, month, year),
            format!("{:.1}", 10.0 + *day as f64 / 10.0),
            format!("{:.1}", 1.0 + *day as f64 / 10.0),
            "5.5".to_string(),
            "Tr".to_string(),
        ]);
    }
    builder.build()
}

/// Meteociel monthly climatology for days `1..=ndays` plus a summary row.
/// Headers are plain `td` cells in the first row.
pub fn meteociel_daily_page(ndays: u32) -> String {
    let mut rows = vec![
        "<tr><td>Jour</td><td>Température max.</td><td>Température min.</td><td>Précipitations</td></tr>"
            .to_string(),
    ];
    for day in 1..=ndays {
        rows.push(format!(
            "<tr><td>{:02}</td><td>{}.0 °C</td><td>{}.5 °C</td><td>Aucune</td></tr>",
            day,
            day + 5,
            day % 4
        ));
    }
    rows.push("<tr><td>Moyennes</td><td>12.0 °C</td><td>1.5 °C</td><td>0 mm</td></tr>".to_string());
    format!(
        r#"<html><body>
<table cellpadding="0"><tr><td>Bordeaux</td></tr></table>
<table cellpadding="2">{}</table>
</body></html>"#,
        rows.join("\n")
    )
}
