//! Helper functions for reading provider HTML and normalizing values.
//!
//! This module provides utility functions for:
//! - Building CSS selectors and reading cell text
//! - Turning header labels into column keys
//! - Extracting numeric tokens from cells with embedded units
//! - Converting between imperial and metric units

use crate::error::ParseError;
use crate::model::Unit;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d+(?:[.,]\d+)?").expect("numeric token pattern"));

/// Creates a CSS selector from a string.
///
/// This is a wrapper around scraper's Selector::parse that converts
/// parsing errors into our error type for consistent error handling.
pub fn html_selector(selector: &str) -> Result<Selector, ParseError> {
    Selector::parse(selector).map_err(|e| ParseError::invalid_selector(selector, e))
}

/// Text content of an element with runs of whitespace collapsed.
///
/// Image-only cells yield an empty string.
pub fn cell_text(element: ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turns a header label into a column key.
///
/// Parenthesized parts (usually units) are removed, accents are folded,
/// everything is lowercased and non-alphanumeric runs become a single `_`.
///
/// # Examples
///
/// ```no_run
/// assert_eq!(normalize_label("Température max."), "temperature_max");
/// assert_eq!(normalize_label("Wind Speed (mph)"), "wind_speed");
/// assert_eq!(normalize_label("P sea(hPa)"), "p_sea");
/// ```
pub fn normalize_label(label: &str) -> String {
    let mut depth = 0usize;
    let mut key = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth > 0 => {}
            _ => {
                let c = fold_accent(c.to_lowercase().next().unwrap_or(c));
                if c.is_ascii_alphanumeric() {
                    key.push(c);
                } else if !key.ends_with('_') {
                    key.push('_');
                }
            }
        }
    }
    key.trim_matches('_').to_string()
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'â' | 'ä' | 'á' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'î' | 'ï' | 'í' => 'i',
        'ô' | 'ö' | 'ó' => 'o',
        'ù' | 'û' | 'ü' | 'ú' => 'u',
        'ç' => 'c',
        _ => c,
    }
}

/// First numeric token of `text`, accepting a comma as decimal separator.
///
/// # Examples
///
/// ```no_run
/// assert_eq!(parse_numeric_token("6.4 °C"), Some(6.4));
/// assert_eq!(parse_numeric_token("SW 11 km/h (24 km/h)"), Some(11.0));
/// assert_eq!(parse_numeric_token("NNW"), None);
/// ```
pub fn parse_numeric_token(text: &str) -> Option<f64> {
    NUMERIC_TOKEN
        .find(text)
        .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
}

/// First unsigned integer of `text`, used for day and hour ordinals.
pub fn parse_ordinal(text: &str) -> Option<u32> {
    text.split(|c: char| !c.is_ascii_digit())
        .find(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

pub fn mph_to_kmh(mph: f64) -> f64 {
    mph * 1.609_344
}

pub fn inhg_to_hpa(inhg: f64) -> f64 {
    inhg * 33.863_886
}

pub fn inches_to_millimeters(inches: f64) -> f64 {
    inches * 25.4
}

/// Converts `value` between two units. Pairs without a known linear
/// conversion are returned unchanged.
pub fn convert(value: f64, from: Unit, to: Unit) -> f64 {
    match (from, to) {
        (Unit::Fahrenheit, Unit::Celsius) => fahrenheit_to_celsius(value),
        (Unit::MilePerHour, Unit::KilometerPerHour) => mph_to_kmh(value),
        (Unit::InchOfMercury, Unit::Hectopascal) => inhg_to_hpa(value),
        (Unit::Inch, Unit::Millimeter) => inches_to_millimeters(value),
        _ => value,
    }
}
