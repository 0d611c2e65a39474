//! Error types for the weather scraper.
//!
//! Construction and configuration errors are defects in the request and abort a
//! run. Scrape errors are environmental: they are recorded per task and never
//! stop the batch.

use thiserror::Error;

/// Result type alias using our custom error types.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error type that encompasses all application errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A task could not be constructed from a validated request
    #[error("task construction error: {0}")]
    Build(#[from] BuildError),

    /// Writing results failed
    #[error("output error: {0}")]
    Output(#[from] OutputError),

    /// Generic errors that don't fit other categories
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required configuration value is missing
    #[error("missing required configuration: {0}")]
    Missing(String),

    /// Configuration value is invalid
    #[error("invalid configuration value for {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Task construction errors.
#[derive(Error, Debug, PartialEq)]
pub enum BuildError {
    /// A field required by the target source was not provided
    #[error("missing required task field: {0}")]
    Missing(String),

    /// A field was provided but the target source does not accept it
    #[error("field '{field}' is not accepted by {target}")]
    Unexpected { field: String, target: String },

    /// A field is out of range or empty
    #[error("invalid value for task field {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Page retrieval errors.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status
    #[error("server returned status {status} for {url}")]
    Status { status: u16, url: String },

    /// Headless browser failed to render the page
    #[cfg(feature = "browser")]
    #[error("browser rendering failed: {0}")]
    Browser(String),
}

/// HTML parsing and table reconstruction errors.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Invalid CSS selector
    #[error("invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// Failed to parse date/time
    #[error("failed to parse date/time from '{text}': {message}")]
    DateTimeParse { text: String, message: String },

    /// A column the provider layout requires is absent
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// Unexpected HTML structure
    #[error("unexpected HTML structure: {0}")]
    UnexpectedStructure(String),
}

/// Per-task scrape failures. The kind is kept for logging only; the
/// orchestrator records every kind the same way.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The page could not be retrieved within the retry budget
    #[error("fetch failed after {attempts} attempts: {message}")]
    Fetch { attempts: u32, message: String },

    /// No table matched the selection criterion, or it holds no data
    #[error("table lookup failed: {0}")]
    Lookup(String),

    /// Header or cell text could not be extracted
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// The canonical table could not be rebuilt from the raw cells
    #[error("rework failed: {0}")]
    Rework(#[from] ParseError),
}

/// Persistence errors.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new missing configuration error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing(field.into())
    }

    /// Creates a new invalid configuration error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl BuildError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing(field.into())
    }

    pub fn unexpected(field: impl Into<String>, target: impl std::fmt::Display) -> Self {
        Self::Unexpected {
            field: field.into(),
            target: target.to_string(),
        }
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ParseError {
    /// Creates an invalid selector error.
    pub fn invalid_selector(selector: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: err.to_string(),
        }
    }

    /// Creates a datetime parse error.
    pub fn datetime_parse(text: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::DateTimeParse {
            text: text.into(),
            message: err.to_string(),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedStructure(message.into())
    }
}

impl ScrapeError {
    pub fn lookup(message: impl Into<String>) -> Self {
        Self::Lookup(message.into())
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }
}
