//! Core data structures shared across task generation, scraping and
//! aggregation.

pub mod calendar;
pub mod outcome;
pub mod table;
pub mod traits;
pub mod types;
pub mod user_config;

// Re-export commonly used items at the module level
pub use calendar::{days_in_month, two_digits, CalendarPoint};
pub use outcome::{AggregatedResult, ErrorMap, FailureRecord, ScrapeOutcome, TaskFailure};
pub use table::Table;
pub use traits::{PageRenderer, TaskScraper};
pub use types::{Granularity, Provider, Source, Unit};
pub use user_config::{dedup_units, DateSpan, Locator, UserConfigUnit};
