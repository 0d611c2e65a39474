use super::table::Table;
use indexmap::IndexMap;
use serde_derive::Serialize;

/// Result of scraping a single task.
#[derive(Debug)]
pub enum ScrapeOutcome {
    Success(Table),
    Failure(TaskFailure),
}

/// A failed task, correlated by its stable key.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFailure {
    pub key: String,
    pub url: String,
    pub message: String,
}

/// Error map entry as persisted next to the result table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureRecord {
    pub url: String,
    pub message: String,
}

/// Error map keyed by task key, in task generation order.
pub type ErrorMap = IndexMap<String, FailureRecord>;

/// Terminal artifact of a run: one sorted table and one error map.
#[derive(Debug)]
pub struct AggregatedResult {
    pub table: Table,
    pub errors: ErrorMap,
}
