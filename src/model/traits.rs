use crate::error::FetchError;
use crate::model::ScrapeOutcome;
use crate::task::TaskParameters;
use async_trait::async_trait;
use std::time::Duration;

/// Trait for types that can retrieve the HTML of a provider page.
///
/// Implementors load `url` and allow up to `wait` for client-side content to
/// settle before returning the document. They must be thread-safe so a single
/// renderer can serve every worker of a parallel run.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Returns the rendered HTML, or an error on transport failure or a
    /// non-success status.
    async fn render(&self, url: &str, wait: Duration) -> Result<String, FetchError>;
}

/// Trait for types that turn one task into a scrape outcome.
///
/// Implementors never fail past this boundary: every problem is reported as
/// [`ScrapeOutcome::Failure`].
#[async_trait]
pub trait TaskScraper: Send + Sync {
    async fn scrape(&self, task: TaskParameters) -> ScrapeOutcome;
}
