use crate::error::ScrapeError;
use crate::model::{PageRenderer, ScrapeOutcome, Table, TaskFailure, TaskScraper};
use crate::scrape::html_table::read_table;
use crate::scrape::rework::{backfill, rework};
use crate::task::TaskParameters;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Number of fetch attempts before a task is reported as failed.
pub const MAX_ATTEMPTS: u32 = 3;

/// Fetches, parses and reworks one task at a time.
pub struct Scraper {
    renderer: Arc<dyn PageRenderer>,
}

impl Scraper {
    pub fn new(renderer: Arc<dyn PageRenderer>) -> Self {
        Self { renderer }
    }

    /// Fetches the task's page, doubling the wait hint after each failed attempt.
    async fn fetch(&self, task: &mut TaskParameters) -> Result<String, ScrapeError> {
        let mut last_error = String::new();
        for attempt in 1..=MAX_ATTEMPTS {
            match self.renderer.render(task.url(), task.wait()).await {
                Ok(html) => return Ok(html),
                Err(e) => {
                    warn!(
                        key = task.key(),
                        attempt,
                        error = %e,
                        "Fetch attempt failed"
                    );
                    last_error = e.to_string();
                    task.double_wait();
                }
            }
        }
        Err(ScrapeError::Fetch {
            attempts: MAX_ATTEMPTS,
            message: last_error,
        })
    }

    async fn scrape_table(&self, task: &mut TaskParameters) -> Result<Table, ScrapeError> {
        let html = self.fetch(task).await?;
        let layout = task.source().layout();
        let raw = read_table(&html, task.criterion(), layout.no_data)?;
        debug!(
            key = task.key(),
            headers = raw.headers.len(),
            cells = raw.cells.len(),
            "Extracted table"
        );
        let mut table = rework(raw, task)?;
        backfill(&mut table, task);
        Ok(table)
    }
}

#[async_trait]
impl TaskScraper for Scraper {
    async fn scrape(&self, mut task: TaskParameters) -> ScrapeOutcome {
        match self.scrape_table(&mut task).await {
            Ok(table) => {
                info!(key = task.key(), rows = table.len(), "Scraped task");
                ScrapeOutcome::Success(table)
            }
            Err(e) => {
                warn!(key = task.key(), url = task.url(), error = %e, "Task failed");
                ScrapeOutcome::Failure(TaskFailure {
                    key: task.key().to_string(),
                    url: task.url().to_string(),
                    message: e.to_string(),
                })
            }
        }
    }
}
