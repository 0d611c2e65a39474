//! Mock renderers and scrapers for testing.

use crate::error::FetchError;
use crate::model::{PageRenderer, ScrapeOutcome, Table, TaskFailure, TaskScraper};
use crate::task::TaskParameters;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A renderer that fails a fixed number of times, then serves a body.
/// Records the wait hint of every call.
pub struct MockRenderer {
    failures: AtomicUsize,
    body: String,
    waits: Mutex<Vec<Duration>>,
}

impl MockRenderer {
    /// Always serves `body`.
    pub fn always(body: impl Into<String>) -> Self {
        Self::failing_then(0, body)
    }

    /// Fails the first `failures` calls with a 503, then serves `body`.
    pub fn failing_then(failures: usize, body: impl Into<String>) -> Self {
        Self {
            failures: AtomicUsize::new(failures),
            body: body.into(),
            waits: Mutex::new(Vec::new()),
        }
    }

    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageRenderer for MockRenderer {
    async fn render(&self, url: &str, wait: Duration) -> Result<String, FetchError> {
        self.waits.lock().unwrap().push(wait);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(FetchError::Status {
                status: 503,
                url: url.to_string(),
            });
        }
        Ok(self.body.clone())
    }
}

/// A scraper that answers every task with a one-row table on the task's date,
/// except for keys listed as failing. Counts calls and tracks concurrency.
pub struct MockScraper {
    failing_keys: Vec<String>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockScraper {
    pub fn new() -> Self {
        Self {
            failing_keys: Vec::new(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn failing(mut self, key: impl Into<String>) -> Self {
        self.failing_keys.push(key.into());
        self
    }

    /// Sleeps this long in every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskScraper for MockScraper {
    async fn scrape(&self, task: TaskParameters) -> ScrapeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_keys.iter().any(|k| k == task.key()) {
            return ScrapeOutcome::Failure(TaskFailure {
                key: task.key().to_string(),
                url: task.url().to_string(),
                message: "fetch failed after 3 attempts: server returned status 503".to_string(),
            });
        }

        let mut table = Table::new(task.source().granularity(), vec!["temperature (°C)".to_string()]);
        let date = NaiveDate::from_ymd_opt(task.year(), task.month(), task.day().unwrap_or(1))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        table.push(date, vec![task.month() as f64]).unwrap();
        ScrapeOutcome::Success(table)
    }
}
