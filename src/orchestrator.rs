//! Drives task generation and scraping for one request template.

use crate::config::GeneralParameters;
use crate::error::Result;
use crate::model::{
    dedup_units, AggregatedResult, FailureRecord, Granularity, ScrapeOutcome, Table, TaskFailure,
    TaskScraper, UserConfigUnit,
};
use crate::task::generate_tasks;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::info;

/// Collects outcomes into one table and one error map.
///
/// Failures are tagged with the position of their task in the stream so the
/// error map keeps generation order whatever order outcomes arrive in.
struct Aggregator {
    granularity: Granularity,
    tables: Vec<Table>,
    failures: Vec<(usize, TaskFailure)>,
}

impl Aggregator {
    fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            tables: Vec::new(),
            failures: Vec::new(),
        }
    }

    fn record(&mut self, index: usize, outcome: ScrapeOutcome) {
        match outcome {
            ScrapeOutcome::Success(table) => self.tables.push(table),
            ScrapeOutcome::Failure(failure) => self.failures.push((index, failure)),
        }
    }

    fn finish(mut self) -> AggregatedResult {
        let mut table = Table::concat(self.granularity, self.tables);
        table.sort_by_date();
        self.failures.sort_by_key(|(index, _)| *index);
        let errors = self
            .failures
            .into_iter()
            .map(|(_, failure)| {
                (
                    failure.key,
                    FailureRecord {
                        url: failure.url,
                        message: failure.message,
                    },
                )
            })
            .collect();
        AggregatedResult { table, errors }
    }
}

/// Scrapes every task of `unit` and merges the outcomes.
///
/// Sequential mode awaits tasks in generation order. Parallel mode keeps at
/// most [`GeneralParameters::workers`] scrapes in flight. Either way the
/// result is a single date-sorted table plus an error map keyed by task key,
/// listed in generation order.
///
/// Only a task construction error is returned as `Err`; scrape failures end
/// up in the error map.
pub async fn run(
    unit: &UserConfigUnit,
    params: &GeneralParameters,
    scraper: Arc<dyn TaskScraper>,
) -> Result<AggregatedResult> {
    let source = unit.source();
    info!(city = unit.city(), %source, parallel = params.parallel, "Starting run");

    let mut aggregator = Aggregator::new(source.granularity());
    let tasks = generate_tasks(unit);
    if params.parallel {
        let workers = params.workers();
        info!(workers, "Scraping in parallel");
        let mut outcomes = stream::iter(tasks.enumerate())
            .map(|(index, task)| {
                let scraper = Arc::clone(&scraper);
                async move {
                    match task {
                        Ok(task) => Ok((index, scraper.scrape(task).await)),
                        Err(e) => Err(e),
                    }
                }
            })
            .buffer_unordered(workers);
        while let Some(outcome) = outcomes.next().await {
            let (index, outcome) = outcome?;
            aggregator.record(index, outcome);
        }
    } else {
        for (index, task) in tasks.enumerate() {
            let task = task?;
            info!(key = task.key(), url = task.url(), "Scraping task");
            aggregator.record(index, scraper.scrape(task).await);
        }
    }

    let result = aggregator.finish();
    info!(
        rows = result.table.len(),
        failures = result.errors.len(),
        "Run finished"
    );
    Ok(result)
}

/// Runs every distinct unit in turn, in first-seen order.
pub async fn run_all(
    units: Vec<UserConfigUnit>,
    params: &GeneralParameters,
    scraper: Arc<dyn TaskScraper>,
) -> Result<Vec<(UserConfigUnit, AggregatedResult)>> {
    let mut results = Vec::new();
    for unit in dedup_units(units) {
        let result = run(&unit, params, Arc::clone(&scraper)).await?;
        results.push((unit, result));
    }
    Ok(results)
}
