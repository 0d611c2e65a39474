//! Weather table scraper
//!
//! Retrieves historical weather observations published as HTML tables by
//! Meteociel, Ogimet and Wunderground and turns them into one unit-normalized
//! table per request, plus a map of the periods that could not be scraped.
//!
//! # Architecture
//!
//! - **Task generation**: a validated request becomes a lazy stream of
//!   per-month or per-day page jobs
//! - **Scraping**: each job is fetched with retries, its table located,
//!   reworked into metric units and backfilled to a complete calendar
//! - **Orchestration**: jobs run sequentially or with bounded parallelism
//!   and are merged into a single date-sorted table
//!
//! The result is written as CSV next to a JSON error map.

mod config;
mod error;
mod model;
mod orchestrator;
mod output;
mod scrape;
mod task;

#[cfg(test)]
mod test_utils;

use crate::config::GeneralParameters;
use crate::model::{PageRenderer, TaskScraper};
use crate::output::FileSink;
use crate::scrape::{HttpRenderer, Scraper};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Application entry point.
///
/// Loads configuration from the environment, scrapes the requested span and
/// persists the aggregated result.
#[tokio::main]
async fn main() -> Result<()> {
    let app_config = config::load_app_config()?;
    tracing_subscriber::fmt()
        .with_max_level(app_config.log_level())
        .init();

    let params = config::load_general_parameters()?;
    let unit = config::load_user_config_unit()?;
    let output_config = config::load_output_config()?;

    let renderer = build_renderer(&params).await?;
    let scraper: Arc<dyn TaskScraper> = Arc::new(Scraper::new(renderer));

    let sink = FileSink::new(&output_config.dir);
    let results = orchestrator::run_all(vec![unit], &params, scraper)
        .await
        .context("Failed to run scrape")?;
    for (unit, result) in results {
        if !result.errors.is_empty() {
            info!(
                source = %unit.source(),
                failures = result.errors.len(),
                "Some periods could not be scraped"
            );
        }
        sink.write(&unit, &result)
            .context("Failed to write results")?;
    }
    Ok(())
}

#[cfg(feature = "browser")]
async fn build_renderer(params: &GeneralParameters) -> Result<Arc<dyn PageRenderer>> {
    if params.browser {
        let renderer = scrape::ChromeRenderer::launch()
            .await
            .context("Failed to launch headless browser")?;
        return Ok(Arc::new(renderer));
    }
    Ok(Arc::new(HttpRenderer::new(params.request_timeout())))
}

#[cfg(not(feature = "browser"))]
async fn build_renderer(params: &GeneralParameters) -> Result<Arc<dyn PageRenderer>> {
    if params.browser {
        tracing::warn!("RUN_BROWSER is set but the browser feature is disabled; using plain HTTP");
    }
    Ok(Arc::new(HttpRenderer::new(params.request_timeout())))
}
