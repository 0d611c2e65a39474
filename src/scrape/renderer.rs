//! Page renderers: plain HTTP, and a headless browser behind the `browser` feature.

use crate::error::FetchError;
use crate::model::PageRenderer;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) weather-scraper";

/// Fetches pages over HTTP without executing scripts.
///
/// The wait hint is added to the request timeout, so slow pages get the same
/// extra budget a browser would spend waiting for scripts.
pub struct HttpRenderer {
    http_client: HttpClient,
    request_timeout: Duration,
}

impl HttpRenderer {
    pub fn new(request_timeout: Duration) -> Self {
        Self {
            http_client: HttpClient::new(),
            request_timeout,
        }
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &str, wait: Duration) -> Result<String, FetchError> {
        debug!(url, wait_secs = wait.as_secs(), "Fetching page");
        let response = self
            .http_client
            .get(url)
            .header("user-agent", USER_AGENT)
            .timeout(self.request_timeout + wait)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.text().await?)
        } else {
            Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            })
        }
    }
}

#[cfg(feature = "browser")]
pub use browser::ChromeRenderer;

#[cfg(feature = "browser")]
mod browser {
    use super::*;
    use chromiumoxide::browser::{Browser, BrowserConfig};
    use futures::StreamExt;
    use tokio::task::JoinHandle;

    /// Renders pages in headless Chromium so client-side tables get built.
    pub struct ChromeRenderer {
        browser: Browser,
        handler: JoinHandle<()>,
    }

    impl ChromeRenderer {
        pub async fn launch() -> Result<Self, FetchError> {
            let config = BrowserConfig::builder()
                .no_sandbox()
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage")
                .build()
                .map_err(FetchError::Browser)?;
            let (browser, mut handler) = Browser::launch(config)
                .await
                .map_err(|e| FetchError::Browser(e.to_string()))?;
            let handler = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });
            Ok(Self { browser, handler })
        }
    }

    impl Drop for ChromeRenderer {
        fn drop(&mut self) {
            self.handler.abort();
        }
    }

    #[async_trait]
    impl PageRenderer for ChromeRenderer {
        async fn render(&self, url: &str, wait: Duration) -> Result<String, FetchError> {
            debug!(url, wait_secs = wait.as_secs(), "Rendering page");
            let page = self
                .browser
                .new_page(url)
                .await
                .map_err(|e| FetchError::Browser(e.to_string()))?;
            tokio::time::sleep(wait).await;
            let content = page
                .content()
                .await
                .map_err(|e| FetchError::Browser(e.to_string()));
            if let Err(e) = page.close().await {
                debug!(url, error = %e, "Failed to close page");
            }
            content
        }
    }
}
