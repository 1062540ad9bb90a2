pub mod client;
pub mod driver;

use crate::config::{BrowserSettings, RunConfig};
use crate::domain::model::RawPageFragment;
use crate::domain::ports::{PageSource, Storage};
use crate::utils::error::{CruiseError, Result};
use async_trait::async_trait;
use client::{capabilities, Locator, WebDriverClient, WebDriverSession};
use driver::DriverProcess;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Results container; fixed regardless of the configured readiness target.
pub const CONTAINER_SELECTOR: &str = ".cruise-list-container";
pub const VIEW_ALL_TEXT: &str = "View All";
pub const TIMEOUT_SCREENSHOT: &str = "page_load_timeout.png";
const POLL_INTERVAL: Duration = Duration::from_millis(500);

pub struct WebDriverFetcher<S: Storage> {
    settings: BrowserSettings,
    listing_url: String,
    readiness_selector: String,
    wait_timeout: Duration,
    storage: S,
}

impl<S: Storage> WebDriverFetcher<S> {
    pub fn new(config: &RunConfig, storage: S) -> Self {
        Self {
            settings: config.browser.clone(),
            listing_url: config.listing_url.clone(),
            readiness_selector: config.readiness_selector(),
            wait_timeout: Duration::from_secs(config.wait_timeout_secs),
            storage,
        }
    }

    async fn scrape(&self, session: &WebDriverSession) -> Result<RawPageFragment> {
        tracing::debug!("Navigating to {}", self.listing_url);
        session.navigate(&self.listing_url).await?;

        // 等待 AJAX 載入的內容出現
        if !self.wait_for_ready(session).await? {
            tracing::error!(
                "❌ Loading the page took more than {} seconds",
                self.wait_timeout.as_secs()
            );
            self.capture_screenshot(session).await;
            return Err(CruiseError::LoadTimeout {
                selector: self.readiness_selector.clone(),
                waited_secs: self.wait_timeout.as_secs(),
            });
        }

        // 展開所有折疊的航次
        let view_all_links = session
            .find_elements(&Locator::PartialLinkText(VIEW_ALL_TEXT.to_string()))
            .await?;
        tracing::info!("Expanding {} 'View All' sections", view_all_links.len());
        for link in &view_all_links {
            session.click(link).await?;
        }

        let container = session
            .find_element(&Locator::Css(CONTAINER_SELECTOR.to_string()))
            .await?
            .ok_or_else(|| CruiseError::WebDriverError {
                message: format!("{} not found after expanding listings", CONTAINER_SELECTOR),
            })?;
        let markup = session.inner_html(&container).await?;

        Ok(RawPageFragment::new(markup))
    }

    /// Polls for the readiness selector; `false` once the wait window is exhausted.
    async fn wait_for_ready(&self, session: &WebDriverSession) -> Result<bool> {
        let locator = Locator::Css(self.readiness_selector.clone());
        let deadline = Instant::now() + self.wait_timeout;

        loop {
            if session.find_element(&locator).await?.is_some() {
                return Ok(true);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(false);
            }
            sleep(POLL_INTERVAL.min(deadline - now)).await;
        }
    }

    async fn capture_screenshot(&self, session: &WebDriverSession) {
        let png = match session.screenshot_png().await {
            Ok(png) => png,
            Err(e) => {
                tracing::warn!("Could not take timeout screenshot: {}", e);
                return;
            }
        };

        match self.storage.write_file(TIMEOUT_SCREENSHOT, &png).await {
            Ok(path) => tracing::info!("📸 Screenshot saved to {}", path),
            Err(e) => tracing::warn!("Could not save timeout screenshot: {}", e),
        }
    }
}

#[async_trait]
impl<S: Storage> PageSource for WebDriverFetcher<S> {
    async fn fetch(&self) -> Result<RawPageFragment> {
        let client = WebDriverClient::new(&self.settings.webdriver_url)?;

        let driver = match &self.settings.driver_path {
            Some(binary) => Some(DriverProcess::launch(binary, &client).await?),
            None => None,
        };

        let result = match WebDriverSession::start(client, &capabilities(&self.settings)).await {
            Ok(session) => {
                let result = self.scrape(&session).await;
                // 不論成功與否都要釋放瀏覽器
                if let Err(e) = session.close().await {
                    tracing::warn!("Failed to close browser session: {}", e);
                }
                result
            }
            Err(e) => Err(e),
        };

        if let Some(driver) = driver {
            driver.shutdown().await;
        }

        result
    }
}
