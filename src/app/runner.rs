use crate::adapters::{LocalStorage, SmtpNotifier, WebDriverFetcher};
use crate::config::{ConfigOverrides, RunConfig};
use crate::core::etl::EtlEngine;
use crate::core::pipeline::CruisePipeline;
use crate::domain::model::RunReport;
use crate::utils::error::Result;

/// Resolves configuration first; nothing touches the network unless that succeeds.
pub async fn resolve_and_run<F>(explicit: ConfigOverrides, env: F) -> Result<RunReport>
where
    F: Fn(&str) -> Option<String>,
{
    let config = RunConfig::resolve(explicit, env)?;
    run_job(config).await
}

pub async fn run_job(config: RunConfig) -> Result<RunReport> {
    tracing::debug!("Run config: {:?}", config);
    tracing::info!(
        "Browser mode: {}, WebDriver: {}",
        config.browser.mode,
        config.browser.webdriver_url
    );

    let storage = LocalStorage::new(config.browser.screenshot_dir.clone());
    let fetcher = WebDriverFetcher::new(&config, storage);
    let notifier = SmtpNotifier::new(
        &config.smtp,
        &config.recipient_address,
        &config.credential_secret,
    )?;

    let pipeline = CruisePipeline::new(
        fetcher,
        notifier,
        config.layout,
        config.recipient_address.clone(),
    );

    EtlEngine::new(pipeline).run().await
}
