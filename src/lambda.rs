#[cfg(feature = "lambda")]
use cruise_prices::utils::logger;
#[cfg(feature = "lambda")]
use cruise_prices::{run_job, LambdaConfig, RunReport};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use serde::Serialize;

#[cfg(feature = "lambda")]
#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub delivered: bool,
    #[serde(flatten)]
    pub report: RunReport,
}

/// The scheduled trigger's payload carries nothing we use.
#[cfg(feature = "lambda")]
async fn function_handler(_event: LambdaEvent<serde_json::Value>) -> Result<Response, Error> {
    tracing::info!("Starting cruise price Lambda function");

    let config = LambdaConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let report = run_job(config)
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let response = Response {
        message: "Cruise price run completed".to_string(),
        delivered: report.delivery.is_delivered(),
        report,
    };

    tracing::info!("Cruise price Lambda function completed");
    Ok(response)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
