pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod transform;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use app::runner::{resolve_and_run, run_job};
pub use config::{lambda::LambdaConfig, BrowserMode, ConfigOverrides, RunConfig};
pub use crate::core::{etl::EtlEngine, pipeline::CruisePipeline};
pub use domain::model::{DeliveryOutcome, RawPageFragment, RunReport, SummaryDocument, TableLayout};
pub use transform::summarize;
pub use utils::error::{CruiseError, Result};
