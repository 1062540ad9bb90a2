use crate::config::{BrowserMode, ConfigOverrides, RunConfig};
use crate::utils::error::Result;
use std::env;

/// Serverless variant: the same options, sourced only from the process environment.
pub struct LambdaConfig;

impl LambdaConfig {
    pub fn from_env() -> Result<RunConfig> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<RunConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = ConfigOverrides {
            mode: Some(BrowserMode::Serverless),
            ..Default::default()
        };
        RunConfig::resolve(explicit, lookup)
    }
}
