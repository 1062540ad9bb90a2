use crate::domain::model::{DeliveryOutcome, OutgoingMessage, RawPageFragment, SummaryDocument};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Produces the results-container markup for one run.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self) -> Result<RawPageFragment>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &OutgoingMessage) -> Result<()>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawPageFragment>;
    async fn transform(&self, fragment: RawPageFragment) -> Result<SummaryDocument>;
    async fn load(&self, document: SummaryDocument) -> Result<DeliveryOutcome>;
}
