use crate::core::{Notifier, PageSource, Pipeline, RawPageFragment, SummaryDocument};
use crate::domain::model::{DeliveryOutcome, OutgoingMessage, TableLayout};
use crate::transform;
use crate::utils::error::Result;

pub const EMAIL_SUBJECT: &str = "Daily cruise prices update";

pub struct CruisePipeline<P: PageSource, N: Notifier> {
    source: P,
    notifier: N,
    layout: TableLayout,
    recipient: String,
}

impl<P: PageSource, N: Notifier> CruisePipeline<P, N> {
    pub fn new(source: P, notifier: N, layout: TableLayout, recipient: String) -> Self {
        Self {
            source,
            notifier,
            layout,
            recipient,
        }
    }
}

#[async_trait::async_trait]
impl<P: PageSource, N: Notifier> Pipeline for CruisePipeline<P, N> {
    async fn extract(&self) -> Result<RawPageFragment> {
        self.source.fetch().await
    }

    async fn transform(&self, fragment: RawPageFragment) -> Result<SummaryDocument> {
        transform::summarize(&fragment, self.layout)
    }

    /// 寄送失敗只記錄，不讓整個流程失敗，避免重跑昂貴的抓取
    async fn load(&self, document: SummaryDocument) -> Result<DeliveryOutcome> {
        let message = OutgoingMessage {
            from: self.recipient.clone(),
            to: self.recipient.clone(),
            subject: EMAIL_SUBJECT.to_string(),
            html_body: document.to_html(),
        };

        match self.notifier.send(&message).await {
            Ok(()) => {
                tracing::info!("✅ Summary emailed to {}", self.recipient);
                Ok(DeliveryOutcome::Delivered)
            }
            Err(e) => {
                tracing::error!("❌ Failed to send email: {}", e);
                Ok(DeliveryOutcome::Failed {
                    reason: e.to_string(),
                })
            }
        }
    }
}
