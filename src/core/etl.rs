use crate::core::Pipeline;
use crate::domain::model::RunReport;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs fetch → transform → notify once. Only fetch and transform failures abort.
    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting cruise price run...");

        // Extract
        tracing::info!("🌐 Fetching listing page...");
        let fragment = self.pipeline.extract().await?;
        tracing::info!("Fetched {} bytes of listing markup", fragment.len());

        // Transform
        tracing::info!("🔄 Building price tables...");
        let document = self.pipeline.transform(fragment).await?;
        tracing::info!(
            "Built {} tables ({} sections skipped)",
            document.section_count(),
            document.skipped_sections
        );
        let sections = document.section_count();
        let skipped_sections = document.skipped_sections;

        // Load
        tracing::info!("📧 Sending summary email...");
        let delivery = self.pipeline.load(document).await?;

        Ok(RunReport {
            sections,
            skipped_sections,
            delivery,
        })
    }
}
