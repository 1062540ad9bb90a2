use clap::Parser;
use cruise_prices::utils::error::ErrorSeverity;
use cruise_prices::utils::logger;
use cruise_prices::{resolve_and_run, CliConfig, ConfigOverrides, DeliveryOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting cruise-prices CLI");

    let overrides = ConfigOverrides::from(cli);
    match resolve_and_run(overrides, |key| std::env::var(key).ok()).await {
        Ok(report) => {
            match &report.delivery {
                DeliveryOutcome::Delivered => {
                    println!("✅ Sent {} price tables", report.sections);
                }
                DeliveryOutcome::Failed { reason } => {
                    // 寄信失敗仍視為成功結束，詳情見日誌
                    println!("⚠️ Built {} price tables but email failed: {}", report.sections, reason);
                }
            }
            if report.skipped_sections > 0 {
                println!("⚠️ Skipped {} sections without a nights label", report.skipped_sections);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
