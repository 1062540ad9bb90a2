use crate::config::{BrowserMode, ConfigOverrides};
use crate::domain::model::TableLayout;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "cruise-prices")]
#[command(about = "Scrape cruise site and send prices to a Gmail email")]
pub struct CliConfig {
    #[arg(long, help = "Gmail address, e.g. example@gmail.com")]
    pub email: Option<String>,

    #[arg(long, help = "Password to Gmail address")]
    pub password: Option<String>,

    #[arg(long, help = "Seconds to wait for the listing to render [default: 10]")]
    pub delay: Option<u64>,

    #[arg(long, help = "Class name of the element to wait for [default: cruise-list-container]")]
    pub target: Option<String>,

    #[arg(long, help = "Browser launch variant: desktop or serverless")]
    pub mode: Option<BrowserMode>,

    #[arg(long, help = "WebDriver endpoint [default: http://localhost:9515]")]
    pub webdriver_url: Option<String>,

    #[arg(long, help = "Path to a chromedriver binary to launch for this run")]
    pub driver_path: Option<PathBuf>,

    #[arg(long, help = "Browser binary passed to chromedriver")]
    pub browser_binary: Option<PathBuf>,

    #[arg(long, help = "Directory for the timeout screenshot")]
    pub screenshot_dir: Option<PathBuf>,

    #[arg(long)]
    pub smtp_host: Option<String>,

    #[arg(long)]
    pub smtp_port: Option<u16>,

    #[arg(long, help = "Price columns: legacy (Balcony, Suite) or current")]
    pub layout: Option<TableLayout>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl From<CliConfig> for ConfigOverrides {
    fn from(cli: CliConfig) -> Self {
        Self {
            email: cli.email,
            password: cli.password,
            delay: cli.delay,
            target: cli.target,
            mode: cli.mode,
            webdriver_url: cli.webdriver_url,
            driver_path: cli.driver_path,
            browser_binary: cli.browser_binary,
            screenshot_dir: cli.screenshot_dir,
            smtp_host: cli.smtp_host,
            smtp_port: cli.smtp_port,
            layout: cli.layout,
        }
    }
}
