#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;

use crate::domain::model::TableLayout;
use crate::utils::error::{CruiseError, Result};
use crate::utils::validation::{self, Validate};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const LISTING_URL: &str =
    "https://sg.dreamcruiseline.com/swift/cruise?lang=1&siid=281788&departureports=SIN&ship=14101";
pub const DEFAULT_TARGET_ELEMENT: &str = "cruise-list-container";
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;
pub const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 30;

const SERVERLESS_DRIVER_PATH: &str = "/opt/chromedriver";
const SERVERLESS_BROWSER_BINARY: &str = "/opt/headless-chromium";
const SERVERLESS_SCREENSHOT_DIR: &str = "/tmp";

/// Deployment variant; only changes how the browser is launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowserMode {
    #[default]
    Desktop,
    Serverless,
}

impl FromStr for BrowserMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" | "local" => Ok(BrowserMode::Desktop),
            "serverless" | "lambda" => Ok(BrowserMode::Serverless),
            other => Err(format!(
                "unknown browser mode '{other}' (expected desktop or serverless)"
            )),
        }
    }
}

impl fmt::Display for BrowserMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserMode::Desktop => write!(f, "desktop"),
            BrowserMode::Serverless => write!(f, "serverless"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSettings {
    pub mode: BrowserMode,
    pub webdriver_url: String,
    /// 設定後由程式自行啟動 chromedriver
    pub driver_path: Option<PathBuf>,
    pub browser_binary: Option<PathBuf>,
    pub screenshot_dir: PathBuf,
}

impl BrowserSettings {
    pub fn for_mode(mode: BrowserMode) -> Self {
        match mode {
            BrowserMode::Desktop => Self {
                mode,
                webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
                driver_path: None,
                browser_binary: None,
                screenshot_dir: PathBuf::from("."),
            },
            BrowserMode::Serverless => Self {
                mode,
                webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
                driver_path: Some(PathBuf::from(SERVERLESS_DRIVER_PATH)),
                browser_binary: Some(PathBuf::from(SERVERLESS_BROWSER_BINARY)),
                screenshot_dir: PathBuf::from(SERVERLESS_SCREENSHOT_DIR),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
            timeout_secs: DEFAULT_SMTP_TIMEOUT_SECS,
        }
    }
}

/// Explicitly supplied values (command-line flags). Every field wins over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub email: Option<String>,
    pub password: Option<String>,
    pub delay: Option<u64>,
    pub target: Option<String>,
    pub mode: Option<BrowserMode>,
    pub webdriver_url: Option<String>,
    pub driver_path: Option<PathBuf>,
    pub browser_binary: Option<PathBuf>,
    pub screenshot_dir: Option<PathBuf>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub layout: Option<TableLayout>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub recipient_address: String,
    pub credential_secret: String,
    pub wait_timeout_secs: u64,
    pub target_element: String,
    pub listing_url: String,
    pub browser: BrowserSettings,
    pub smtp: SmtpSettings,
    pub layout: TableLayout,
}

// 避免密碼出現在 debug 日誌
impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("recipient_address", &self.recipient_address)
            .field("credential_secret", &"***")
            .field("wait_timeout_secs", &self.wait_timeout_secs)
            .field("target_element", &self.target_element)
            .field("listing_url", &self.listing_url)
            .field("browser", &self.browser)
            .field("smtp", &self.smtp)
            .field("layout", &self.layout)
            .finish()
    }
}

impl RunConfig {
    /// Resolves the run parameters with precedence explicit > environment > default.
    ///
    /// `env` looks up a variable by name (`email`, `password`, `delay`, `target`, ...);
    /// pass `|k| std::env::var(k).ok()` for the real process environment.
    pub fn resolve<F>(explicit: ConfigOverrides, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let recipient_address =
            validation::validate_required_field("email", explicit.email.or_else(|| env("email")))?;
        let credential_secret = validation::validate_required_field(
            "password",
            explicit.password.or_else(|| env("password")),
        )?;

        let wait_timeout_secs = match explicit.delay {
            Some(delay) => delay,
            None => match env("delay") {
                Some(raw) => validation::parse_number("delay", &raw)?,
                None => DEFAULT_WAIT_TIMEOUT_SECS,
            },
        };

        let target_element = explicit
            .target
            .or_else(|| env("target"))
            .unwrap_or_else(|| DEFAULT_TARGET_ELEMENT.to_string());

        let mode = match explicit.mode {
            Some(mode) => mode,
            None => match env("mode") {
                Some(raw) => parse_enum("mode", &raw)?,
                None => BrowserMode::default(),
            },
        };

        let mut browser = BrowserSettings::for_mode(mode);
        if let Some(url) = explicit.webdriver_url.or_else(|| env("webdriver_url")) {
            browser.webdriver_url = url;
        }
        if let Some(path) = explicit
            .driver_path
            .or_else(|| env("driver_path").map(PathBuf::from))
        {
            browser.driver_path = Some(path);
        }
        if let Some(path) = explicit
            .browser_binary
            .or_else(|| env("browser_binary").map(PathBuf::from))
        {
            browser.browser_binary = Some(path);
        }
        if let Some(dir) = explicit
            .screenshot_dir
            .or_else(|| env("screenshot_dir").map(PathBuf::from))
        {
            browser.screenshot_dir = dir;
        }

        let mut smtp = SmtpSettings::default();
        if let Some(host) = explicit.smtp_host.or_else(|| env("smtp_host")) {
            smtp.host = host;
        }
        smtp.port = match explicit.smtp_port {
            Some(port) => port,
            None => match env("smtp_port") {
                Some(raw) => validation::parse_number("smtp_port", &raw)?,
                None => smtp.port,
            },
        };

        let layout = match explicit.layout {
            Some(layout) => layout,
            None => match env("layout") {
                Some(raw) => parse_enum("layout", &raw)?,
                None => TableLayout::default(),
            },
        };

        let config = Self {
            recipient_address,
            credential_secret,
            wait_timeout_secs,
            target_element,
            listing_url: LISTING_URL.to_string(),
            browser,
            smtp,
            layout,
        };
        config.validate()?;
        Ok(config)
    }

    /// CSS selector the fetcher waits for before touching the page.
    pub fn readiness_selector(&self) -> String {
        let target = self.target_element.trim();
        if target.starts_with('.') || target.starts_with('#') {
            target.to_string()
        } else {
            format!(".{}", target)
        }
    }
}

fn parse_enum<T>(field_name: &str, raw: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    raw.parse()
        .map_err(|reason| CruiseError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: raw.to_string(),
            reason,
        })
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("email", &self.recipient_address)?;
        validation::validate_non_empty_string("password", &self.credential_secret)?;
        validation::validate_non_empty_string("target", &self.target_element)?;
        validation::validate_url("webdriver_url", &self.browser.webdriver_url)?;
        validation::validate_non_empty_string("smtp_host", &self.smtp.host)?;
        validation::validate_range("smtp_port", self.smtp.port, 1, u16::MAX)?;

        tracing::debug!("✅ Run configuration validation passed");
        Ok(())
    }
}
