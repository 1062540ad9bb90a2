use thiserror::Error;

#[derive(Error, Debug)]
pub enum CruiseError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Screenshot decode error: {0}")]
    ScreenshotDecodeError(#[from] base64::DecodeError),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("WebDriver error: {message}")]
    WebDriverError { message: String },

    #[error("Page did not render '{selector}' within {waited_secs}s")]
    LoadTimeout { selector: String, waited_secs: u64 },

    #[error("Cruise section #{section_index} has no nights label")]
    MissingLabel { section_index: usize },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Email delivery failed: {message}")]
    DeliveryError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Browser,
    Parsing,
    Delivery,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CruiseError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CruiseError::MissingConfigError { .. } | CruiseError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            CruiseError::ApiError(_)
            | CruiseError::WebDriverError { .. }
            | CruiseError::LoadTimeout { .. }
            | CruiseError::ScreenshotDecodeError(_) => ErrorCategory::Browser,
            CruiseError::MissingLabel { .. } | CruiseError::ProcessingError { .. } => {
                ErrorCategory::Parsing
            }
            CruiseError::DeliveryError { .. } => ErrorCategory::Delivery,
            CruiseError::IoError(_) => ErrorCategory::System,
        }
    }

    /// 決定 CLI 的退出碼：Low 視為成功，其餘皆為失敗
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 郵件失敗不影響整體結果
            CruiseError::DeliveryError { .. } | CruiseError::MissingLabel { .. } => {
                ErrorSeverity::Low
            }
            CruiseError::ApiError(_) | CruiseError::WebDriverError { .. } => ErrorSeverity::Medium,
            CruiseError::MissingConfigError { .. }
            | CruiseError::InvalidConfigValueError { .. }
            | CruiseError::LoadTimeout { .. }
            | CruiseError::ProcessingError { .. }
            | CruiseError::ScreenshotDecodeError(_) => ErrorSeverity::High,
            CruiseError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CruiseError::MissingConfigError { field } => {
                format!("ERROR! Please provide --{field}. Use -h to see more help information.")
            }
            CruiseError::LoadTimeout {
                selector,
                waited_secs,
            } => format!(
                "Loading the page took more than {waited_secs} seconds (waiting for '{selector}')"
            ),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Pass --email and --password, or set the email/password environment variables"
            }
            ErrorCategory::Browser => {
                "Check that chromedriver is running (or --driver-path is set) and try a larger --delay"
            }
            ErrorCategory::Parsing => "The listing page markup may have changed",
            ErrorCategory::Delivery => "Check the mail account credentials and SMTP relay settings",
            ErrorCategory::System => "Check file permissions in the screenshot directory",
        }
    }
}

pub type Result<T> = std::result::Result<T, CruiseError>;
