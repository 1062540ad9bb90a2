use crate::config::{BrowserMode, BrowserSettings};
use crate::utils::error::{CruiseError, Result};
use base64::Engine;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::time::Duration;

/// W3C web element reference key.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
const LEGACY_ELEMENT_KEY: &str = "ELEMENT";
const NO_SUCH_ELEMENT: &str = "no such element";
const COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

const SERVERLESS_ARGS: &[&str] = &[
    "--headless",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--single-process",
    "--window-size=1280x1696",
];

#[derive(Debug, Clone)]
pub enum Locator {
    Css(String),
    PartialLinkText(String),
}

impl Locator {
    fn to_json(&self) -> Value {
        match self {
            Locator::Css(selector) => json!({ "using": "css selector", "value": selector }),
            Locator::PartialLinkText(text) => {
                json!({ "using": "partial link text", "value": text })
            }
        }
    }
}

enum WireResponse {
    Value(Value),
    Failure { error: String, message: String },
}

pub fn capabilities(settings: &BrowserSettings) -> Value {
    let args: Vec<&str> = match settings.mode {
        BrowserMode::Desktop => Vec::new(),
        BrowserMode::Serverless => SERVERLESS_ARGS.to_vec(),
    };

    let mut chrome_options = json!({ "args": args });
    if let Some(binary) = &settings.browser_binary {
        chrome_options["binary"] = json!(binary.to_string_lossy().to_string());
    }

    json!({
        "capabilities": {
            "alwaysMatch": {
                "browserName": "chrome",
                "goog:chromeOptions": chrome_options
            }
        }
    })
}

#[derive(Debug, Clone)]
pub struct WebDriverClient {
    http: Client,
    base: String,
}

impl WebDriverClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let http = Client::builder().timeout(COMMAND_TIMEOUT).build()?;
        Ok(Self {
            http,
            base: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.base
    }

    /// `GET /status`; any transport or parse failure counts as not ready.
    pub async fn is_ready(&self) -> bool {
        match self.send(Method::GET, "/status", None).await {
            Ok(WireResponse::Value(value)) => value
                .get("ready")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            _ => false,
        }
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<WireResponse> {
        let url = format!("{}{}", self.base, path);
        tracing::debug!("WebDriver {} {}", method, path);

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let payload: Value = match serde_json::from_str(&text) {
            Ok(payload) => payload,
            Err(_) if status.is_success() => Value::Null,
            Err(_) => {
                return Err(CruiseError::WebDriverError {
                    message: format!(
                        "{} returned HTTP {}: {}",
                        path,
                        status.as_u16(),
                        truncate_for_log(&text, 240)
                    ),
                })
            }
        };

        if let Some(error) = payload.pointer("/value/error").and_then(|v| v.as_str()) {
            let message = payload
                .pointer("/value/message")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown webdriver error");
            return Ok(WireResponse::Failure {
                error: error.to_string(),
                message: message.to_string(),
            });
        }

        if !status.is_success() {
            return Err(CruiseError::WebDriverError {
                message: format!(
                    "{} returned HTTP {}: {}",
                    path,
                    status.as_u16(),
                    truncate_for_log(&text, 240)
                ),
            });
        }

        Ok(WireResponse::Value(
            payload.get("value").cloned().unwrap_or(Value::Null),
        ))
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        match self.send(method, path, body).await? {
            WireResponse::Value(value) => Ok(value),
            WireResponse::Failure { error, message } => Err(CruiseError::WebDriverError {
                message: format!("{} failed: {}: {}", path, error, message),
            }),
        }
    }
}

/// One browser session. Callers must finish with [`WebDriverSession::close`].
#[derive(Debug)]
pub struct WebDriverSession {
    client: WebDriverClient,
    id: String,
}

impl WebDriverSession {
    pub async fn start(client: WebDriverClient, capabilities: &Value) -> Result<Self> {
        let value = client
            .command(Method::POST, "/session", Some(capabilities.clone()))
            .await?;

        let id = value
            .get("sessionId")
            .and_then(|v| v.as_str())
            .ok_or_else(|| CruiseError::WebDriverError {
                message: format!(
                    "session id missing in response: {}",
                    truncate_for_log(&value.to_string(), 220)
                ),
            })?
            .to_string();

        tracing::debug!("WebDriver session {} started", id);
        Ok(Self { client, id })
    }

    fn path(&self, suffix: &str) -> String {
        format!("/session/{}{}", self.id, suffix)
    }

    pub async fn navigate(&self, url: &str) -> Result<()> {
        self.client
            .command(Method::POST, &self.path("/url"), Some(json!({ "url": url })))
            .await?;
        Ok(())
    }

    /// `Ok(None)` when nothing matches yet.
    pub async fn find_element(&self, locator: &Locator) -> Result<Option<String>> {
        let response = self
            .client
            .send(Method::POST, &self.path("/element"), Some(locator.to_json()))
            .await?;

        match response {
            WireResponse::Value(value) => element_id(&value).map(Some),
            WireResponse::Failure { error, .. } if error == NO_SUCH_ELEMENT => Ok(None),
            WireResponse::Failure { error, message } => Err(CruiseError::WebDriverError {
                message: format!("find element failed: {}: {}", error, message),
            }),
        }
    }

    pub async fn find_elements(&self, locator: &Locator) -> Result<Vec<String>> {
        let value = self
            .client
            .command(Method::POST, &self.path("/elements"), Some(locator.to_json()))
            .await?;

        value
            .as_array()
            .map(|items| items.iter().map(element_id).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    pub async fn click(&self, element: &str) -> Result<()> {
        self.client
            .command(
                Method::POST,
                &self.path(&format!("/element/{}/click", element)),
                Some(json!({})),
            )
            .await?;
        Ok(())
    }

    pub async fn inner_html(&self, element: &str) -> Result<String> {
        let value = self
            .client
            .command(
                Method::GET,
                &self.path(&format!("/element/{}/property/innerHTML", element)),
                None,
            )
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    pub async fn screenshot_png(&self) -> Result<Vec<u8>> {
        let value = self
            .client
            .command(Method::GET, &self.path("/screenshot"), None)
            .await?;
        let encoded = value.as_str().ok_or_else(|| CruiseError::WebDriverError {
            message: "screenshot response is not a string".to_string(),
        })?;
        Ok(base64::engine::general_purpose::STANDARD.decode(encoded)?)
    }

    pub async fn close(self) -> Result<()> {
        self.client
            .command(Method::DELETE, &self.path(""), None)
            .await?;
        tracing::debug!("WebDriver session {} closed", self.id);
        Ok(())
    }
}

fn element_id(value: &Value) -> Result<String> {
    value
        .get(ELEMENT_KEY)
        .or_else(|| value.get(LEGACY_ELEMENT_KEY))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| CruiseError::WebDriverError {
            message: format!("element reference missing: {}", truncate_for_log(&value.to_string(), 200)),
        })
}

fn truncate_for_log(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    input.chars().take(max_chars).collect::<String>() + "..."
}
