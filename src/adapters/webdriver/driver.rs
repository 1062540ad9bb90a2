use crate::adapters::webdriver::client::WebDriverClient;
use crate::utils::error::{CruiseError, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::time::{sleep, Instant};
use url::Url;

const STARTUP_TIMEOUT: Duration = Duration::from_secs(15);
const STARTUP_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A chromedriver child process owned by one run; killed on drop at the latest.
pub struct DriverProcess {
    child: Child,
}

impl DriverProcess {
    pub async fn launch(binary: &Path, client: &WebDriverClient) -> Result<Self> {
        let port = driver_port(client.endpoint())?;

        tracing::info!("🚗 Launching {} on port {}", binary.display(), port);
        let child = Command::new(binary)
            .arg(format!("--port={}", port))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;
        let mut process = Self { child };

        let deadline = Instant::now() + STARTUP_TIMEOUT;
        while !client.is_ready().await {
            if let Some(status) = process.child.try_wait()? {
                return Err(CruiseError::WebDriverError {
                    message: format!("driver exited during startup with {}", status),
                });
            }
            if Instant::now() >= deadline {
                process.shutdown().await;
                return Err(CruiseError::WebDriverError {
                    message: format!(
                        "driver at {} not ready after {:?}",
                        client.endpoint(),
                        STARTUP_TIMEOUT
                    ),
                });
            }
            sleep(STARTUP_POLL_INTERVAL).await;
        }

        Ok(process)
    }

    pub async fn shutdown(mut self) {
        if let Err(e) = self.child.kill().await {
            tracing::warn!("Failed to stop driver process: {}", e);
        }
    }
}

fn driver_port(endpoint: &str) -> Result<u16> {
    let url = Url::parse(endpoint).map_err(|e| CruiseError::InvalidConfigValueError {
        field: "webdriver_url".to_string(),
        value: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    url.port_or_known_default()
        .ok_or_else(|| CruiseError::InvalidConfigValueError {
            field: "webdriver_url".to_string(),
            value: endpoint.to_string(),
            reason: "cannot determine port".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_port() {
        assert_eq!(driver_port("http://localhost:9515").unwrap(), 9515);
        assert_eq!(driver_port("http://127.0.0.1").unwrap(), 80);
        assert!(driver_port("not a url").is_err());
    }

    #[tokio::test]
    async fn test_launch_missing_binary_fails() {
        let client = WebDriverClient::new("http://127.0.0.1:9").unwrap();
        let result = DriverProcess::launch(Path::new("/nonexistent/chromedriver"), &client).await;
        assert!(matches!(result, Err(CruiseError::IoError(_))));
    }
}
