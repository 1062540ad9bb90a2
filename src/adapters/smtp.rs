use crate::config::SmtpSettings;
use crate::domain::model::OutgoingMessage;
use crate::domain::ports::Notifier;
use crate::utils::error::{CruiseError, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

/// Submits mail through an implicit-TLS relay with username/password auth.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    pub fn new(settings: &SmtpSettings, username: &str, password: &str) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
            .map_err(|e| CruiseError::InvalidConfigValueError {
                field: "smtp_host".to_string(),
                value: settings.host.clone(),
                reason: e.to_string(),
            })?
            .port(settings.port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .timeout(Some(Duration::from_secs(settings.timeout_secs)))
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, message: &OutgoingMessage) -> Result<()> {
        let email = build_message(message)?;
        self.transport.send(email).await.map_err(delivery_error)?;
        Ok(())
    }
}

pub fn build_message(message: &OutgoingMessage) -> Result<Message> {
    let from: Mailbox = message.from.parse().map_err(delivery_error)?;
    let to: Mailbox = message.to.parse().map_err(delivery_error)?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.as_str())
        .header(ContentType::TEXT_HTML)
        .body(message.html_body.clone())
        .map_err(delivery_error)
}

fn delivery_error(e: impl std::fmt::Display) -> CruiseError {
    CruiseError::DeliveryError {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outgoing(address: &str) -> OutgoingMessage {
        OutgoingMessage {
            from: address.to_string(),
            to: address.to_string(),
            subject: "Daily cruise prices update".to_string(),
            html_body: "<h3>5 Nights</h3>".to_string(),
        }
    }

    #[test]
    fn test_build_html_message() {
        let email = build_message(&outgoing("me@gmail.com")).unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();

        assert!(raw.contains("Subject: Daily cruise prices update"));
        assert!(raw.contains("From: me@gmail.com"));
        assert!(raw.contains("To: me@gmail.com"));
        assert!(raw.contains("Content-Type: text/html"));
    }

    #[test]
    fn test_invalid_address_is_delivery_error() {
        let err = build_message(&outgoing("not an address")).unwrap_err();
        assert!(matches!(err, CruiseError::DeliveryError { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_delivery_error() {
        let settings = SmtpSettings {
            host: "localhost".to_string(),
            port: 1,
            timeout_secs: 2,
        };
        let notifier = SmtpNotifier::new(&settings, "me@gmail.com", "pw").unwrap();

        let err = notifier.send(&outgoing("me@gmail.com")).await.unwrap_err();
        assert!(matches!(err, CruiseError::DeliveryError { .. }));
    }
}
