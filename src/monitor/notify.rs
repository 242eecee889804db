// src/monitor/notify.rs
// =============================================================================
// Delivers alert messages.
//
// The pipeline only sees the `Notifier` trait; production uses an SMTP relay
// through lettre, tests plug in a recorder.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use std::time::Duration;

/// Anything that can deliver `(subject, body)` to a recipient
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, subject: &str, body: &str, recipient: &str) -> Result<()>;
}

/// Connection settings for the outbound mail relay
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address
    pub from: String,
    /// STARTTLS relay when true, plain connection otherwise (local relays)
    pub tls: bool,
}

/// Sends alerts through an authenticated SMTP relay
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_mailbox: Mailbox,
}

impl SmtpNotifier {
    /// Builds the transport; nothing is sent or connected yet
    pub fn new(config: &SmtpConfig, timeout: Duration) -> Result<Self> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let transport = if config.tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .context("Failed to create SMTP relay")?
                .port(config.port)
                .credentials(creds)
                .timeout(Some(timeout))
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .port(config.port)
                .credentials(creds)
                .timeout(Some(timeout))
                .build()
        };

        let from_mailbox: Mailbox = config
            .from
            .parse()
            .context("Invalid sender email address")?;

        Ok(Self {
            transport,
            from_mailbox,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, subject: &str, body: &str, recipient: &str) -> Result<()> {
        let to_mailbox: Mailbox = recipient
            .parse()
            .context("Invalid recipient email address")?;

        let email = Message::builder()
            .from(self.from_mailbox.clone())
            .to(to_mailbox)
            .subject(subject)
            .body(body.to_string())
            .context("Failed to build email message")?;

        self.transport
            .send(email)
            .await
            .context("Failed to send email")?;

        Ok(())
    }
}

/// Shows the first character and the domain only: "a***@example.com"
pub fn anonymize_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) => format!("{}***@{}", first, domain),
            None => format!("***@{}", domain),
        },
        None => "***@***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "monitor@example.com".to_string(),
            password: "secret".to_string(),
            from: "Site Monitor <monitor@example.com>".to_string(),
            // Plain transport: building it touches no TLS machinery
            tls: false,
        }
    }

    #[tokio::test]
    async fn test_builds_with_display_name_sender() {
        assert!(SmtpNotifier::new(&config(), Duration::from_secs(10)).is_ok());
    }

    #[tokio::test]
    async fn test_rejects_invalid_sender() {
        let mut config = config();
        config.from = "not an address".to_string();
        assert!(SmtpNotifier::new(&config, Duration::from_secs(10)).is_err());
    }

    #[tokio::test]
    async fn test_invalid_recipient_fails_before_connecting() {
        let notifier = SmtpNotifier::new(&config(), Duration::from_secs(10)).unwrap();
        let err = notifier
            .notify("subject", "body", "nobody")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("recipient"));
    }

    #[test]
    fn test_anonymize_email() {
        assert_eq!(anonymize_email("alice@example.com"), "a***@example.com");
        assert_eq!(anonymize_email("@example.com"), "***@example.com");
        assert_eq!(anonymize_email("notanemail"), "***@***");
    }
}
