//! Outbound mail — contact-form delivery over SMTP
//!
//! Provides a `Mailer` trait with the production `SmtpMailer`
//! implementation (implicit-TLS relay, suitable for Gmail app-password
//! accounts). Credentials are optional at startup: when they are absent
//! the server runs without a mailer and the contact endpoint reports
//! "service not configured" instead of failing to boot.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message as Email, Tokio1Executor};
use thiserror::Error;

/// One contact-form submission.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    pub fn subject(&self) -> String {
        format!("Chef Byte Contact Form: {}", self.name)
    }

    pub fn body(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\nMessage:\n{}\n",
            self.name, self.email, self.message
        )
    }
}

/// Mail delivery errors
#[derive(Error, Debug)]
pub enum MailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
}

/// Abstraction over outbound mail delivery.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one contact-form submission to the configured receiver.
    async fn send_contact(&self, contact: &ContactMessage) -> Result<(), MailError>;

    /// Transport name for logging.
    fn name(&self) -> &str;
}

/// SMTP mailer configuration. The sender address doubles as the SMTP
/// login; the receiver defaults to the sender when unset.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub sender: String,
    pub password: String,
    pub receiver: String,
}

impl SmtpConfig {
    /// Read credentials from the environment. Returns `None` when either
    /// credential is missing, which disables the contact endpoint.
    pub fn from_env(host: String) -> Option<Self> {
        let sender = std::env::var("SMTP_SENDER_EMAIL").ok()?;
        let password = std::env::var("SMTP_SENDER_PASSWORD").ok()?;
        if sender.is_empty() || password.is_empty() {
            return None;
        }
        let receiver = std::env::var("CONTACT_RECEIVER_EMAIL")
            .ok()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| sender.clone());
        Some(Self {
            host,
            sender,
            password,
            receiver,
        })
    }
}

/// SMTP mailer — sends over an implicit-TLS relay (port 465).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    receiver: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Result<Self, MailError> {
        let sender: Mailbox = config.sender.parse()?;
        let receiver: Mailbox = config.receiver.parse()?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .credentials(Credentials::new(config.sender, config.password))
            .build();

        Ok(Self {
            transport,
            sender,
            receiver,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_contact(&self, contact: &ContactMessage) -> Result<(), MailError> {
        let email = Email::builder()
            .from(self.sender.clone())
            .to(self.receiver.clone())
            .subject(contact.subject())
            .body(contact.body())?;

        self.transport.send(email).await?;

        tracing::info!(
            from = %contact.email,
            name = %contact.name,
            "Contact form email sent"
        );

        Ok(())
    }

    fn name(&self) -> &str {
        "smtp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_embeds_sender_name() {
        let contact = ContactMessage {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Love the sourdough tips".to_string(),
        };
        assert_eq!(contact.subject(), "Chef Byte Contact Form: Ada");
    }

    #[test]
    fn test_body_embeds_all_fields() {
        let contact = ContactMessage {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Love the sourdough tips".to_string(),
        };
        let body = contact.body();
        assert!(body.contains("Name: Ada"));
        assert!(body.contains("Email: ada@example.com"));
        assert!(body.contains("Love the sourdough tips"));
    }

    #[test]
    fn test_smtp_mailer_rejects_invalid_sender_address() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            sender: "not-an-address".to_string(),
            password: "secret".to_string(),
            receiver: "inbox@example.com".to_string(),
        };
        match SmtpMailer::new(config) {
            Err(MailError::Address(_)) => {}
            other => panic!("Expected Address error, got {:?}", other.map(|_| ())),
        }
    }
}
