//! Mail transport
//!
//! Thin seam over [lettre](https://lettre.rs): the [`Mailer`] trait is what
//! the notifier talks to, [`SmtpMailer`] is the production implementation.
//! Transport failure is a [`MailError`] value returned to the caller; it is
//! never allowed to cross the send boundary as a panic.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::core::Config;

/// Why a send failed
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("template error: {0}")]
    Template(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}

/// An outbound message, already rendered
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to_name: String,
    pub to_email: String,
    pub subject: String,
    pub html_body: String,
}

/// Transport seam the notifier sends through
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// SMTP transport with STARTTLS and credential auth
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build the transport from configuration
    pub fn from_config(config: &Config) -> Result<Self, MailError> {
        let from = mailbox(&config.sender_name, &config.sender_email)?;
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)
            .map_err(|e| MailError::Smtp(e.to_string()))?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(SmtpMailer { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let to = mailbox(&email.to_name, &email.to_email)?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailError::Smtp(e.to_string()))
    }
}

/// Parse a `Name <addr>` mailbox, surfacing the address on failure
fn mailbox(name: &str, email: &str) -> Result<Mailbox, MailError> {
    format!("{name} <{email}>")
        .parse()
        .map_err(|_| MailError::InvalidAddress(email.to_string()))
}
